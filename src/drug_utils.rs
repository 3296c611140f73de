// drug_utils.rs
use crate::csv_utils::CsvBuilder;
use crate::db_utils::DbConnect;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Column schema of every drug-query result table, in order.
pub const DRUG_QUERY_COLUMNS: [&str; 4] =
    ["chembl_id", "pref_name", "max_phase", "canonical_smiles"];

/// Builds the drug-lookup SQL and its bound parameters from a list of generic
/// drug names.
///
/// The query selects ChEMBL ID, preferred name, max development phase and
/// canonical SMILES from `molecule_dictionary` joined to `compound_structures`
/// on `molregno`, filtering `pref_name` by a membership list of `?`
/// placeholders. The name list is always treated as a collection: one name
/// yields `IN (?)`, and duplicates are collapsed so each distinct name is
/// bound exactly once, in first-occurrence order. An empty list yields a
/// `WHERE 1 = 0` filter, which is still valid SQL and matches no row.
///
/// ```
/// use chembl_utils::drug_utils::build_drug_query;
///
/// let (sql, params) = build_drug_query(&["AMLODIPINE", "METFORMIN"]);
///
/// assert!(sql.contains("pref_name IN (?, ?)"));
/// assert_eq!(params, vec!["AMLODIPINE".to_string(), "METFORMIN".to_string()]);
/// ```
pub fn build_drug_query(names: &[&str]) -> (String, Vec<String>) {
    let mut params: Vec<String> = Vec::new();
    for name in names {
        if !params.iter().any(|seen| seen == name) {
            params.push((*name).to_string());
        }
    }

    let filter = if params.is_empty() {
        "1 = 0".to_string()
    } else {
        let placeholders = vec!["?"; params.len()].join(", ");
        format!("molecule_dictionary.pref_name IN ({})", placeholders)
    };

    let sql_query = format!(
        "SELECT \
            molecule_dictionary.chembl_id, \
            molecule_dictionary.pref_name, \
            molecule_dictionary.max_phase, \
            compound_structures.canonical_smiles \
        FROM molecule_dictionary \
            JOIN compound_structures ON molecule_dictionary.molregno = compound_structures.molregno \
        WHERE {}",
        filter
    );

    (sql_query, params)
}

/// The external query-execution collaborator: given a SQL string and its bound
/// parameters, returns a `(headers, rows)` table against the latest available
/// snapshot of the source database. Snapshot pinning is the collaborator's
/// concern, not this crate's.
#[async_trait]
pub trait ChemblExecutor {
    async fn execute(
        &self,
        sql_query: &str,
        params: Vec<String>,
    ) -> Result<(Vec<String>, Vec<Vec<String>>), Box<dyn std::error::Error + Send + Sync>>;
}

/// Executor that dispatches queries to a ChEMBL MYSQL dump.
pub struct ChemblMySql {
    username: String,
    password: String,
    server: String,
    database: String,
}

impl ChemblMySql {
    pub fn new(username: &str, password: &str, server: &str, database: &str) -> Self {
        ChemblMySql {
            username: username.to_string(),
            password: password.to_string(),
            server: server.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl ChemblExecutor for ChemblMySql {
    async fn execute(
        &self,
        sql_query: &str,
        params: Vec<String>,
    ) -> Result<(Vec<String>, Vec<Vec<String>>), Box<dyn std::error::Error + Send + Sync>> {
        DbConnect::execute_mysql_query_with_params(
            &self.username,
            &self.password,
            &self.server,
            &self.database,
            sql_query,
            params,
        )
        .await
    }
}

/// Controls the optional file write of a drug-query result. Whether to write
/// is decoupled from what the call returns: the table always comes back, and
/// persisting it is a side effect gated by `persist`.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    pub persist: bool,
    pub file_stem: Option<String>,
}

impl SaveOptions {
    /// Persist the result as `<file_stem>.tsv` in addition to returning it.
    pub fn tsv(file_stem: &str) -> Self {
        SaveOptions {
            persist: true,
            file_stem: Some(file_stem.to_string()),
        }
    }
}

/// Obtains drugs' ChEMBL IDs, generic names, max phases and canonical SMILES
/// by generic drug names alone, with an option to also save the table as a
/// tab-separated file.
///
/// Drug names are expected in the capitalization ChEMBL stores as preferred
/// names, e.g. `"AMLODIPINE"`. The returned table always carries the
/// `[chembl_id, pref_name, max_phase, canonical_smiles]` schema, with zero
/// rows when nothing matches. When `save.persist` is set, the table is
/// additionally written to `<file_stem>.tsv` (header row included, no index
/// column) before being returned; a write failure aborts the call.
///
/// ```
/// use chembl_utils::drug_utils::{query_drugs, ChemblMySql, SaveOptions};
/// use tokio::runtime::Runtime;
///
/// let rt = Runtime::new().unwrap();
/// rt.block_on(async {
///     let executor = ChemblMySql::new("reader", "pass", "localhost", "chembl_35");
///     let meds = query_drugs(&executor, &["AMLODIPINE", "METFORMIN"], &SaveOptions::tsv("meds"))
///         .await
///         .expect("query failed");
///     assert!(meds.has_data());
/// });
/// ```
pub async fn query_drugs(
    executor: &dyn ChemblExecutor,
    names: &[&str],
    save: &SaveOptions,
) -> Result<CsvBuilder, Box<dyn std::error::Error + Send + Sync>> {
    let (sql_query, params) = build_drug_query(names);
    let (headers, data) = executor.execute(&sql_query, params).await?;

    // A zero-row dispatch comes back with no header metadata; anything else
    // must match the SELECT list, name for name.
    if !headers.is_empty() && headers.iter().map(String::as_str).ne(DRUG_QUERY_COLUMNS) {
        return Err(format!(
            "unexpected result columns {:?}, expected {:?}",
            headers, DRUG_QUERY_COLUMNS
        )
        .into());
    }

    let canonical_headers = DRUG_QUERY_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .collect::<Vec<String>>();
    let mut table = CsvBuilder::from_raw_data(canonical_headers, data);

    if save.persist {
        let file_stem = save
            .file_stem
            .as_deref()
            .ok_or("a file stem is required when persist is set")?;
        table
            .save_as(&format!("{}.tsv", file_stem))
            .map_err(|e| e.to_string())?;
    }

    Ok(table)
}

/// One row of a drug-query result. `max_phase` is `None` for compounds with
/// no recorded development phase (NULL in ChEMBL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    pub chembl_id: String,
    pub pref_name: String,
    pub max_phase: Option<f64>,
    pub canonical_smiles: String,
}

impl DrugRecord {
    /// Converts a drug-query result table into typed records, row by row.
    pub fn from_table(table: &CsvBuilder) -> Vec<DrugRecord> {
        table
            .get_data()
            .map(|rows| {
                rows.iter()
                    .map(|row| DrugRecord {
                        chembl_id: row.first().cloned().unwrap_or_default(),
                        pref_name: row.get(1).cloned().unwrap_or_default(),
                        max_phase: row.get(2).and_then(|cell| cell.parse::<f64>().ok()),
                        canonical_smiles: row.get(3).cloned().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
