// drug_query_tests.rs
//
// End-to-end checks of the drug-query workflow against an in-memory ChEMBL
// stand-in: dispatch, schema guarantees, typed rows and the optional TSV
// side effect.

use async_trait::async_trait;
use chembl_utils::csv_utils::CsvBuilder;
use chembl_utils::drug_utils::{
    query_drugs, ChemblExecutor, DrugRecord, SaveOptions, DRUG_QUERY_COLUMNS,
};

/// A ChEMBL stand-in over a handful of approved drugs. Rows are filtered by
/// the bound name parameters, mirroring what the membership clause does
/// server-side.
struct InMemoryChembl {
    rows: Vec<Vec<String>>,
}

impl InMemoryChembl {
    fn new() -> Self {
        let rows = [
            (
                "CHEMBL1491",
                "AMLODIPINE",
                "4.0",
                "CCOC(=O)C1=C(COCCN)NC(C)=C(C1c1ccccc1Cl)C(=O)OC",
            ),
            ("CHEMBL1431", "METFORMIN", "4.0", "CN(C)C(=N)NC(=N)N"),
            (
                "CHEMBL54",
                "HALOPERIDOL",
                "4.0",
                "OC1(CCN(CCCC(=O)c2ccc(F)cc2)CC1)c1ccc(Cl)cc1",
            ),
            (
                "CHEMBL1200766",
                "AMLODIPINE BESYLATE",
                "4.0",
                "CCOC(=O)C1=C(COCCN)NC(C)=C(C1c1ccccc1Cl)C(=O)OC.OS(=O)(=O)c1ccccc1",
            ),
        ]
        .iter()
        .map(|(chembl_id, pref_name, max_phase, smiles)| {
            vec![
                chembl_id.to_string(),
                pref_name.to_string(),
                max_phase.to_string(),
                smiles.to_string(),
            ]
        })
        .collect();

        InMemoryChembl { rows }
    }
}

#[async_trait]
impl ChemblExecutor for InMemoryChembl {
    async fn execute(
        &self,
        _sql_query: &str,
        params: Vec<String>,
    ) -> Result<(Vec<String>, Vec<Vec<String>>), Box<dyn std::error::Error + Send + Sync>> {
        let data = self
            .rows
            .iter()
            .filter(|row| params.contains(&row[1]))
            .cloned()
            .collect::<Vec<Vec<String>>>();

        if data.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let headers = DRUG_QUERY_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .collect();
        Ok((headers, data))
    }
}

#[tokio::test]
async fn amlodipine_lookup_returns_only_amlodipine_rows() {
    let chembl = InMemoryChembl::new();
    let table = query_drugs(&chembl, &["AMLODIPINE"], &SaveOptions::default())
        .await
        .expect("query failed");

    assert_eq!(table.get_headers().unwrap(), &DRUG_QUERY_COLUMNS[..]);

    let rows = table.get_data().expect("expected at least one row");
    assert!(!rows.is_empty());
    for row in rows {
        assert_eq!(row[1], "AMLODIPINE");
    }
}

#[tokio::test]
async fn two_drug_lookup_with_persistence_creates_a_matching_tsv() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let file_stem = dir.path().join("meds");
    let file_stem_str = file_stem.to_str().unwrap();

    let chembl = InMemoryChembl::new();
    let table = query_drugs(
        &chembl,
        &["AMLODIPINE", "METFORMIN"],
        &SaveOptions::tsv(file_stem_str),
    )
    .await
    .expect("query failed");

    let names: Vec<&str> = table
        .get_data()
        .unwrap()
        .iter()
        .map(|row| row[1].as_str())
        .collect();
    assert!(names.contains(&"AMLODIPINE"));
    assert!(names.contains(&"METFORMIN"));

    let written = CsvBuilder::from_tsv(&format!("{}.tsv", file_stem_str));
    assert!(written.get_error().is_none());
    assert_eq!(written.get_headers(), table.get_headers());
    assert_eq!(written.get_data(), table.get_data());
}

#[tokio::test]
async fn failed_tsv_write_aborts_the_call() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    // A stem inside a directory that does not exist makes the write fail
    // after a successful dispatch.
    let file_stem = dir.path().join("no_such_dir").join("meds");
    let file_stem_str = file_stem.to_str().unwrap();

    let chembl = InMemoryChembl::new();
    let result = query_drugs(
        &chembl,
        &["AMLODIPINE", "METFORMIN"],
        &SaveOptions::tsv(file_stem_str),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn unknown_drug_yields_an_empty_table_with_full_schema() {
    let chembl = InMemoryChembl::new();
    let table = query_drugs(&chembl, &["NOT_A_DRUG"], &SaveOptions::default())
        .await
        .expect("query failed");

    assert_eq!(table.get_headers().unwrap(), &DRUG_QUERY_COLUMNS[..]);
    assert!(!table.has_data());
}

#[tokio::test]
async fn typed_records_round_trip_through_serde_json() {
    let chembl = InMemoryChembl::new();
    let table = query_drugs(&chembl, &["METFORMIN"], &SaveOptions::default())
        .await
        .expect("query failed");

    let records = DrugRecord::from_table(&table);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].chembl_id, "CHEMBL1431");
    assert_eq!(records[0].max_phase, Some(4.0));

    let json = serde_json::to_string(&records).expect("failed to serialize records");
    let parsed: Vec<DrugRecord> = serde_json::from_str(&json).expect("failed to deserialize");
    assert_eq!(parsed, records);
}
