// csv_utils.rs
use crate::db_utils::DbConnect;
use csv::{ReaderBuilder, WriterBuilder};
use serde_json::{Map, Value};
use std::error::Error;
use std::fs::File;

/// Represents a CsvBuilder object. This struct allows you to specify headers,
/// corresponding data rows, as well as an internal error handler for fallible
/// loads.
#[derive(Debug)]
pub struct CsvBuilder {
    headers: Vec<String>,
    data: Vec<Vec<String>>,
    error: Option<Box<dyn Error>>,
}

impl CsvBuilder {
    /// Creates a new, empty `CsvBuilder`.
    ///
    /// ```
    /// use chembl_utils::csv_utils::CsvBuilder;
    ///
    /// let builder = CsvBuilder::new();
    ///
    /// // Initially, there are no headers or data
    /// assert!(builder.get_headers().is_none());
    /// assert!(builder.get_data().is_none());
    /// ```
    pub fn new() -> Self {
        CsvBuilder {
            headers: Vec::new(),
            data: Vec::new(),
            error: None,
        }
    }

    /// Creates a `CsvBuilder` from already materialized headers and rows.
    ///
    /// ```
    /// use chembl_utils::csv_utils::CsvBuilder;
    ///
    /// let builder = CsvBuilder::from_raw_data(
    ///     vec!["chembl_id".to_string(), "pref_name".to_string()],
    ///     vec![vec!["CHEMBL1491".to_string(), "AMLODIPINE".to_string()]],
    /// );
    ///
    /// assert_eq!(builder.get_headers().unwrap(), &["chembl_id".to_string(), "pref_name".to_string()]);
    /// ```
    pub fn from_raw_data(headers: Vec<String>, data: Vec<Vec<String>>) -> Self {
        CsvBuilder {
            headers,
            data,
            error: None,
        }
    }

    /// Creates a copy of the `CsvBuilder`, leaving the original untouched.
    pub fn from_copy(&self) -> Self {
        CsvBuilder {
            headers: self.headers.clone(),
            data: self.data.clone(),
            error: None,
        }
    }

    /// Reads data from a comma-separated file at the specified `file_path`.
    ///
    /// If the file is missing or malformed, `get_headers`/`get_data` return
    /// `None` and the `error` slot is set with the underlying failure.
    pub fn from_csv(file_path: &str) -> Self {
        Self::from_delimited_file(file_path, b',')
    }

    /// Reads data from a tab-separated file at the specified `file_path`.
    pub fn from_tsv(file_path: &str) -> Self {
        Self::from_delimited_file(file_path, b'\t')
    }

    fn from_delimited_file(file_path: &str, delimiter: u8) -> Self {
        let mut builder = CsvBuilder::new();

        match File::open(file_path) {
            Ok(file) => {
                let mut rdr = ReaderBuilder::new().delimiter(delimiter).from_reader(file);

                match rdr.headers() {
                    Ok(hdrs) => builder.headers = hdrs.iter().map(String::from).collect(),
                    Err(e) => {
                        builder.error = Some(Box::new(e));
                        return builder;
                    }
                }

                for result in rdr.records() {
                    match result {
                        Ok(record) => builder.data.push(record.iter().map(String::from).collect()),
                        Err(e) => {
                            builder.error = Some(Box::new(e));
                            break;
                        }
                    }
                }
            }
            Err(e) => builder.error = Some(Box::new(e)),
        }

        builder
    }

    /// Creates a `CsvBuilder` instance directly from a MySQL query.
    pub async fn from_mysql_query(
        username: &str,
        password: &str,
        server: &str,
        database: &str,
        sql_query: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let result =
            DbConnect::execute_mysql_query(username, password, server, database, sql_query).await?;

        Ok(CsvBuilder::from_raw_data(result.0, result.1))
    }

    /// Creates a `CsvBuilder` instance directly from a MySQL query with
    /// positional bound parameters, one per `?` placeholder in the query.
    pub async fn from_parameterized_mysql_query(
        username: &str,
        password: &str,
        server: &str,
        database: &str,
        sql_query: &str,
        params: Vec<String>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let result = DbConnect::execute_mysql_query_with_params(
            username, password, server, database, sql_query, params,
        )
        .await?;

        Ok(CsvBuilder::from_raw_data(result.0, result.1))
    }

    /// Sets the headers, replacing any existing ones.
    pub fn set_header(&mut self, header: Vec<&str>) -> &mut Self {
        self.headers = header.iter().map(|&h| h.to_string()).collect();
        self
    }

    /// Adds a single data row.
    pub fn add_row(&mut self, row: Vec<&str>) -> &mut Self {
        self.data.push(row.iter().map(|&r| r.to_string()).collect());
        self
    }

    /// Adds multiple data rows.
    pub fn add_rows(&mut self, rows: Vec<Vec<&str>>) -> &mut Self {
        for row in rows {
            self.add_row(row);
        }
        self
    }

    /// Indicates whether headers are set.
    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Indicates whether any data rows are present.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// Retrieves a reference to the headers, if any are set.
    pub fn get_headers(&self) -> Option<&[String]> {
        if self.has_headers() {
            Some(&self.headers)
        } else {
            None
        }
    }

    /// Retrieves a reference to the data rows, if any are present.
    pub fn get_data(&self) -> Option<&Vec<Vec<String>>> {
        if self.has_data() {
            Some(&self.data)
        } else {
            None
        }
    }

    /// Retrieves the error recorded by a fallible load, if any.
    pub fn get_error(&self) -> Option<&(dyn Error + 'static)> {
        self.error.as_deref()
    }

    /// Saves the table to `new_file_path`, picking the delimiter from the file
    /// extension: `.tsv` targets come out tab-separated, everything else
    /// comma-separated. The header row is always written, and short rows are
    /// padded with empty cells to the header width.
    ///
    /// ```
    /// use chembl_utils::csv_utils::CsvBuilder;
    ///
    /// let mut builder = CsvBuilder::new();
    /// builder
    ///     .set_header(vec!["chembl_id", "pref_name"])
    ///     .add_row(vec!["CHEMBL1431", "METFORMIN"]);
    /// builder.save_as("meds.tsv").expect("failed to save");
    /// ```
    pub fn save_as(&mut self, new_file_path: &str) -> Result<&mut Self, Box<dyn Error>> {
        let delimiter = if new_file_path.ends_with(".tsv") {
            b'\t'
        } else {
            b','
        };

        let file = File::create(new_file_path)?;
        let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(file);

        if !self.headers.is_empty() {
            wtr.write_record(&self.headers)?;
        }

        let headers_len = self.headers.len();
        for record in &mut self.data {
            while record.len() < headers_len {
                record.push("".to_string());
            }

            wtr.write_record(record.iter())?;
        }

        wtr.flush()?;

        Ok(self)
    }

    /// Renders the table as a JSON array of objects keyed by header.
    pub fn to_json(&self) -> Result<String, Box<dyn Error>> {
        let mut rows: Vec<Value> = Vec::new();

        for record in &self.data {
            let mut object = Map::new();
            for (i, header) in self.headers.iter().enumerate() {
                let cell = record.get(i).cloned().unwrap_or_default();
                object.insert(header.clone(), Value::String(cell));
            }
            rows.push(Value::Object(object));
        }

        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Prints the full table to the console, one width-capped column per
    /// header, followed by a row count.
    pub fn print_table_all_rows(&mut self) -> &mut Self {
        let max_cell_width: usize = 45; // Max width for any cell

        let mut max_lengths = self
            .headers
            .iter()
            .map(|h| h.len() + 1)
            .collect::<Vec<usize>>();
        for row in self.data.iter() {
            for (i, cell) in row.iter().enumerate() {
                if i < max_lengths.len() {
                    let current_max = std::cmp::max(max_lengths[i], cell.len());
                    max_lengths[i] = std::cmp::min(current_max, max_cell_width);
                }
            }
        }

        let format_cell = |s: &String, max_length: usize| -> String {
            format!("{:width$.width$}", s, width = max_length)
        };

        let table_width = max_lengths.iter().map(|&len| len + 1).sum::<usize>() + 1;

        println!(
            "\n|{}|",
            self.headers
                .iter()
                .zip(max_lengths.iter())
                .map(|(header, &max_length)| format_cell(header, max_length))
                .collect::<Vec<String>>()
                .join("|")
        );
        println!("{}", "-".repeat(table_width));

        for row in &self.data {
            println!(
                "|{}|",
                row.iter()
                    .zip(max_lengths.iter())
                    .map(|(cell, &max_length)| format_cell(cell, max_length))
                    .collect::<Vec<String>>()
                    .join("|")
            );
        }

        println!("\nTotal rows: {}", self.data.len());

        self
    }
}

impl Default for CsvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
