// db_utils.rs
use crate::csv_utils::CsvBuilder;
use mysql_async::prelude::*;
use mysql_async::{OptsBuilder, Params, Pool, Row as MySqlRow, Value};

/// Represents a database connection manager for handling database operations
pub struct DbConnect;

/// Implementation block for DbConnect, providing methods for database interactions
impl DbConnect {
    /// Executes a read-only SQL query against a MySQL database and returns the
    /// results or an error
    pub async fn execute_mysql_query(
        username: &str,
        password: &str,
        server: &str,
        database: &str,
        sql_query: &str,
    ) -> Result<(Vec<String>, Vec<Vec<String>>), Box<dyn std::error::Error + Send + Sync>> {
        Self::execute_mysql_query_with_params(
            username,
            password,
            server,
            database,
            sql_query,
            Vec::new(),
        )
        .await
    }

    /// Executes a read-only SQL query with positional bound parameters, one per
    /// `?` placeholder, against a MySQL database and returns the results or an
    /// error. Binding the values server-side sidesteps both quoting bugs and
    /// injection via the interpolated literals a formatted query would carry.
    pub async fn execute_mysql_query_with_params(
        username: &str,
        password: &str,
        server: &str,
        database: &str,
        sql_query: &str,
        params: Vec<String>,
    ) -> Result<(Vec<String>, Vec<Vec<String>>), Box<dyn std::error::Error + Send + Sync>> {
        // Create an OptsBuilder instance and set the connection details
        let builder = OptsBuilder::default()
            .user(Some(username))
            .pass(Some(password))
            .ip_or_hostname(server)
            .db_name(Some(database));

        // Create a pool with the constructed Opts
        let pool = Pool::new(builder);
        let mut conn = match pool.get_conn().await {
            Ok(conn) => conn,
            Err(e) => {
                let _ = pool.disconnect().await;
                return Err(e.into());
            }
        };

        let bound_params = if params.is_empty() {
            Params::Empty
        } else {
            Params::Positional(params.into_iter().map(Value::from).collect())
        };

        // Perform the query as a prepared statement; hold the outcome so the
        // pool still gets a clean shutdown when the query fails. The query
        // error wins over a disconnect error.
        let exec_result: Result<Vec<MySqlRow>, mysql_async::Error> =
            conn.exec(sql_query, bound_params).await;

        drop(conn);
        let disconnect_result = pool.disconnect().await;
        let result = exec_result?;
        disconnect_result?;

        // Process the result
        let mut headers = Vec::new();
        let mut data = Vec::new();

        if let Some(first_row) = result.first() {
            headers = first_row
                .columns_ref()
                .iter()
                .map(|col| col.name_str().to_string())
                .collect::<Vec<String>>();
        }

        for row in result {
            let row_data = (0..headers.len())
                .map(|i| match row.get_opt::<Value, usize>(i) {
                    Some(Ok(value)) => render_cell(value),
                    _ => String::new(),
                })
                .collect::<Vec<String>>();
            data.push(row_data);
        }

        Ok((headers, data))
    }

    /// Retrieves and lists the base tables of the specified MySQL database
    pub async fn print_mysql_tables(
        username: &str,
        password: &str,
        server: &str,
        database: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let table_query = "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'";

        let mut tables_result = CsvBuilder::from_parameterized_mysql_query(
            username,
            password,
            server,
            database,
            table_query,
            vec![database.to_string()],
        )
        .await?;
        tables_result.print_table_all_rows();

        Ok(())
    }
}

/// Renders a MySQL cell value as the string that should appear in a table cell.
/// NULL becomes an empty cell, matching the pandas `to_csv` rendering the
/// original TSV exports had.
fn render_cell(value: Value) -> String {
    match value {
        Value::NULL => String::new(),
        Value::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        other => other.as_sql(true).trim_matches('\'').to_string(),
    }
}
