// lib.rs
//! # CHEMBL UTILS
//!
//! RUST utilities to query the ChEMBL chemical database by generic drug names and
//! wrangle the results as CSV/TSV tables. The library replicates the classic
//! Python `chembl_downloader` drug-lookup workflow with simple, elegant syntax,
//! while fixing its string-interpolated SQL: every query ships with positional
//! bound parameters instead of formatted name literals.
//!
//! ## `drug_utils`
//!
//! - **Purpose**: Translate a list of generic drug names into a table of ChEMBL metadata.
//! - **Features**:
//!   - **Query Builder**: Builds the four-column `molecule_dictionary` JOIN
//!     `compound_structures` SELECT with one placeholder per distinct drug name, so
//!     single-name and multi-name lookups share one code path.
//!   - **Executor Seam**: Dispatch goes through the `ChemblExecutor` trait; the bundled
//!     `ChemblMySql` executor targets a ChEMBL MYSQL dump, and tests can swap in their own.
//!   - **Optional Persistence**: `SaveOptions` gates an additional tab-separated file write
//!     (`<file_stem>.tsv`) without changing what the call returns.
//!   - **Typed Rows**: Convert result tables into serde-friendly `DrugRecord` structs.
//!
//! ## `db_utils`
//!
//! - **Purpose**: Query MYSQL servers with simple elegant syntax.
//! - **Features**:
//!   - Execute read-only queries, plain or with positional bound parameters.
//!   - Print the base tables of a database for quick schema orientation.
//!
//! ## `csv_utils`
//!
//! - **Purpose**: A toolkit to hold, print, load and save tabular query results.
//! - **Features**:
//!   - **CsvBuilder**: Set custom headers, add rows, or build straight from a MYSQL query.
//!   - **Flexible Saving Options**: `save_as` picks the delimiter from the file extension,
//!     so `.tsv` targets come out tab-separated.
//!   - **JSON Conversion**: Render any table as an array of JSON objects keyed by header.
//!
//! ## License
//!
//! This project is licensed under the MIT License - see the LICENSE file for details.

pub mod csv_utils;
pub mod db_utils;
pub mod drug_utils;
