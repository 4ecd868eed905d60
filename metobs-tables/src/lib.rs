//! Reference Tables for the METOBS Derived-Value Engine
//!
//! ## Overview
//!
//! `metobs-core` computes nothing without its reference data: one hygrometric
//! table shared by every station and a pair of correction tables per station.
//! This crate loads those tables from JSON, checks them before they are used,
//! and keeps them in a registry the calculators can read from.
//!
//! ## Document Layout
//!
//! Hygrometric table:
//!
//! ```json
//! {
//!   "differences": [0.0, 0.5, 1.0],
//!   "entries": [
//!     { "dbT": 25,
//!       "values": [ {"DpT": 25.0, "RH": 100}, {"DpT": 24.3, "RH": 96}, {"DpT": 23.6, "RH": 92} ] }
//!   ]
//! }
//! ```
//!
//! Station corrections (a station map is an object of these keyed by
//! station id):
//!
//! ```json
//! {
//!   "station": { "correction_table": [
//!     { "dry_bulb_temp_c": 25,
//!       "cistern_level_pressure": { "1010": -0.3, "1015": -0.2 },
//!       "sea_level_pressure": { "1010": 0.12 } }
//!   ] },
//!   "sea": { "correction_table": [
//!     { "dry_bulb_temp_c": 25, "station_level_pressure": { "1000": 0.5, "1010": 0.4 } }
//!   ] }
//! }
//! ```
//!
//! ## Loading
//!
//! Every document goes through the same steps:
//!
//! 1. **Parse**: serde checks the layout, the table constructors check the
//!    shape (row lengths, duplicate keys, numeric brackets).
//! 2. **Validate**: [`validation`] checks coverage and plausibility. Errors
//!    reject the document, warnings are logged.
//!
//! ```rust
//! use metobs_tables::load_hygrometric_table;
//!
//! let table = load_hygrometric_table(r#"{
//!     "differences": [0.0, 0.5],
//!     "entries": [{ "dbT": 25, "values": [{"DpT": 25.0, "RH": 100}, {"DpT": 24.3, "RH": 96}] }]
//! }"#)?;
//! assert_eq!(table.differences(), &[0.0, 0.5]);
//! # Ok::<(), metobs_tables::TableError>(())
//! ```
//!
//! Readers and files use [`read_document`] and [`open_document`] with the
//! document type spelled out:
//!
//! ```no_run
//! use metobs_tables::{open_document, StationMap};
//!
//! let stations: StationMap = open_document("tables/stations.json")?;
//! # Ok::<(), metobs_tables::TableError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use log::{debug, info, warn};
use metobs_core::tables::{HygrometricTable, StationCorrections};
use serde::de::DeserializeOwned;

pub mod registry;
pub mod validation;

pub use registry::TableRegistry;
pub use validation::{Severity, ValidationIssue, ValidationReport};

/// Station corrections keyed by station id
pub type StationMap = BTreeMap<String, StationCorrections>;

/// Result alias for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Table loading and registry errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum TableError {
    /// Document is not valid JSON or does not match the table layout
    #[error("Failed to parse table: {0}")]
    Parse(String),

    /// Document could not be read
    #[error("Failed to read table: {0}")]
    Io(String),

    /// Document parsed but failed validation
    #[error("Invalid table: {0}")]
    Invalid(String),

    /// Requested table is not registered
    #[error("Table not found: {0}")]
    NotFound(String),

    /// A registry lock was poisoned by a panicking writer
    #[error("Table registry lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        TableError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::Io(err.to_string())
    }
}

/// A reference document that can be loaded and validated
pub trait TableDocument: DeserializeOwned {
    /// Name used in logs and error messages
    const KIND: &'static str;

    /// Check coverage and plausibility beyond what parsing enforces
    fn validate(&self) -> ValidationReport;
}

/// Parse and validate a document held in memory
pub fn parse_document<T: TableDocument>(json: &str) -> TableResult<T> {
    accept(serde_json::from_str(json)?)
}

/// Parse and validate a document from any reader
pub fn read_document<T: TableDocument, R: Read>(reader: R) -> TableResult<T> {
    accept(serde_json::from_reader(BufReader::new(reader))?)
}

/// Parse and validate a document from a file
pub fn open_document<T: TableDocument>(path: impl AsRef<Path>) -> TableResult<T> {
    let path = path.as_ref();
    info!("Loading {} from {}", T::KIND, path.display());

    let file = File::open(path)
        .map_err(|err| TableError::Io(format!("{}: {}", path.display(), err)))?;
    read_document(file)
}

/// Load the hygrometric table from JSON
pub fn load_hygrometric_table(json: &str) -> TableResult<HygrometricTable> {
    parse_document(json)
}

/// Load one station's correction tables from JSON
pub fn load_station_corrections(json: &str) -> TableResult<StationCorrections> {
    parse_document(json)
}

/// Load a `{stationId: corrections}` document
pub fn load_station_map(json: &str) -> TableResult<StationMap> {
    parse_document(json)
}

/// Reject documents with validation errors, log the warnings
pub(crate) fn accept<T: TableDocument>(document: T) -> TableResult<T> {
    let report = document.validate();

    for issue in &report.warnings {
        warn!("{} {}", T::KIND, issue);
    }

    if !report.is_valid() {
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        return Err(TableError::Invalid(format!("{}: {}", T::KIND, errors.join("; "))));
    }

    debug!("Accepted {} with {} warning(s)", T::KIND, report.warnings.len());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "differences": [0.0, 0.5],
        "entries": [
            { "dbT": 25, "values": [{"DpT": 25.0, "RH": 100}, {"DpT": 24.3, "RH": 96}] }
        ]
    }"#;

    #[test]
    fn loads_a_hygrometric_table() {
        let table = load_hygrometric_table(TABLE).unwrap();
        assert_eq!(table.difference_index(0.5), Some(1));
        assert_eq!(table.cell(25, 1).map(|c| c.rh), Some(96.0));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(load_hygrometric_table("{"), Err(TableError::Parse(_))));
    }

    #[test]
    fn shape_errors_surface_as_parse_errors() {
        let short_row = r#"{
            "differences": [0.0, 0.5],
            "entries": [{ "dbT": 25, "values": [{"DpT": 25.0, "RH": 100}] }]
        }"#;
        let err = load_hygrometric_table(short_row).unwrap_err();
        assert!(matches!(&err, TableError::Parse(msg) if msg.contains("expected 2")));
    }

    #[test]
    fn validation_errors_reject_the_document() {
        let bad_rh = r#"{
            "differences": [0.0],
            "entries": [{ "dbT": 25, "values": [{"DpT": 25.0, "RH": 140}] }]
        }"#;
        assert!(matches!(load_hygrometric_table(bad_rh), Err(TableError::Invalid(_))));
    }

    #[test]
    fn off_grid_difference_rejects_the_document() {
        let quarter = r#"{
            "differences": [0.0, 0.25],
            "entries": [
                { "dbT": 25, "values": [{"DpT": 25.0, "RH": 100}, {"DpT": 24.6, "RH": 97}] }
            ]
        }"#;
        let err = load_hygrometric_table(quarter).unwrap_err();
        assert!(matches!(&err, TableError::Invalid(msg) if msg.contains("difference 0.25")));
    }

    #[test]
    fn reads_from_any_reader() {
        let table: HygrometricTable = read_document(TABLE.as_bytes()).unwrap();
        assert_eq!(table.entries().len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result: TableResult<StationMap> = open_document("/nonexistent/stations.json");
        assert!(matches!(result, Err(TableError::Io(msg)) if msg.contains("stations.json")));
    }
}
