//! Reference Tables
//!
//! Static data the calculators read from:
//!
//! - [`HygrometricTable`]: dew point and relative humidity by rounded dry
//!   bulb and dry/wet bulb difference. One table for every station.
//! - [`StationCorrections`]: per-station height correction and sea-level
//!   reduction tables, keyed by dry-bulb temperature and pressure bracket.
//!
//! Tables are immutable once built. Constructors check the structural
//! invariants (row lengths, unique keys, numeric brackets) so the calculators
//! never have to.
//!
//! ## Station Repository
//!
//! Calculators never reach for a global station map. They are handed a
//! [`StationCorrectionRepository`], which tests fill with fixtures and
//! applications back with whatever loaded the tables.
//!
//! ```
//! use std::sync::Arc;
//! use metobs_core::tables::{
//!     BracketTable, InMemoryStationRepository, StationCorrectionRepository,
//!     StationCorrections,
//! };
//!
//! let mut repo = InMemoryStationRepository::new();
//! repo.insert("41923", StationCorrections::default());
//! assert!(repo.corrections("41923").is_some());
//! assert!(repo.corrections("99999").is_none());
//! ```

mod hygrometric;
mod station;

pub use hygrometric::{HygrometricCell, HygrometricEntry, HygrometricTable};
pub use station::{
    BracketTable, SeaReductionEntry, SeaTable, StationCorrectionEntry, StationCorrections,
    StationTable,
};

use alloc::{collections::BTreeMap, string::String, sync::Arc};
use thiserror_no_std::Error;

/// Structural problems found while building a table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Row of the hygrometric table does not match the difference list
    #[error("Row for {dbt} °C has {found} values, expected {expected}")]
    RowLengthMismatch {
        /// Dry-bulb temperature of the row
        dbt: i32,
        /// Number of differences in the table
        expected: usize,
        /// Number of values in the row
        found: usize,
    },

    /// Two entries share a dry-bulb temperature
    #[error("Duplicate entry for {dbt} °C")]
    DuplicateTemperature {
        /// The repeated temperature
        dbt: i32,
    },

    /// Bracket key is not a number
    #[error("Pressure bracket {key:?} is not numeric")]
    InvalidBracket {
        /// The offending key
        key: String,
    },

    /// Two bracket keys parse to the same pressure
    #[error("Pressure bracket {key:?} appears twice")]
    DuplicateBracket {
        /// The repeated key
        key: String,
    },
}

/// Source of per-station correction tables
pub trait StationCorrectionRepository {
    /// Correction tables for `station_id`, if the station is known
    fn corrections(&self, station_id: &str) -> Option<Arc<StationCorrections>>;
}

impl<T: StationCorrectionRepository + ?Sized> StationCorrectionRepository for &T {
    fn corrections(&self, station_id: &str) -> Option<Arc<StationCorrections>> {
        (**self).corrections(station_id)
    }
}

impl<T: StationCorrectionRepository + ?Sized> StationCorrectionRepository for Arc<T> {
    fn corrections(&self, station_id: &str) -> Option<Arc<StationCorrections>> {
        (**self).corrections(station_id)
    }
}

/// Station map held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStationRepository {
    stations: BTreeMap<String, Arc<StationCorrections>>,
}

impl InMemoryStationRepository {
    /// Empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a station's tables
    pub fn insert(&mut self, station_id: impl Into<String>, corrections: StationCorrections) {
        self.stations.insert(station_id.into(), Arc::new(corrections));
    }

    /// Number of stations loaded
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// True when no station is loaded
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station identifiers in order
    pub fn station_ids(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }
}

impl StationCorrectionRepository for InMemoryStationRepository {
    fn corrections(&self, station_id: &str) -> Option<Arc<StationCorrections>> {
        self.stations.get(station_id).cloned()
    }
}

impl<K: Into<String>> FromIterator<(K, StationCorrections)> for InMemoryStationRepository {
    fn from_iter<I: IntoIterator<Item = (K, StationCorrections)>>(iter: I) -> Self {
        let mut repo = Self::new();
        for (id, corrections) in iter {
            repo.insert(id, corrections);
        }
        repo
    }
}
