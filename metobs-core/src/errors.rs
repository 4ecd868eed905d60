//! Error Types for Derived-Value Computations
//!
//! Every failure here is recoverable: the observer corrects the offending
//! field and the computation runs again on the next edit. None of them abort
//! the form session, and none of them leave a half-written output bundle.
//!
//! ## Error Categories
//!
//! ### Input
//! - `InvalidInput`: a raw field is empty or breaks the fixed-width digit
//!   contract. Callers skip the computation and leave derived fields unset.
//!
//! ### Table coverage
//! - `OutOfRange`: the decoded dry bulb or bulb difference falls outside what
//!   the hygrometric table covers.
//! - `DifferenceNotFound`: the bulb difference is not a row of the
//!   hygrometric table. There is no nearest-row fallback.
//! - `TemperatureNotFound`: no table entry for the rounded dry bulb.
//! - `EmptyBrackets`: a correction entry exists but carries no pressure
//!   brackets to match against.
//!
//! ### Configuration
//! - `StationNotFound`: the station has no correction tables loaded. Usually
//!   means the station map was not loaded before the form opened.
//!
//! ```rust
//! use metobs_core::{DeriveError, codec};
//!
//! match codec::decode_temperature("2x6") {
//!     Ok(_) => unreachable!(),
//!     Err(DeriveError::InvalidInput { field, .. }) => assert_eq!(field, "temperature"),
//!     Err(other) => panic!("unexpected {other}"),
//! }
//! ```

use alloc::string::String;
use thiserror_no_std::Error;

/// Result type for derived-value computations
pub type DeriveResult<T> = Result<T, DeriveError>;

/// Failures of a single derived-value computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeriveError {
    /// Raw field is empty or not a fixed-width digit string
    #[error("Invalid {field} reading: {reason}")]
    InvalidInput {
        /// Which kind of field was rejected
        field: &'static str,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Dry bulb or bulb difference outside table coverage
    #[error("Dry bulb {dry_bulb} °C / difference {difference} °C outside table coverage")]
    OutOfRange {
        /// Rounded dry-bulb temperature (°C)
        dry_bulb: i32,
        /// Dry/wet bulb difference (°C, one decimal)
        difference: f64,
    },

    /// Bulb difference is not an exact row of the hygrometric table
    #[error("No hygrometric row for difference {difference} °C")]
    DifferenceNotFound {
        /// The difference that was looked up
        difference: f64,
    },

    /// No table entry for this rounded dry-bulb temperature
    #[error("No table entry for dry bulb {temperature} °C")]
    TemperatureNotFound {
        /// Rounded dry-bulb temperature (°C)
        temperature: i32,
    },

    /// Station identifier has no correction tables
    #[error("Station {station} not found in correction tables")]
    StationNotFound {
        /// The station identifier that was requested
        station: String,
    },

    /// Correction entry has no pressure brackets
    #[error("Correction entry for {temperature} °C has no pressure brackets")]
    EmptyBrackets {
        /// Dry-bulb temperature of the empty entry (°C)
        temperature: i32,
    },
}

impl DeriveError {
    /// True for failures caused by what the observer typed, as opposed to
    /// missing reference data
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::OutOfRange { .. }
                | Self::DifferenceNotFound { .. }
        )
    }
}
