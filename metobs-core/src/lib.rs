//! Derived-value engine for METOBS observation forms
//!
//! Turns raw instrument readings typed into an observation form into the
//! derived quantities the form reports:
//!
//! - dew point and relative humidity from dry/wet bulb temperatures
//! - station-level pressure from the barometer reading
//! - sea-level pressure from station-level pressure
//! - 24-hour pressure change against the prior observation
//!
//! Readings travel as fixed-width digit strings with an implicit decimal
//! point (`"256"` is 25.6 °C, `"10142"` is 1014.2 hPa) and results are encoded
//! back into the same shape, ready to be written into form state.
//!
//! Key constraints:
//! - Pure, synchronous computations with no I/O
//! - Reference tables are immutable and shared
//! - Each output bundle is all-or-nothing
//!
//! ```
//! use metobs_core::{
//!     calculators::{PressureChangeCalculator, PressureChangeInput},
//!     traits::Calculator,
//! };
//!
//! let change = PressureChangeCalculator
//!     .compute(PressureChangeInput { current: "10130", previous: Some("10142") })
//!     .unwrap();
//! assert_eq!(change.as_str(), "+0012");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

// Optional logging: expands to the `log` facade when enabled, to nothing otherwise
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod calculators;
pub mod codec;
pub mod constants;
pub mod errors;
pub mod lookup;
pub mod observation;
pub mod tables;
pub mod traits;

// Public API
pub use codec::Encoded;
pub use errors::{DeriveError, DeriveResult};
pub use lookup::LookupStrategy;
pub use observation::{
    Bundle, DerivationReport, DerivedObservation, ObservationDeriver, PriorObservationSource,
    RawObservation,
};
pub use tables::{
    BracketTable, HygrometricTable, InMemoryStationRepository, StationCorrectionRepository,
    StationCorrections,
};
pub use traits::Calculator;

/// Crate version, as published
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
