//! Derived-Value Calculators
//!
//! ## Overview
//!
//! Four calculators turn raw form fields into the derived values of an
//! observation:
//!
//! ```text
//!  dry bulb ─┬─► HygrometricCalculator ──► Td, relativeHumidity
//!  wet bulb ─┘
//!
//!  dry bulb ─┬─► StationPressureCalculator ─┬─► stationLevelPressure,
//!  barometer ┘                              │   heightDifference,
//!                                           │   seaLevelReduction
//!                                           │
//!                                           ├─► SeaLevelCalculator ──► seaLevelReduction,
//!                                           │                          correctedSeaLevelPressure
//!                                           │
//!  prior day's station pressure ────────────┴─► PressureChangeCalculator ──► pressureChange24h
//! ```
//!
//! The hygrometric and station-pressure paths are independent. Sea-level
//! reduction and the 24-hour change both consume the station-level pressure,
//! so they only run after it has been computed.
//!
//! ## Decode Conventions
//!
//! The hygrometric path decodes temperatures by splitting the string
//! ([`decode_temperature`](crate::codec::decode_temperature)); the pressure
//! paths divide by ten ([`decode_tenths`](crate::codec::decode_tenths)).
//! Each calculator states which rule it uses.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use metobs_core::calculators::{BulbReadings, HygrometricCalculator};
//! use metobs_core::tables::{HygrometricCell, HygrometricEntry, HygrometricTable};
//! use metobs_core::Calculator;
//!
//! let table = HygrometricTable::new(
//!     vec![0.0, 0.4],
//!     vec![HygrometricEntry {
//!         dbt: 25,
//!         values: vec![
//!             HygrometricCell { dpt: 25.0, rh: 100.0 },
//!             HygrometricCell { dpt: 24.4, rh: 97.0 },
//!         ],
//!     }],
//! )?;
//!
//! let calculator = HygrometricCalculator::new(Arc::new(table));
//! let reading = calculator.compute(BulbReadings { dry_bulb: "252", wet_bulb: "248" })?;
//! assert_eq!(reading.dew_point.as_str(), "244");
//! assert_eq!(reading.relative_humidity.as_str(), "097");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod hygrometric;
mod pressure_change;
mod sea_level;
mod station_pressure;

pub use hygrometric::{BulbReadings, HygrometricCalculator, HygrometricLimits, HygrometricReading};
pub use pressure_change::{PressureChangeCalculator, PressureChangeInput};
pub use sea_level::{SeaLevelCalculator, SeaLevelPressure, StationPressureReading};
pub use station_pressure::{BarometerReading, StationPressure, StationPressureCalculator};
