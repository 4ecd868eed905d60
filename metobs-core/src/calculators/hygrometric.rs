//! Dew Point and Relative Humidity from Dry/Wet Bulb Readings
//!
//! ## Psychrometry Background
//!
//! A wet-bulb thermometer is cooled by evaporation from its wick, so it reads
//! lower than the dry bulb unless the air is saturated. The drier the air,
//! the larger the gap:
//!
//! ```text
//! Dry bulb   Wet bulb   Difference   Meaning
//! ---------------------------------------------------
//! 25.2 °C    25.2 °C    0.0          Saturated, RH 100%
//! 25.2 °C    24.8 °C    0.4          Near saturation
//! 25.2 °C    18.0 °C    7.2          Dry air
//! ```
//!
//! The station uses a printed hygrometric table rather than a formula: the
//! rounded dry bulb selects a row, the bulb difference selects a column, and
//! the cell gives dew point and relative humidity.
//!
//! ## Lookup Rules
//!
//! 1. Both bulbs decode with the split convention (`"252"` → 25.2).
//! 2. `difference = round(|dry - wet|, 1)`.
//! 3. `rounded_dry_bulb = round(dry)`, halves up.
//! 4. Outside 0..=50 °C or a difference above 30.0 is out of range.
//! 5. The difference must be an exact column. 0.3 against columns
//!    `[0.0, 0.5, 1.0]` fails; it does not snap to 0.5.
//! 6. The rounded dry bulb must be an exact row.
//!
//! ## Usage Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use metobs_core::calculators::{HygrometricCalculator, HygrometricLimits};
//! use metobs_core::tables::HygrometricTable;
//!
//! let table = Arc::new(HygrometricTable::new(vec![0.0], vec![])?);
//!
//! // Standard table coverage
//! let standard = HygrometricCalculator::new(table.clone());
//!
//! // Tropical station whose printed table stops at a 20 °C difference
//! let tropical = HygrometricCalculator::with_limits(
//!     table,
//!     HygrometricLimits::new_with_limits(10, 50, 20.0),
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use alloc::sync::Arc;

use crate::{
    codec::{self, Encoded},
    constants::{
        HYGROMETRIC_MAX_DIFFERENCE_C, HYGROMETRIC_MAX_DRY_BULB_C, HYGROMETRIC_MIN_DRY_BULB_C,
    },
    errors::{DeriveError, DeriveResult},
    tables::HygrometricTable,
    traits::Calculator,
};

/// Coverage of the hygrometric table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HygrometricLimits {
    /// Lowest rounded dry bulb (°C)
    min_dry_bulb_c: i32,

    /// Highest rounded dry bulb (°C)
    max_dry_bulb_c: i32,

    /// Largest bulb difference (°C)
    max_difference_c: f64,
}

impl Default for HygrometricLimits {
    fn default() -> Self {
        Self {
            min_dry_bulb_c: HYGROMETRIC_MIN_DRY_BULB_C,
            max_dry_bulb_c: HYGROMETRIC_MAX_DRY_BULB_C,
            max_difference_c: HYGROMETRIC_MAX_DIFFERENCE_C,
        }
    }
}

impl HygrometricLimits {
    /// Create limits for a table with custom coverage
    pub fn new_with_limits(
        min_dry_bulb_c: i32,
        max_dry_bulb_c: i32,
        max_difference_c: f64,
    ) -> Self {
        Self {
            min_dry_bulb_c,
            max_dry_bulb_c,
            max_difference_c: libm::fabs(max_difference_c),
        }
    }

    /// Check a rounded dry bulb and difference against coverage
    pub fn check(&self, rounded_dry_bulb: i32, difference: f64) -> DeriveResult<()> {
        if rounded_dry_bulb < self.min_dry_bulb_c
            || rounded_dry_bulb > self.max_dry_bulb_c
            || difference > self.max_difference_c
        {
            return Err(DeriveError::OutOfRange { dry_bulb: rounded_dry_bulb, difference });
        }
        Ok(())
    }
}

/// Raw dry and wet bulb fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulbReadings<'a> {
    /// Dry-bulb field, 3 digits
    pub dry_bulb: &'a str,
    /// Wet-bulb field, 3 digits
    pub wet_bulb: &'a str,
}

/// Hygrometric result plus the intermediate values shown to the observer
#[derive(Debug, Clone, PartialEq)]
pub struct HygrometricReading {
    /// Encoded dew point (`Td`)
    pub dew_point: Encoded,
    /// Encoded relative humidity
    pub relative_humidity: Encoded,
    /// Decoded dry bulb (°C)
    pub dry_bulb: f64,
    /// Decoded wet bulb (°C)
    pub wet_bulb: f64,
    /// Bulb difference used for the lookup (°C)
    pub difference: f64,
}

/// Dew point and relative humidity by table lookup
#[derive(Debug, Clone)]
pub struct HygrometricCalculator {
    table: Arc<HygrometricTable>,
    limits: HygrometricLimits,
}

impl HygrometricCalculator {
    /// Calculator with standard table coverage
    pub fn new(table: Arc<HygrometricTable>) -> Self {
        Self::with_limits(table, HygrometricLimits::default())
    }

    /// Calculator with custom table coverage
    pub fn with_limits(table: Arc<HygrometricTable>, limits: HygrometricLimits) -> Self {
        Self { table, limits }
    }

    /// Table in use
    pub fn table(&self) -> &HygrometricTable {
        &self.table
    }

    /// Shared handle to the table in use
    pub fn shared_table(&self) -> Arc<HygrometricTable> {
        Arc::clone(&self.table)
    }
}

impl Calculator for HygrometricCalculator {
    type Input<'a> = BulbReadings<'a>;
    type Output = HygrometricReading;

    fn compute(&self, input: BulbReadings<'_>) -> DeriveResult<HygrometricReading> {
        let dry_bulb = codec::decode_temperature(input.dry_bulb)?;
        let wet_bulb = codec::decode_temperature(input.wet_bulb)?;

        let difference = codec::round_to_tenth(libm::fabs(dry_bulb - wet_bulb));
        let rounded_dry_bulb = codec::round_half_up(dry_bulb) as i32;

        self.limits.check(rounded_dry_bulb, difference)?;

        let index = self.table.difference_index(difference).ok_or_else(|| {
            log_warn!("No hygrometric column for difference {}", difference);
            DeriveError::DifferenceNotFound { difference }
        })?;

        let cell = self.table.cell(rounded_dry_bulb, index).ok_or_else(|| {
            log_warn!("No hygrometric row for dry bulb {}", rounded_dry_bulb);
            DeriveError::TemperatureNotFound { temperature: rounded_dry_bulb }
        })?;

        log_debug!(
            "Hygrometric lookup ({}, {}) -> DpT {} RH {}",
            rounded_dry_bulb, difference, cell.dpt, cell.rh
        );

        Ok(HygrometricReading {
            dew_point: codec::encode_dew_point(cell.dpt),
            relative_humidity: codec::encode_relative_humidity(cell.rh),
            dry_bulb,
            wet_bulb,
            difference,
        })
    }

    fn name(&self) -> &'static str {
        "hygrometric"
    }
}
