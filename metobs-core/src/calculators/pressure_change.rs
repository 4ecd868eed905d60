//! 24-Hour Pressure Change
//!
//! Difference between yesterday's and today's station-level pressure, both
//! taken as their encoded 5-digit integers (tenths of hPa):
//!
//! ```text
//! previous "10142", current "10130" → 10142 - 10130 = 12 → "+0012"
//! previous absent                   →                     "0000"
//! previous "10130", current "10130" → 0                 → "-0000"
//! ```
//!
//! The subtraction is done on the integers, not on decoded hPa values, and
//! only a strictly positive change takes `+`. A zero change is written
//! `"-0000"`; stored observations were encoded that way and downstream
//! comparisons match on the string.

use crate::{
    codec::{self, Encoded, RawReading, ReadingKind},
    constants::{NO_PRIOR_PRESSURE_CHANGE, PRESSURE_CHANGE_DIGITS},
    errors::DeriveResult,
    traits::Calculator,
};

/// Today's and the prior observation's station-level pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureChangeInput<'a> {
    /// Encoded station-level pressure just computed
    pub current: &'a str,
    /// Encoded station-level pressure of the prior observation
    pub previous: Option<&'a str>,
}

/// 24-hour station-level pressure change
#[derive(Debug, Clone, Copy, Default)]
pub struct PressureChangeCalculator;

impl Calculator for PressureChangeCalculator {
    type Input<'a> = PressureChangeInput<'a>;
    type Output = Encoded;

    fn compute(&self, input: PressureChangeInput<'_>) -> DeriveResult<Encoded> {
        let current = RawReading::parse(input.current, ReadingKind::Pressure)?;

        let Some(previous) = input.previous else {
            let mut out = Encoded::new();
            let _ = out.push_str(NO_PRIOR_PRESSURE_CHANGE);
            return Ok(out);
        };
        let previous = RawReading::parse(previous, ReadingKind::Pressure)?;

        let delta = i64::from(previous.integer_value()) - i64::from(current.integer_value());
        let sign = if delta > 0 { '+' } else { '-' };

        Ok(codec::signed(sign, delta.unsigned_abs(), PRESSURE_CHANGE_DIGITS))
    }

    fn name(&self) -> &'static str {
        "pressure_change"
    }
}
