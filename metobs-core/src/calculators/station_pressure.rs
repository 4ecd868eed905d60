//! Station-Level Pressure from the Barometer Reading
//!
//! ## Background
//!
//! A mercury barometer reads the pressure at its cistern, which sits some
//! height above or below the station's reference level. Each station has a
//! printed correction table giving, for a dry-bulb temperature and a pressure
//! bracket, the correction to add to the reading:
//!
//! ```text
//! station_level_pressure = bar_as_read + cistern_level_pressure[T][bracket]
//! ```
//!
//! The same row may also carry a sea correction for the bracket, which is
//! reported alongside as `seaLevelReduction`.
//!
//! ## Lookup Rules
//!
//! - Dry bulb decodes by division (`"252"` / 10), then rounds half up.
//! - The temperature row must match exactly.
//! - The bracket is the one nearest the reading; equidistant readings take
//!   the lower bracket.
//!
//! ```text
//! bar as read 1012.5 hPa, brackets 1010 / 1015
//! → bracket 1010, correction -0.3
//! → station level 1012.2 hPa → "10122", heightDifference "-30"
//! ```

use crate::{
    codec::{self, Encoded, ReadingKind},
    constants::{CORRECTION_DIGITS, CORRECTION_SCALE},
    errors::{DeriveError, DeriveResult},
    tables::StationCorrectionRepository,
    traits::Calculator,
};

/// Raw fields needed for the station-level pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarometerReading<'a> {
    /// Station identifier
    pub station_id: &'a str,
    /// Dry-bulb field, 3 digits
    pub dry_bulb: &'a str,
    /// Barometer as read, 5 digits
    pub bar_as_read: &'a str,
}

/// Station-level pressure bundle
#[derive(Debug, Clone, PartialEq)]
pub struct StationPressure {
    /// Encoded station-level pressure
    pub station_level_pressure: Encoded,
    /// Encoded height correction, hundredths of hPa with sign
    pub height_difference: Encoded,
    /// Encoded sea correction from the same row, when the row has one
    pub sea_level_reduction: Option<Encoded>,
    /// Bracket the reading was matched to (hPa)
    pub bracket: f64,
    /// Height correction applied (hPa)
    pub height_correction: f64,
}

/// Station-level pressure from the per-station correction table
#[derive(Debug, Clone)]
pub struct StationPressureCalculator<R> {
    repository: R,
}

impl<R: StationCorrectionRepository> StationPressureCalculator<R> {
    /// Calculator reading tables from `repository`
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: StationCorrectionRepository> Calculator for StationPressureCalculator<R> {
    type Input<'a> = BarometerReading<'a>;
    type Output = StationPressure;

    fn compute(&self, input: BarometerReading<'_>) -> DeriveResult<StationPressure> {
        let dry_bulb = codec::decode_tenths(input.dry_bulb, ReadingKind::Temperature)?;
        let rounded_dry_bulb = codec::round_half_up(dry_bulb) as i32;
        let bar_as_read = codec::decode_five_digit_pressure(input.bar_as_read)?;

        let corrections = self.repository.corrections(input.station_id).ok_or_else(|| {
            log_warn!("No correction tables for station {}", input.station_id);
            DeriveError::StationNotFound { station: input.station_id.into() }
        })?;

        let entry = corrections.station_entry(rounded_dry_bulb).ok_or_else(|| {
            log_warn!(
                "Station {} has no height correction for {} °C",
                input.station_id, rounded_dry_bulb
            );
            DeriveError::TemperatureNotFound { temperature: rounded_dry_bulb }
        })?;

        let (bracket, height_correction) = entry
            .cistern_level_pressure
            .nearest(bar_as_read)
            .ok_or(DeriveError::EmptyBrackets { temperature: rounded_dry_bulb })?;

        let station_level = bar_as_read + height_correction;
        let sea_correction = entry.sea_level_pressure.get(bracket);

        log_debug!(
            "Station {} at {} °C: bar {} -> bracket {}, correction {}",
            input.station_id, rounded_dry_bulb, bar_as_read, bracket, height_correction
        );

        Ok(StationPressure {
            station_level_pressure: codec::encode_unsigned_pressure(station_level),
            height_difference: codec::encode_signed_delta(
                height_correction * CORRECTION_SCALE,
                CORRECTION_DIGITS,
            ),
            sea_level_reduction: sea_correction
                .map(|c| codec::encode_signed_delta(c * CORRECTION_SCALE, CORRECTION_DIGITS)),
            bracket,
            height_correction,
        })
    }

    fn name(&self) -> &'static str {
        "station_pressure"
    }
}
