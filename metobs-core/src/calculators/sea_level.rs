//! Sea-Level Pressure from Station-Level Pressure
//!
//! Second per-station table: for a dry-bulb temperature and a station-level
//! pressure bracket, the reduction to add to reach mean sea level.
//!
//! ```text
//! sea_level_pressure = station_level_pressure + station_level_pressure_table[T][bracket]
//! ```
//!
//! Same matching rules as the station-level step: division decode for the
//! dry bulb, exact temperature row, nearest bracket with ties to the lower.
//! The input is the encoded station-level pressure, so this runs after
//! [`StationPressureCalculator`](super::StationPressureCalculator).

use crate::{
    codec::{self, Encoded, ReadingKind},
    constants::{CORRECTION_DIGITS, CORRECTION_SCALE},
    errors::{DeriveError, DeriveResult},
    tables::StationCorrectionRepository,
    traits::Calculator,
};

/// Fields needed for the sea-level reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationPressureReading<'a> {
    /// Station identifier
    pub station_id: &'a str,
    /// Dry-bulb field, 3 digits
    pub dry_bulb: &'a str,
    /// Encoded station-level pressure, 5 digits
    pub station_level_pressure: &'a str,
}

/// Sea-level pressure bundle
#[derive(Debug, Clone, PartialEq)]
pub struct SeaLevelPressure {
    /// Encoded reduction, hundredths of hPa with sign
    pub sea_level_reduction: Encoded,
    /// Encoded sea-level pressure
    pub corrected_sea_level_pressure: Encoded,
    /// Bracket the station pressure was matched to (hPa)
    pub bracket: f64,
}

/// Sea-level pressure from the per-station reduction table
#[derive(Debug, Clone)]
pub struct SeaLevelCalculator<R> {
    repository: R,
}

impl<R: StationCorrectionRepository> SeaLevelCalculator<R> {
    /// Calculator reading tables from `repository`
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: StationCorrectionRepository> Calculator for SeaLevelCalculator<R> {
    type Input<'a> = StationPressureReading<'a>;
    type Output = SeaLevelPressure;

    fn compute(&self, input: StationPressureReading<'_>) -> DeriveResult<SeaLevelPressure> {
        let dry_bulb = codec::decode_tenths(input.dry_bulb, ReadingKind::Temperature)?;
        let rounded_dry_bulb = codec::round_half_up(dry_bulb) as i32;
        let station_pressure = codec::decode_five_digit_pressure(input.station_level_pressure)?;

        let corrections = self.repository.corrections(input.station_id).ok_or_else(|| {
            log_warn!("No correction tables for station {}", input.station_id);
            DeriveError::StationNotFound { station: input.station_id.into() }
        })?;

        let entry = corrections.sea_entry(rounded_dry_bulb).ok_or_else(|| {
            log_warn!(
                "Station {} has no sea-level reduction for {} °C",
                input.station_id, rounded_dry_bulb
            );
            DeriveError::TemperatureNotFound { temperature: rounded_dry_bulb }
        })?;

        let (bracket, reduction) = entry
            .station_level_pressure
            .nearest(station_pressure)
            .ok_or(DeriveError::EmptyBrackets { temperature: rounded_dry_bulb })?;

        log_debug!(
            "Station {} at {} °C: station pressure {} -> bracket {}, reduction {}",
            input.station_id, rounded_dry_bulb, station_pressure, bracket, reduction
        );

        Ok(SeaLevelPressure {
            sea_level_reduction: codec::encode_signed_delta(
                reduction * CORRECTION_SCALE,
                CORRECTION_DIGITS,
            ),
            corrected_sea_level_pressure: codec::encode_unsigned_pressure(
                station_pressure + reduction,
            ),
            bracket,
        })
    }

    fn name(&self) -> &'static str {
        "sea_level"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{
        BracketTable, InMemoryStationRepository, SeaReductionEntry, SeaTable, StationCorrections,
    };
    use alloc::vec;

    fn repository() -> InMemoryStationRepository {
        let corrections = StationCorrections {
            sea: SeaTable {
                correction_table: vec![SeaReductionEntry {
                    dry_bulb_temp_c: 25,
                    station_level_pressure: BracketTable::new([(1000.0, 0.5), (1010.0, 0.4)]),
                }],
            },
            ..Default::default()
        };
        [("41923", corrections)].into_iter().collect()
    }

    fn reading(station_level_pressure: &str) -> StationPressureReading<'_> {
        StationPressureReading { station_id: "41923", dry_bulb: "252", station_level_pressure }
    }

    #[test]
    fn adds_the_nearest_reduction() {
        let calc = SeaLevelCalculator::new(repository());
        let result = calc.compute(reading("10092")).unwrap();
        assert_eq!(result.bracket, 1010.0);
        assert_eq!(result.sea_level_reduction.as_str(), "+40");
        assert_eq!(result.corrected_sea_level_pressure.as_str(), "10096");
    }

    #[test]
    fn equidistant_pressure_takes_the_lower_bracket() {
        let calc = SeaLevelCalculator::new(repository());
        let result = calc.compute(reading("10050")).unwrap();
        assert_eq!(result.bracket, 1000.0);
        assert_eq!(result.sea_level_reduction.as_str(), "+50");
        assert_eq!(result.corrected_sea_level_pressure.as_str(), "10055");
    }

    #[test]
    fn missing_station_or_temperature_is_reported() {
        let calc = SeaLevelCalculator::new(repository());
        let err = calc
            .compute(StationPressureReading {
                station_id: "12345",
                dry_bulb: "252",
                station_level_pressure: "10092",
            })
            .unwrap_err();
        assert!(matches!(err, DeriveError::StationNotFound { .. }));

        let err = calc
            .compute(StationPressureReading {
                station_id: "41923",
                dry_bulb: "310",
                station_level_pressure: "10092",
            })
            .unwrap_err();
        assert_eq!(err, DeriveError::TemperatureNotFound { temperature: 31 });
    }
}
