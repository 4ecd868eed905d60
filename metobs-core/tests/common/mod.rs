//! Shared fixtures for integration tests
//!
//! - A small hygrometric table covering every dry bulb 0..=50 °C
//! - Correction tables for two stations with different bracket sets
//!
//! Values are generated, not taken from a printed table; tests only rely on
//! the formulas below.

#![allow(dead_code)]

use std::sync::Arc;

use metobs_core::tables::{
    BracketTable, HygrometricCell, HygrometricEntry, HygrometricTable, InMemoryStationRepository,
    SeaReductionEntry, SeaTable, StationCorrectionEntry, StationCorrections, StationTable,
};

/// Station with brackets every 5 hPa from 990 to 1030
pub const COASTAL_STATION: &str = "41923";

/// Station with brackets every 10 hPa from 900 to 960
pub const HILL_STATION: &str = "41977";

/// Differences in the fixture table: 0.0 to 3.0 in half-degree steps
pub fn fixture_differences() -> Vec<f64> {
    (0..=6).map(|i| f64::from(i) * 0.5).collect()
}

/// Dew point in the fixture table, one decimal
pub fn fixture_dew_point(dbt: i32, difference: f64) -> f64 {
    (f64::from(dbt) * 10.0 - difference * 15.0).round() / 10.0
}

/// Relative humidity in the fixture table, whole percent
pub fn fixture_relative_humidity(difference: f64) -> f64 {
    (100.0 - difference * 6.0).round()
}

pub fn hygrometric_table() -> Arc<HygrometricTable> {
    let differences = fixture_differences();
    let entries = (0..=50)
        .map(|dbt| HygrometricEntry {
            dbt,
            values: differences
                .iter()
                .map(|&d| HygrometricCell {
                    dpt: fixture_dew_point(dbt, d),
                    rh: fixture_relative_humidity(d),
                })
                .collect(),
        })
        .collect();
    Arc::new(HygrometricTable::new(differences, entries).expect("fixture table is well formed"))
}

fn brackets(from: i32, to: i32, step: usize, correction: impl Fn(f64) -> f64) -> BracketTable {
    BracketTable::new((from..=to).step_by(step).map(|b| {
        let b = f64::from(b);
        (b, correction(b))
    }))
}

fn station(
    temperatures: std::ops::RangeInclusive<i32>,
    low: i32,
    high: i32,
    step: usize,
    height: f64,
    sea: f64,
) -> StationCorrections {
    StationCorrections {
        station: StationTable {
            correction_table: temperatures
                .clone()
                .map(|t| StationCorrectionEntry {
                    dry_bulb_temp_c: t,
                    cistern_level_pressure: brackets(low, high, step, |_| height),
                    sea_level_pressure: brackets(low, high, step, |_| sea),
                })
                .collect(),
        },
        sea: SeaTable {
            correction_table: temperatures
                .map(|t| SeaReductionEntry {
                    dry_bulb_temp_c: t,
                    station_level_pressure: brackets(low, high, step, |_| sea),
                })
                .collect(),
        },
    }
}

pub fn station_repository() -> Arc<InMemoryStationRepository> {
    let mut repo = InMemoryStationRepository::new();
    repo.insert(COASTAL_STATION, station(0..=40, 990, 1030, 5, -0.3, 0.4));
    repo.insert(HILL_STATION, station(-10..=30, 900, 960, 10, 0.2, 7.5));
    Arc::new(repo)
}
