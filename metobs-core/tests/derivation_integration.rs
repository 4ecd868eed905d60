//! Integration tests for the derived-value engine
//!
//! Exercises the calculators through the public API against generated
//! fixture tables, from raw form fields to encoded form state.

mod common;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use metobs_core::{
    calculators::{
        BarometerReading, BulbReadings, HygrometricCalculator, PressureChangeCalculator,
        PressureChangeInput, StationPressureCalculator,
    },
    codec, Bundle, Calculator, DeriveError, DerivedObservation, ObservationDeriver,
    RawObservation,
};
use proptest::prelude::*;

use common::{
    fixture_dew_point, fixture_differences, fixture_relative_humidity, hygrometric_table,
    station_repository, COASTAL_STATION, HILL_STATION,
};

fn deriver() -> ObservationDeriver<std::sync::Arc<metobs_core::InMemoryStationRepository>> {
    ObservationDeriver::new(hygrometric_table(), station_repository())
}

#[test]
fn end_to_end_coastal_observation() {
    let raw = RawObservation {
        station_id: Some(COASTAL_STATION),
        dry_bulb: Some("252"),
        wet_bulb: Some("247"),
        bar_as_read: Some("10142"),
        previous_station_level_pressure: Some("10150"),
    };

    let report = deriver().derive(&raw);
    assert!(report.notices.is_empty(), "{:?}", report.notices);

    // 25.2 / 24.7 → difference 0.5 at dbT 25
    let hygro = report.hygrometric.as_ref().unwrap();
    assert_eq!(hygro.difference, 0.5);
    let expected_dpt = codec::encode_dew_point(fixture_dew_point(25, 0.5));
    assert_eq!(report.observation.dew_point.as_deref(), Some(expected_dpt.as_str()));
    assert_eq!(report.observation.relative_humidity.as_deref(), Some("097"));

    // 1014.2 → bracket 1015, -0.3 → 1013.9
    let station = report.station_pressure.as_ref().unwrap();
    assert_eq!(station.bracket, 1015.0);
    assert_eq!(report.observation.station_level_pressure.as_deref(), Some("10139"));
    assert_eq!(report.observation.height_difference.as_deref(), Some("-30"));

    // 1013.9 → bracket 1015, +0.4 → 1014.3
    assert_eq!(report.observation.sea_level_reduction.as_deref(), Some("+40"));
    assert_eq!(report.observation.corrected_sea_level_pressure.as_deref(), Some("10143"));

    // 10150 - 10139
    assert_eq!(report.observation.pressure_change_24h.as_deref(), Some("+0011"));
}

#[test]
fn hill_station_uses_its_own_brackets() {
    let raw = RawObservation {
        station_id: Some(HILL_STATION),
        dry_bulb: Some("084"),
        wet_bulb: Some("074"),
        bar_as_read: Some("09251"),
        previous_station_level_pressure: None,
    };

    let report = deriver().derive(&raw);
    assert!(report.notices.is_empty(), "{:?}", report.notices);

    // 925.1 → bracket 920 (5.1 away) vs 930 (4.9 away) → 930
    assert_eq!(report.station_pressure.as_ref().unwrap().bracket, 930.0);
    assert_eq!(report.observation.station_level_pressure.as_deref(), Some("09253"));
    assert_eq!(report.observation.height_difference.as_deref(), Some("+20"));
    assert_eq!(report.observation.sea_level_reduction.as_deref(), Some("+750"));
    assert_eq!(report.observation.corrected_sea_level_pressure.as_deref(), Some("09328"));
    assert_eq!(report.observation.pressure_change_24h.as_deref(), Some("0000"));
}

#[test]
fn temperature_outside_station_table_is_a_notice() {
    let raw = RawObservation {
        station_id: Some(COASTAL_STATION),
        dry_bulb: Some("456"),
        wet_bulb: Some("456"),
        bar_as_read: Some("10142"),
        previous_station_level_pressure: None,
    };

    let report = deriver().derive(&raw);
    assert_eq!(
        report.notice(Bundle::StationPressure),
        Some(&DeriveError::TemperatureNotFound { temperature: 46 })
    );
    assert_eq!(report.observation.relative_humidity.as_deref(), Some("100"));
    assert!(report.observation.station_level_pressure.is_none());
    assert!(report.observation.corrected_sea_level_pressure.is_none());
}

#[test]
fn prior_day_lookup_feeds_the_change() {
    let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    let mut stored = BTreeMap::new();
    stored.insert((COASTAL_STATION.to_string(), date), "10130".to_string());

    let prior = |station: &str, day: NaiveDate| stored.get(&(station.to_string(), day)).cloned();

    let raw = RawObservation {
        station_id: Some(COASTAL_STATION),
        dry_bulb: Some("252"),
        wet_bulb: None,
        bar_as_read: Some("10142"),
        previous_station_level_pressure: None,
    };

    let report = deriver().derive_with_prior(&raw, &prior, date);
    // 10130 - 10139
    assert_eq!(report.observation.pressure_change_24h.as_deref(), Some("-0009"));
}

#[test]
fn form_state_round_trip() {
    let raw = RawObservation {
        station_id: Some(COASTAL_STATION),
        dry_bulb: Some("252"),
        wet_bulb: Some("247"),
        bar_as_read: Some("10142"),
        previous_station_level_pressure: None,
    };

    let mut form: BTreeMap<String, String> = BTreeMap::new();
    form.insert("barAsRead".into(), "10142".into());

    let observation = deriver().derive(&raw).observation;
    observation.apply_to(&mut form);
    assert_eq!(form.len(), 8);
    assert_eq!(form["pressureChange24h"], "0000");

    DerivedObservation::clear_from(&mut form);
    assert_eq!(form.len(), 1);
    assert!(form.contains_key("barAsRead"));
}

#[test]
fn derived_observation_serializes_with_form_field_names() {
    let raw = RawObservation {
        station_id: Some(COASTAL_STATION),
        dry_bulb: Some("252"),
        wet_bulb: None,
        bar_as_read: Some("10142"),
        previous_station_level_pressure: Some("10139"),
    };

    let observation = deriver().derive(&raw).observation;
    let json = serde_json::to_value(&observation).unwrap();

    assert_eq!(json["stationLevelPressure"], "10139");
    assert_eq!(json["pressureChange24h"], "-0000");
    assert!(json.get("Td").is_none());

    let back: DerivedObservation = serde_json::from_value(json).unwrap();
    assert_eq!(back, observation);
}

#[test]
fn station_pressure_calculator_accepts_a_borrowed_repository() {
    let repo = station_repository();
    let calc = StationPressureCalculator::new(&*repo);
    let result = calc
        .compute(BarometerReading {
            station_id: COASTAL_STATION,
            dry_bulb: "200",
            bar_as_read: "10125",
        })
        .unwrap();
    // Equidistant between 1010 and 1015
    assert_eq!(result.bracket, 1010.0);
}

#[test]
fn pressure_change_uses_the_integer_encoding() {
    let change = PressureChangeCalculator
        .compute(PressureChangeInput { current: "09999", previous: Some("10001") })
        .unwrap();
    assert_eq!(change.as_str(), "+0002");
}

fn raw_temperature(tenths: i32) -> String {
    format!("{:03}", tenths)
}

proptest! {
    #[test]
    fn hygrometric_cells_match_the_table(dbt in 0i32..=50, column in 0usize..7) {
        let calculator = HygrometricCalculator::new(hygrometric_table());
        let difference = fixture_differences()[column];
        let dry = dbt * 10;
        let wet = dry - (difference * 10.0) as i32;
        prop_assume!(wet >= 0);

        let (dry_bulb, wet_bulb) = (raw_temperature(dry), raw_temperature(wet));
        let input = BulbReadings { dry_bulb: &dry_bulb, wet_bulb: &wet_bulb };
        let first = calculator.compute(input).unwrap();
        let second = calculator.compute(input).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            first.dew_point,
            codec::encode_dew_point(fixture_dew_point(dbt, difference))
        );
        prop_assert_eq!(
            first.relative_humidity,
            codec::encode_relative_humidity(fixture_relative_humidity(difference))
        );
    }

    #[test]
    fn differences_between_columns_never_snap(dry in 50i32..=500, offset in 1i32..30) {
        // Fixture columns are whole multiples of 5 tenths
        prop_assume!(offset % 5 != 0);
        let calculator = HygrometricCalculator::new(hygrometric_table());
        let wet = dry - offset;

        let result = calculator.compute(BulbReadings {
            dry_bulb: &raw_temperature(dry),
            wet_bulb: &raw_temperature(wet),
        });
        let is_difference_miss = matches!(result, Err(DeriveError::DifferenceNotFound { .. }));
        prop_assert!(is_difference_miss, "{:?}", result);
    }

    #[test]
    fn pressure_fields_survive_decode_encode(tenths in 0u32..100_000) {
        let raw = format!("{:05}", tenths);
        let decoded = codec::decode_five_digit_pressure(&raw).unwrap();
        let encoded = codec::encode_unsigned_pressure(decoded);
        prop_assert_eq!(encoded.as_str(), raw.as_str());
    }
}
