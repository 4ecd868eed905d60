//! Observation Deriver
//!
//! Runs every calculator that the fields typed so far allow, in dependency
//! order, and gathers the encoded results for the form.
//!
//! ## Order and Atomicity
//!
//! ```text
//! 1. hygrometric        needs dry bulb + wet bulb
//! 2. station pressure   needs station + dry bulb + barometer
//! 3. sea level          needs 2
//! 4. 24-hour change     needs 2 (prior observation optional)
//! ```
//!
//! Each bundle is written whole or not at all. A bundle whose fields are not
//! filled in yet is skipped silently; a bundle that fails is skipped and its
//! error reported as a notice, without stopping the others. Steps 3 and 4
//! never run when step 2 failed.
//!
//! `seaLevelReduction` is first taken from the station-pressure row's sea
//! correction and replaced by the sea-level table's reduction when step 3
//! succeeds.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use metobs_core::{
//!     HygrometricTable, InMemoryStationRepository, ObservationDeriver, RawObservation,
//! };
//!
//! let table = Arc::new(HygrometricTable::new(vec![0.0], vec![])?);
//! let stations = Arc::new(InMemoryStationRepository::new());
//! let deriver = ObservationDeriver::new(table, stations);
//!
//! // Nothing typed yet: nothing computed, nothing to report
//! let report = deriver.derive(&RawObservation::default());
//! assert!(report.notices.is_empty());
//!
//! let mut form = BTreeMap::new();
//! report.observation.apply_to(&mut form);
//! assert!(form.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};

use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    calculators::{
        BarometerReading, BulbReadings, HygrometricCalculator, HygrometricLimits,
        HygrometricReading, PressureChangeCalculator, PressureChangeInput, SeaLevelCalculator,
        StationPressure, StationPressureCalculator, StationPressureReading,
    },
    codec::Encoded,
    constants::{
        DERIVED_FIELDS, FIELD_CORRECTED_SEA_LEVEL_PRESSURE, FIELD_DEW_POINT,
        FIELD_HEIGHT_DIFFERENCE, FIELD_PRESSURE_CHANGE_24H, FIELD_RELATIVE_HUMIDITY,
        FIELD_SEA_LEVEL_REDUCTION, FIELD_STATION_LEVEL_PRESSURE,
    },
    errors::DeriveError,
    tables::{HygrometricTable, StationCorrectionRepository},
    traits::Calculator,
};

/// Prior-day observation lookup
pub trait PriorObservationSource {
    /// Station-level pressure stored for the observation preceding `date`
    fn previous_station_level_pressure(&self, station_id: &str, date: NaiveDate)
        -> Option<String>;
}

impl<F> PriorObservationSource for F
where
    F: Fn(&str, NaiveDate) -> Option<String>,
{
    fn previous_station_level_pressure(&self, station_id: &str, date: NaiveDate) -> Option<String> {
        self(station_id, date)
    }
}

/// Raw form fields; `None` or an empty string means not filled in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawObservation<'a> {
    /// Station identifier
    pub station_id: Option<&'a str>,
    /// Dry bulb, 3 digits
    pub dry_bulb: Option<&'a str>,
    /// Wet bulb, 3 digits
    pub wet_bulb: Option<&'a str>,
    /// Barometer as read, 5 digits
    pub bar_as_read: Option<&'a str>,
    /// Prior observation's station-level pressure, 5 digits
    pub previous_station_level_pressure: Option<&'a str>,
}

fn filled(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.is_empty())
}

/// Encoded derived values, as written into the form
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivedObservation {
    /// Dew point
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Td", skip_serializing_if = "Option::is_none", default)
    )]
    pub dew_point: Option<Encoded>,

    /// Relative humidity
    #[cfg_attr(
        feature = "serde",
        serde(rename = "relativeHumidity", skip_serializing_if = "Option::is_none", default)
    )]
    pub relative_humidity: Option<Encoded>,

    /// Station-level pressure
    #[cfg_attr(
        feature = "serde",
        serde(rename = "stationLevelPressure", skip_serializing_if = "Option::is_none", default)
    )]
    pub station_level_pressure: Option<Encoded>,

    /// Barometer height correction
    #[cfg_attr(
        feature = "serde",
        serde(rename = "heightDifference", skip_serializing_if = "Option::is_none", default)
    )]
    pub height_difference: Option<Encoded>,

    /// Sea-level reduction
    #[cfg_attr(
        feature = "serde",
        serde(rename = "seaLevelReduction", skip_serializing_if = "Option::is_none", default)
    )]
    pub sea_level_reduction: Option<Encoded>,

    /// Sea-level pressure
    #[cfg_attr(
        feature = "serde",
        serde(rename = "correctedSeaLevelPressure", skip_serializing_if = "Option::is_none", default)
    )]
    pub corrected_sea_level_pressure: Option<Encoded>,

    /// 24-hour pressure change
    #[cfg_attr(
        feature = "serde",
        serde(rename = "pressureChange24h", skip_serializing_if = "Option::is_none", default)
    )]
    pub pressure_change_24h: Option<Encoded>,
}

impl DerivedObservation {
    /// `(form field, value)` for every computed field
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (FIELD_DEW_POINT, &self.dew_point),
            (FIELD_RELATIVE_HUMIDITY, &self.relative_humidity),
            (FIELD_STATION_LEVEL_PRESSURE, &self.station_level_pressure),
            (FIELD_HEIGHT_DIFFERENCE, &self.height_difference),
            (FIELD_SEA_LEVEL_REDUCTION, &self.sea_level_reduction),
            (FIELD_CORRECTED_SEA_LEVEL_PRESSURE, &self.corrected_sea_level_pressure),
            (FIELD_PRESSURE_CHANGE_24H, &self.pressure_change_24h),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    }

    /// Write computed fields into form state, leaving others untouched
    pub fn apply_to(&self, form: &mut BTreeMap<String, String>) {
        for (name, value) in self.fields() {
            form.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove every derived field from form state (form reset or submit)
    pub fn clear_from(form: &mut BTreeMap<String, String>) {
        for name in DERIVED_FIELDS {
            form.remove(name);
        }
    }

    /// True when nothing was computed
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

/// Output bundle of one calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bundle {
    /// Dew point and relative humidity
    Hygrometric,
    /// Station-level pressure and height correction
    StationPressure,
    /// Sea-level pressure and reduction
    SeaLevel,
    /// 24-hour pressure change
    PressureChange,
}

/// Everything one derivation produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivationReport {
    /// Encoded values for the form
    pub observation: DerivedObservation,
    /// Hygrometric intermediates shown to the observer
    pub hygrometric: Option<HygrometricReading>,
    /// Station-pressure intermediates (bracket, correction)
    pub station_pressure: Option<StationPressure>,
    /// Bundles that failed, with the reason
    pub notices: Vec<(Bundle, DeriveError)>,
}

impl DerivationReport {
    /// Failure of `bundle`, if it failed
    pub fn notice(&self, bundle: Bundle) -> Option<&DeriveError> {
        self.notices
            .iter()
            .find(|(b, _)| *b == bundle)
            .map(|(_, err)| err)
    }
}

/// Runs all calculators for a set of raw form fields
#[derive(Debug, Clone)]
pub struct ObservationDeriver<R> {
    hygrometric: HygrometricCalculator,
    station_pressure: StationPressureCalculator<R>,
    sea_level: SeaLevelCalculator<R>,
    pressure_change: PressureChangeCalculator,
}

impl<R: StationCorrectionRepository + Clone> ObservationDeriver<R> {
    /// Deriver over shared tables with standard hygrometric coverage
    pub fn new(table: Arc<HygrometricTable>, repository: R) -> Self {
        Self {
            hygrometric: HygrometricCalculator::new(table),
            station_pressure: StationPressureCalculator::new(repository.clone()),
            sea_level: SeaLevelCalculator::new(repository),
            pressure_change: PressureChangeCalculator,
        }
    }
}

impl<R: StationCorrectionRepository> ObservationDeriver<R> {
    /// Replace the hygrometric table coverage
    pub fn with_limits(mut self, limits: HygrometricLimits) -> Self {
        let table = self.hygrometric.shared_table();
        self.hygrometric = HygrometricCalculator::with_limits(table, limits);
        self
    }

    /// Compute every bundle the filled-in fields allow
    pub fn derive(&self, raw: &RawObservation<'_>) -> DerivationReport {
        let mut report = DerivationReport::default();

        if let (Some(dry_bulb), Some(wet_bulb)) = (filled(raw.dry_bulb), filled(raw.wet_bulb)) {
            match self.hygrometric.compute(BulbReadings { dry_bulb, wet_bulb }) {
                Ok(reading) => {
                    report.observation.dew_point = Some(reading.dew_point.clone());
                    report.observation.relative_humidity = Some(reading.relative_humidity.clone());
                    report.hygrometric = Some(reading);
                }
                Err(err) => {
                    log_debug!("{} skipped: {}", self.hygrometric.name(), err);
                    report.notices.push((Bundle::Hygrometric, err));
                }
            }
        }

        let (Some(station_id), Some(dry_bulb), Some(bar_as_read)) =
            (filled(raw.station_id), filled(raw.dry_bulb), filled(raw.bar_as_read))
        else {
            return report;
        };

        let station = match self.station_pressure.compute(BarometerReading {
            station_id,
            dry_bulb,
            bar_as_read,
        }) {
            Ok(station) => station,
            Err(err) => {
                log_debug!("{} skipped: {}", self.station_pressure.name(), err);
                report.notices.push((Bundle::StationPressure, err));
                return report;
            }
        };

        report.observation.station_level_pressure = Some(station.station_level_pressure.clone());
        report.observation.height_difference = Some(station.height_difference.clone());
        report.observation.sea_level_reduction = station.sea_level_reduction.clone();

        let station_level_pressure = station.station_level_pressure.as_str();

        match self.sea_level.compute(StationPressureReading {
            station_id,
            dry_bulb,
            station_level_pressure,
        }) {
            Ok(sea) => {
                report.observation.sea_level_reduction = Some(sea.sea_level_reduction);
                report.observation.corrected_sea_level_pressure =
                    Some(sea.corrected_sea_level_pressure);
            }
            Err(err) => {
                log_debug!("{} skipped: {}", self.sea_level.name(), err);
                report.notices.push((Bundle::SeaLevel, err));
            }
        }

        match self.pressure_change.compute(PressureChangeInput {
            current: station_level_pressure,
            previous: filled(raw.previous_station_level_pressure),
        }) {
            Ok(change) => report.observation.pressure_change_24h = Some(change),
            Err(err) => {
                log_debug!("{} skipped: {}", self.pressure_change.name(), err);
                report.notices.push((Bundle::PressureChange, err));
            }
        }

        log_debug!(
            "Derived observation for station {}: {} notice(s)",
            station_id,
            report.notices.len()
        );

        report.station_pressure = Some(station);
        report
    }

    /// Like [`derive`](Self::derive), fetching the prior observation's
    /// station-level pressure for `date` from `prior`
    pub fn derive_with_prior<P>(
        &self,
        raw: &RawObservation<'_>,
        prior: &P,
        date: NaiveDate,
    ) -> DerivationReport
    where
        P: PriorObservationSource + ?Sized,
    {
        let previous = filled(raw.station_id)
            .and_then(|station_id| prior.previous_station_level_pressure(station_id, date));

        let raw = RawObservation {
            previous_station_level_pressure: previous.as_deref(),
            ..*raw
        };
        self.derive(&raw)
    }
}
