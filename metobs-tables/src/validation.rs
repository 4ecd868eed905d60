//! Table Validation
//!
//! Parsing guarantees a table has the right shape. Validation checks that it
//! is usable: the rows the calculators will ask for exist, no column or row
//! is unreachable, and the values are physically plausible.
//!
//! ## Severity
//!
//! - **Error**: the table would produce wrong results or fail on inputs it
//!   claims to cover. The document is rejected.
//! - **Warning**: some inputs will fail to derive, which the calculators
//!   report as notices. The document is accepted and the warning logged.
//!
//! ## Checks
//!
//! Hygrometric table:
//!
//! - errors: no differences, repeated difference, negative difference,
//!   difference off the 0.1 grid, RH outside 0..=100, dew point above the
//!   row's dry bulb
//! - warnings: missing dbT row, row outside 0..=50, difference above the
//!   table limit
//!
//! Station corrections:
//!
//! - errors: no height rows, repeated temperature, row without brackets
//! - warnings: no sea table, station temperature without a sea row

use std::{collections::BTreeSet, fmt};

use metobs_core::{
    constants::{
        HYGROMETRIC_MAX_DIFFERENCE_C, HYGROMETRIC_MAX_DRY_BULB_C, HYGROMETRIC_MIN_DRY_BULB_C,
        SATURATED_RH_PCT,
    },
    lookup::{is_whole_tenths, to_tenths},
    tables::{HygrometricTable, StationCorrections},
};

use crate::{StationMap, TableDocument};

/// Half a degree: a row covers dry bulbs that round to its temperature
const ROW_HALF_WIDTH_C: f64 = 0.5;

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Some inputs will not derive
    Warning,

    /// Table must not be used
    Error,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Issue severity
    pub severity: Severity,

    /// Where in the document (e.g. `"41923/station.correction_table[2]"`)
    pub location: String,

    /// Human-readable message
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Validation findings for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Findings that reject the document
    pub errors: Vec<ValidationIssue>,

    /// Findings that are logged only
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there are no errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error
    pub fn add_error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            location: location.into(),
            message: message.into(),
        });
    }

    /// Record a warning
    pub fn add_warning(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            location: location.into(),
            message: message.into(),
        });
    }

    /// Errors plus warnings
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Fold another report in, prefixing its locations
    pub fn merge(&mut self, prefix: &str, other: ValidationReport) {
        let prefixed = |mut issue: ValidationIssue| {
            issue.location = format!("{}/{}", prefix, issue.location);
            issue
        };
        self.errors.extend(other.errors.into_iter().map(prefixed));
        self.warnings.extend(other.warnings.into_iter().map(prefixed));
    }
}

/// Check a hygrometric table
pub fn validate_hygrometric_table(table: &HygrometricTable) -> ValidationReport {
    let mut report = ValidationReport::new();

    if table.differences().is_empty() {
        report.add_error("differences", "table has no differences");
    }

    let mut seen = BTreeSet::new();
    for (i, &difference) in table.differences().iter().enumerate() {
        let location = format!("differences[{}]", i);
        let tenths = to_tenths(difference);

        if difference < 0.0 {
            report.add_error(&location, format!("negative difference {}", difference));
        }
        if !seen.insert(tenths) {
            report.add_error(
                &location,
                format!("difference {} repeats an earlier column", difference),
            );
        }
        if !is_whole_tenths(difference) {
            report.add_error(&location, format!("difference {} is not whole tenths", difference));
        }
        if difference > HYGROMETRIC_MAX_DIFFERENCE_C {
            report.add_warning(
                &location,
                format!(
                    "difference {} is above the {} °C limit",
                    difference, HYGROMETRIC_MAX_DIFFERENCE_C
                ),
            );
        }
    }

    for dbt in HYGROMETRIC_MIN_DRY_BULB_C..=HYGROMETRIC_MAX_DRY_BULB_C {
        if table.entry(dbt).is_none() {
            report.add_warning(format!("dbT {}", dbt), "row missing");
        }
    }

    for entry in table.entries() {
        let location = format!("dbT {}", entry.dbt);

        if !(HYGROMETRIC_MIN_DRY_BULB_C..=HYGROMETRIC_MAX_DRY_BULB_C).contains(&entry.dbt) {
            report.add_warning(&location, "row outside the lookup range is never used");
        }

        for (difference, cell) in table.differences().iter().zip(&entry.values) {
            if !(0.0..=SATURATED_RH_PCT).contains(&cell.rh) {
                report.add_error(
                    &location,
                    format!("RH {} at difference {} is not a percentage", cell.rh, difference),
                );
            }
            if cell.dpt > f64::from(entry.dbt) + ROW_HALF_WIDTH_C {
                report.add_error(
                    &location,
                    format!(
                        "dew point {} at difference {} is above the dry bulb",
                        cell.dpt, difference
                    ),
                );
            }
        }
    }

    report
}

/// Check one station's correction tables
pub fn validate_station_corrections(corrections: &StationCorrections) -> ValidationReport {
    let mut report = ValidationReport::new();
    let station_rows = &corrections.station.correction_table;
    let sea_rows = &corrections.sea.correction_table;

    if station_rows.is_empty() {
        report.add_error("station.correction_table", "no height corrections");
    }

    let mut station_temperatures = BTreeSet::new();
    for (i, entry) in station_rows.iter().enumerate() {
        let location = format!("station.correction_table[{}]", i);
        if !station_temperatures.insert(entry.dry_bulb_temp_c) {
            let message = format!("repeated temperature {} °C", entry.dry_bulb_temp_c);
            report.add_error(&location, message);
        }
        if entry.cistern_level_pressure.is_empty() {
            report.add_error(&location, "no cistern_level_pressure brackets");
        }
    }

    if sea_rows.is_empty() {
        report.add_warning("sea.correction_table", "no sea-level reductions");
    }

    let mut sea_temperatures = BTreeSet::new();
    for (i, entry) in sea_rows.iter().enumerate() {
        let location = format!("sea.correction_table[{}]", i);
        if !sea_temperatures.insert(entry.dry_bulb_temp_c) {
            let message = format!("repeated temperature {} °C", entry.dry_bulb_temp_c);
            report.add_error(&location, message);
        }
        if entry.station_level_pressure.is_empty() {
            report.add_error(&location, "no station_level_pressure brackets");
        }
    }

    if !sea_rows.is_empty() {
        for t in station_temperatures.difference(&sea_temperatures) {
            report.add_warning("sea.correction_table", format!("no row for {} °C", t));
        }
    }

    report
}

/// Check every station of a station map
pub fn validate_station_map(stations: &StationMap) -> ValidationReport {
    let mut report = ValidationReport::new();

    if stations.is_empty() {
        report.add_warning("stations", "no stations");
    }

    for (station_id, corrections) in stations {
        report.merge(station_id, validate_station_corrections(corrections));
    }

    report
}

impl TableDocument for HygrometricTable {
    const KIND: &'static str = "hygrometric table";

    fn validate(&self) -> ValidationReport {
        validate_hygrometric_table(self)
    }
}

impl TableDocument for StationCorrections {
    const KIND: &'static str = "station corrections";

    fn validate(&self) -> ValidationReport {
        validate_station_corrections(self)
    }
}

impl TableDocument for StationMap {
    const KIND: &'static str = "station map";

    fn validate(&self) -> ValidationReport {
        validate_station_map(self)
    }
}
