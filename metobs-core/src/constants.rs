//! Constants for METOBS Core
//!
//! Field widths of the fixed-point form fields and the coverage of the
//! hygrometric reference table. Use these instead of magic numbers.

// ===== FIELD WIDTHS =====

/// Width of a raw temperature field (`"256"` = 25.6 °C)
pub const TEMPERATURE_DIGITS: usize = 3;

/// Width of a raw pressure field (`"10142"` = 1014.2 hPa)
pub const PRESSURE_DIGITS: usize = 5;

/// Magnitude digits of an encoded height or sea-level correction (`"+03"`)
pub const CORRECTION_DIGITS: usize = 2;

/// Magnitude digits of an encoded 24-hour pressure change (`"+0012"`)
pub const PRESSURE_CHANGE_DIGITS: usize = 4;

/// Scale applied to hPa corrections before encoding (hundredths)
pub const CORRECTION_SCALE: f64 = 100.0;

/// Scale of the implicit decimal point in raw fields (tenths)
pub const FIXED_POINT_SCALE: f64 = 10.0;

/// 24-hour change reported when there is no prior observation.
///
/// Unsigned, unlike every computed change.
pub const NO_PRIOR_PRESSURE_CHANGE: &str = "0000";

// ===== HYGROMETRIC TABLE COVERAGE =====

/// Lowest rounded dry-bulb temperature in the hygrometric table (°C)
pub const HYGROMETRIC_MIN_DRY_BULB_C: i32 = 0;

/// Highest rounded dry-bulb temperature in the hygrometric table (°C)
pub const HYGROMETRIC_MAX_DRY_BULB_C: i32 = 50;

/// Largest dry/wet bulb difference in the hygrometric table (°C)
pub const HYGROMETRIC_MAX_DIFFERENCE_C: f64 = 30.0;

/// Relative humidity at saturation, encoded as-is rather than padded
pub const SATURATED_RH_PCT: f64 = 100.0;

// ===== FORM FIELD NAMES =====

/// Form field receiving the dew point
pub const FIELD_DEW_POINT: &str = "Td";

/// Form field receiving the relative humidity
pub const FIELD_RELATIVE_HUMIDITY: &str = "relativeHumidity";

/// Form field receiving the station-level pressure
pub const FIELD_STATION_LEVEL_PRESSURE: &str = "stationLevelPressure";

/// Form field receiving the barometer height correction
pub const FIELD_HEIGHT_DIFFERENCE: &str = "heightDifference";

/// Form field receiving the sea-level reduction
pub const FIELD_SEA_LEVEL_REDUCTION: &str = "seaLevelReduction";

/// Form field receiving the sea-level pressure
pub const FIELD_CORRECTED_SEA_LEVEL_PRESSURE: &str = "correctedSeaLevelPressure";

/// Form field receiving the 24-hour pressure change
pub const FIELD_PRESSURE_CHANGE_24H: &str = "pressureChange24h";

/// Every derived form field, in output order
pub const DERIVED_FIELDS: [&str; 7] = [
    FIELD_DEW_POINT,
    FIELD_RELATIVE_HUMIDITY,
    FIELD_STATION_LEVEL_PRESSURE,
    FIELD_HEIGHT_DIFFERENCE,
    FIELD_SEA_LEVEL_REDUCTION,
    FIELD_CORRECTED_SEA_LEVEL_PRESSURE,
    FIELD_PRESSURE_CHANGE_24H,
];
