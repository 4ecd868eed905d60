//! Fixed-Point Codec for Form Fields
//!
//! ## Field Format
//!
//! Observation forms carry instrument readings as fixed-width strings of
//! decimal digits with an implicit decimal point one place from the end:
//!
//! ```text
//! Field          Width   Raw       Value
//! -------------------------------------------
//! Temperature    3       "256"     25.6 °C
//! Temperature    3       "050"      5.0 °C
//! Pressure       5       "10142"   1014.2 hPa
//! ```
//!
//! Derived values go back out in the same spirit:
//!
//! ```text
//! Encoding             Example input    Output
//! ------------------------------------------------
//! Unsigned pressure    1004.1           "10041"
//! Signed delta (2)     95               "+95"
//! Signed delta (2)     -3               "-03"
//! Signed delta (4)     12               "+0012"
//! Dew point            24.5             "245"
//! Relative humidity    7                "007"
//! ```
//!
//! ## Two Decode Conventions
//!
//! Temperatures are decoded two different ways depending on who is asking:
//!
//! - [`decode_temperature`] splits the string, `raw[0..2] + "." + raw[2]`.
//!   The hygrometric path uses this.
//! - [`decode_tenths`] divides the whole number by ten. The pressure
//!   correction paths use this for the same 3-digit dry bulb.
//!
//! For well-formed fields both give the same number, but they are separate
//! functions so that each call site states which rule it follows.
//!
//! ## Rounding
//!
//! All rounding is half-up (`floor(x + 0.5)`): `2.5 → 3`, `-2.5 → -2`.
//! Encoded historical records were produced with this rule, so
//! [`round_half_up`] is used everywhere instead of `f64::round`.

use core::fmt::Write;

use crate::{
    constants::{FIXED_POINT_SCALE, PRESSURE_DIGITS, SATURATED_RH_PCT, TEMPERATURE_DIGITS},
    errors::{DeriveError, DeriveResult},
};

/// Encoded output field
///
/// Capacity covers a sign plus any `u64` magnitude.
pub type Encoded = heapless::String<24>;

/// Kind of raw form field, which fixes its width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingKind {
    /// 3-digit temperature in tenths of °C
    Temperature,
    /// 5-digit pressure in tenths of hPa
    Pressure,
}

impl ReadingKind {
    /// Number of digits a field of this kind must have
    pub const fn digits(self) -> usize {
        match self {
            Self::Temperature => TEMPERATURE_DIGITS,
            Self::Pressure => PRESSURE_DIGITS,
        }
    }

    /// Field name used in error reports
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
        }
    }
}

/// A raw form field that passed the fixed-width digit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading<'a> {
    raw: &'a str,
    kind: ReadingKind,
}

impl<'a> RawReading<'a> {
    /// Check `raw` against the width of `kind`
    pub fn parse(raw: &'a str, kind: ReadingKind) -> DeriveResult<Self> {
        let field = kind.name();
        if raw.is_empty() {
            return Err(DeriveError::InvalidInput { field, reason: "empty field" });
        }
        if raw.len() != kind.digits() {
            return Err(DeriveError::InvalidInput { field, reason: "wrong field width" });
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DeriveError::InvalidInput { field, reason: "non-digit character" });
        }
        Ok(Self { raw, kind })
    }

    /// The field as typed
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Field kind
    pub fn kind(&self) -> ReadingKind {
        self.kind
    }

    /// The digits read as a whole number of tenths (`"10142"` → 10142)
    pub fn integer_value(&self) -> u32 {
        // At most five ASCII digits, so this cannot overflow
        self.raw
            .bytes()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
    }
}

/// Round to the nearest integer, halves towards +∞
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    libm::floor(value + 0.5)
}

/// Round to one decimal place, halves towards +∞
#[inline]
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Decode a 3-digit temperature by splitting it, `"256"` → `25.6`
pub fn decode_temperature(raw: &str) -> DeriveResult<f64> {
    let reading = RawReading::parse(raw, ReadingKind::Temperature)?;
    let digits = reading.as_str();

    let mut text: heapless::String<4> = heapless::String::new();
    let fits = text.push_str(&digits[..2]).is_ok()
        && text.push('.').is_ok()
        && text.push_str(&digits[2..]).is_ok();
    if !fits {
        return Err(DeriveError::InvalidInput {
            field: ReadingKind::Temperature.name(),
            reason: "wrong field width",
        });
    }

    text.parse::<f64>().map_err(|_| DeriveError::InvalidInput {
        field: ReadingKind::Temperature.name(),
        reason: "not a number",
    })
}

/// Decode a fixed-point field by dividing it by ten, `"252"` → `25.2`
pub fn decode_tenths(raw: &str, kind: ReadingKind) -> DeriveResult<f64> {
    let reading = RawReading::parse(raw, kind)?;
    Ok(f64::from(reading.integer_value()) / FIXED_POINT_SCALE)
}

/// Decode a 5-digit pressure, `"10142"` → `1014.2`
pub fn decode_five_digit_pressure(raw: &str) -> DeriveResult<f64> {
    decode_tenths(raw, ReadingKind::Pressure)
}

/// Sign followed by the rounded magnitude, zero-padded to `digits`.
///
/// Zero and positive values take `+`.
pub fn encode_signed_delta(value: f64, digits: usize) -> Encoded {
    let sign = if value >= 0.0 { '+' } else { '-' };
    signed(sign, magnitude(value), digits)
}

/// Pressure in tenths, zero-padded to five digits, `1004.1` → `"10041"`
pub fn encode_unsigned_pressure(value: f64) -> Encoded {
    padded(magnitude(value * FIXED_POINT_SCALE), PRESSURE_DIGITS)
}

/// Dew point with its decimal point dropped and right-padded with `0`.
///
/// `24.5` → `"245"`, `24.0` → `"240"`. The padding is trailing, so values
/// under 10 °C shift a digit (`5.5` → `"550"`); stored records depend on it.
pub fn encode_dew_point(dew_point: f64) -> Encoded {
    // Normalises -0.0, which would otherwise print a sign
    let dew_point = if dew_point == 0.0 { 0.0 } else { dew_point };

    let mut rendered: heapless::String<32> = heapless::String::new();
    // Table values are small; anything that does not fit is cut short
    let _ = write!(rendered, "{}", dew_point);

    let mut out = Encoded::new();
    for c in rendered.chars().filter(|&c| c != '.') {
        if out.push(c).is_err() {
            break;
        }
    }
    while out.len() < TEMPERATURE_DIGITS {
        if out.push('0').is_err() {
            break;
        }
    }
    out
}

/// Relative humidity, `"100"` at saturation, otherwise zero-padded to three
pub fn encode_relative_humidity(rh: f64) -> Encoded {
    if rh == SATURATED_RH_PCT {
        let mut out = Encoded::new();
        let _ = out.push_str("100");
        return out;
    }
    padded(magnitude(rh), TEMPERATURE_DIGITS)
}

/// Signed, zero-padded integer with an explicit sign choice
pub(crate) fn signed(sign: char, magnitude: u64, digits: usize) -> Encoded {
    let mut out = Encoded::new();
    // Capacity covers sign + 20 digits of u64
    let _ = write!(out, "{}{:0width$}", sign, magnitude, width = digits);
    out
}

fn padded(magnitude: u64, digits: usize) -> Encoded {
    let mut out = Encoded::new();
    let _ = write!(out, "{:0width$}", magnitude, width = digits);
    out
}

/// `abs(round(value))` as an integer; the cast saturates on absurd inputs
fn magnitude(value: f64) -> u64 {
    libm::fabs(round_half_up(value)) as u64
}
