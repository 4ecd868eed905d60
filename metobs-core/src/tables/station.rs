//! Per-station pressure correction tables
//!
//! Each station carries two tables, both keyed first by integer dry-bulb
//! temperature and then by pressure bracket:
//!
//! ```text
//! station.correction_table[dry_bulb_temp_c]
//!     cistern_level_pressure[bracket]  → height correction (hPa)
//!     sea_level_pressure[bracket]      → sea correction (hPa, optional)
//!
//! sea.correction_table[dry_bulb_temp_c]
//!     station_level_pressure[bracket]  → sea-level reduction (hPa)
//! ```
//!
//! Brackets arrive as numeric strings (`"1010"`) and may differ from one
//! temperature entry to the next. They are parsed once and kept in
//! ascending order, which is the order nearest-bracket ties are broken in.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ShapeError;
use crate::lookup::LookupStrategy;

/// Pressure bracket → correction, sorted by bracket
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")
)]
pub struct BracketTable {
    brackets: Vec<f64>,
    corrections: Vec<f64>,
}

impl BracketTable {
    /// Build from already-numeric brackets
    pub fn new(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut pairs: Vec<(f64, f64)> = pairs.into_iter().collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (brackets, corrections) = pairs.into_iter().unzip();
        Self { brackets, corrections }
    }

    /// Build from string keys as they appear in reference data
    pub fn from_keyed<K: AsRef<str>>(
        pairs: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, ShapeError> {
        let mut parsed = Vec::new();
        for (key, correction) in pairs {
            let key = key.as_ref();
            let bracket = key
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|b| b.is_finite())
                .ok_or_else(|| ShapeError::InvalidBracket { key: key.into() })?;
            if parsed.iter().any(|&(b, _)| b == bracket) {
                return Err(ShapeError::DuplicateBracket { key: key.into() });
            }
            parsed.push((bracket, correction));
        }
        Ok(Self::new(parsed))
    }

    /// Brackets in ascending order
    pub fn brackets(&self) -> &[f64] {
        &self.brackets
    }

    /// Number of brackets
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// True when there are no brackets
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Correction for exactly this bracket
    pub fn get(&self, bracket: f64) -> Option<f64> {
        self.brackets
            .iter()
            .position(|&b| b == bracket)
            .map(|idx| self.corrections[idx])
    }

    /// `(bracket, correction)` closest to `target`, lower bracket on ties
    pub fn nearest(&self, target: f64) -> Option<(f64, f64)> {
        LookupStrategy::NearestMatch
            .locate(&self.brackets, target)
            .map(|idx| (self.brackets[idx], self.corrections[idx]))
    }
}

#[cfg(feature = "serde")]
impl TryFrom<BTreeMap<String, f64>> for BracketTable {
    type Error = ShapeError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_keyed(map)
    }
}

#[cfg(feature = "serde")]
impl From<BracketTable> for BTreeMap<String, f64> {
    fn from(table: BracketTable) -> Self {
        table
            .brackets
            .iter()
            .zip(&table.corrections)
            .map(|(bracket, correction)| (bracket.to_string(), *correction))
            .collect()
    }
}

/// Height correction entry for one dry-bulb temperature
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationCorrectionEntry {
    /// Dry-bulb temperature (°C)
    pub dry_bulb_temp_c: i32,
    /// Barometer-to-station height correction by bracket
    pub cistern_level_pressure: BracketTable,
    /// Sea correction by bracket; may be absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub sea_level_pressure: BracketTable,
}

/// Sea-level reduction entry for one dry-bulb temperature
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeaReductionEntry {
    /// Dry-bulb temperature (°C)
    pub dry_bulb_temp_c: i32,
    /// Station-to-sea-level reduction by bracket
    pub station_level_pressure: BracketTable,
}

/// Station-level correction table
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationTable {
    /// One entry per dry-bulb temperature
    pub correction_table: Vec<StationCorrectionEntry>,
}

/// Sea-level reduction table
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeaTable {
    /// One entry per dry-bulb temperature
    pub correction_table: Vec<SeaReductionEntry>,
}

/// Both correction tables of one station
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationCorrections {
    /// Station-level (height) corrections
    pub station: StationTable,
    /// Sea-level reductions
    #[cfg_attr(feature = "serde", serde(default))]
    pub sea: SeaTable,
}

impl StationCorrections {
    /// Height correction entry for an exact dry-bulb temperature
    pub fn station_entry(&self, dry_bulb_temp_c: i32) -> Option<&StationCorrectionEntry> {
        self.station
            .correction_table
            .iter()
            .find(|entry| entry.dry_bulb_temp_c == dry_bulb_temp_c)
    }

    /// Sea-level reduction entry for an exact dry-bulb temperature
    pub fn sea_entry(&self, dry_bulb_temp_c: i32) -> Option<&SeaReductionEntry> {
        self.sea
            .correction_table
            .iter()
            .find(|entry| entry.dry_bulb_temp_c == dry_bulb_temp_c)
    }
}
