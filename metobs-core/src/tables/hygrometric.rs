//! Hygrometric (psychrometric) table
//!
//! ```text
//!                differences →  0.0    0.1    0.2   ...   30.0
//! dbT  0  │  {DpT, RH}  {DpT, RH}  ...
//! dbT  1  │  ...
//!  ...
//! dbT 50  │  ...
//! ```
//!
//! Rows are addressed by the rounded dry bulb, columns by exact match of the
//! bulb difference against `differences`.

use alloc::{collections::BTreeSet, vec::Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ShapeError;
use crate::lookup::LookupStrategy;

/// One cell: dew point and relative humidity
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HygrometricCell {
    /// Dew point (°C)
    #[cfg_attr(feature = "serde", serde(rename = "DpT"))]
    pub dpt: f64,
    /// Relative humidity (%)
    #[cfg_attr(feature = "serde", serde(rename = "RH"))]
    pub rh: f64,
}

/// All cells for one integer dry-bulb temperature
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HygrometricEntry {
    /// Dry-bulb temperature (°C)
    #[cfg_attr(feature = "serde", serde(rename = "dbT"))]
    pub dbt: i32,
    /// One cell per difference, same order as the table's differences
    pub values: Vec<HygrometricCell>,
}

/// Dew point / relative humidity table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTable", into = "RawTable"))]
pub struct HygrometricTable {
    differences: Vec<f64>,
    entries: Vec<HygrometricEntry>,
}

impl HygrometricTable {
    /// Build a table, checking every row against the difference list
    pub fn new(differences: Vec<f64>, entries: Vec<HygrometricEntry>) -> Result<Self, ShapeError> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if entry.values.len() != differences.len() {
                return Err(ShapeError::RowLengthMismatch {
                    dbt: entry.dbt,
                    expected: differences.len(),
                    found: entry.values.len(),
                });
            }
            if !seen.insert(entry.dbt) {
                return Err(ShapeError::DuplicateTemperature { dbt: entry.dbt });
            }
        }
        Ok(Self { differences, entries })
    }

    /// Valid dry/wet bulb differences, one decimal
    pub fn differences(&self) -> &[f64] {
        &self.differences
    }

    /// Rows in table order
    pub fn entries(&self) -> &[HygrometricEntry] {
        &self.entries
    }

    /// Column index of `difference`; exact match only
    pub fn difference_index(&self, difference: f64) -> Option<usize> {
        LookupStrategy::ExactMatch.locate(&self.differences, difference)
    }

    /// Row for a rounded dry-bulb temperature
    pub fn entry(&self, dbt: i32) -> Option<&HygrometricEntry> {
        self.entries.iter().find(|entry| entry.dbt == dbt)
    }

    /// Cell at `(dbt, differences[index])`
    pub fn cell(&self, dbt: i32, index: usize) -> Option<HygrometricCell> {
        self.entry(dbt)?.values.get(index).copied()
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawTable {
    differences: Vec<f64>,
    entries: Vec<HygrometricEntry>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTable> for HygrometricTable {
    type Error = ShapeError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Self::new(raw.differences, raw.entries)
    }
}

#[cfg(feature = "serde")]
impl From<HygrometricTable> for RawTable {
    fn from(table: HygrometricTable) -> Self {
        Self { differences: table.differences, entries: table.entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn cell(dpt: f64, rh: f64) -> HygrometricCell {
        HygrometricCell { dpt, rh }
    }

    fn table() -> HygrometricTable {
        HygrometricTable::new(
            vec![0.0, 0.5, 1.0],
            vec![
                HygrometricEntry {
                    dbt: 10,
                    values: vec![cell(10.0, 100.0), cell(9.3, 94.0), cell(8.6, 88.0)],
                },
                HygrometricEntry {
                    dbt: 11,
                    values: vec![cell(11.0, 100.0), cell(10.3, 94.0), cell(9.6, 88.0)],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn cells_are_addressed_by_temperature_and_difference() {
        let table = table();
        let idx = table.difference_index(0.5).unwrap();
        assert_eq!(table.cell(11, idx), Some(cell(10.3, 94.0)));
        assert_eq!(table.cell(12, idx), None);
        assert_eq!(table.difference_index(0.3), None);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = HygrometricTable::new(
            vec![0.0, 0.5],
            vec![HygrometricEntry { dbt: 3, values: vec![cell(3.0, 100.0)] }],
        )
        .unwrap_err();
        assert_eq!(err, ShapeError::RowLengthMismatch { dbt: 3, expected: 2, found: 1 });
    }

    #[test]
    fn rejects_duplicate_rows() {
        let row = HygrometricEntry { dbt: 3, values: vec![cell(3.0, 100.0)] };
        let err = HygrometricTable::new(vec![0.0], vec![row.clone(), row]).unwrap_err();
        assert_eq!(err, ShapeError::DuplicateTemperature { dbt: 3 });
    }
}
