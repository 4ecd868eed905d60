//! Table Key Location Strategies
//!
//! ## Two Kinds of Table
//!
//! The reference tables are keyed differently and fail differently:
//!
//! ```text
//! Table                     Key                      Strategy
//! ------------------------------------------------------------------
//! Hygrometric               dry/wet bulb difference  ExactMatch
//! Station pressure          pressure bracket         NearestMatch
//! Sea-level reduction       pressure bracket         NearestMatch
//! ```
//!
//! **ExactMatch** finds a key equal to the target at one-decimal precision
//! and fails otherwise. A difference of 0.3 against rows `[0.0, 0.5, 1.0]`
//! is a miss, not 0.5. Keys that are not whole tenths never match, so a
//! `0.25` column does not pick up targets of 0.2 or 0.3.
//!
//! **NearestMatch** picks the key numerically closest to the target. It only
//! fails when there are no keys at all. Keys are scanned in ascending order
//! and a later key must be strictly closer to replace the current best, so a
//! target exactly between two brackets resolves to the lower one:
//!
//! ```text
//! brackets:  1010      1015      1020
//! target:         1012.5
//! chosen:    1010   (|2.5| == |2.5|, first wins)
//! ```
//!
//! The strategies are a tagged enum rather than a single "lookup" so each
//! call site names the behaviour it relies on.

use crate::codec::round_half_up;

/// How a target value is matched against table keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Key must equal the target at one-decimal precision
    ExactMatch,
    /// Closest key wins, earlier key on ties
    NearestMatch,
}

impl LookupStrategy {
    /// Index of the key matching `target`, if any
    ///
    /// `keys` must be in ascending order for `NearestMatch` tie-breaking to
    /// pick the lower bracket.
    pub fn locate(self, keys: &[f64], target: f64) -> Option<usize> {
        match self {
            Self::ExactMatch => exact(keys, target),
            Self::NearestMatch => nearest(keys, target),
        }
    }
}

/// Largest gap from the tenths grid still treated as float noise
const GRID_TOLERANCE: f64 = 1e-6;

/// Value in whole tenths, so one-decimal keys compare without float noise
#[inline]
pub fn to_tenths(value: f64) -> i64 {
    round_half_up(value * 10.0) as i64
}

/// True when `value` is a whole number of tenths, up to float noise
#[inline]
pub fn is_whole_tenths(value: f64) -> bool {
    libm::fabs(value * 10.0 - to_tenths(value) as f64) <= GRID_TOLERANCE
}

fn exact(keys: &[f64], target: f64) -> Option<usize> {
    let wanted = to_tenths(target);
    keys.iter().position(|&key| is_whole_tenths(key) && to_tenths(key) == wanted)
}

fn nearest(keys: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &key) in keys.iter().enumerate() {
        let distance = libm::fabs(key - target);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFFERENCES: [f64; 3] = [0.0, 0.5, 1.0];
    const BRACKETS: [f64; 3] = [1010.0, 1015.0, 1020.0];

    #[test]
    fn exact_match_finds_listed_keys() {
        assert_eq!(LookupStrategy::ExactMatch.locate(&DIFFERENCES, 0.5), Some(1));
        // Subtraction noise still lands on the row
        assert_eq!(LookupStrategy::ExactMatch.locate(&DIFFERENCES, 25.5 - 25.0), Some(1));
    }

    #[test]
    fn exact_match_does_not_snap_to_neighbours() {
        assert_eq!(LookupStrategy::ExactMatch.locate(&DIFFERENCES, 0.3), None);
        assert_eq!(LookupStrategy::ExactMatch.locate(&DIFFERENCES, 1.1), None);
    }

    #[test]
    fn exact_match_ignores_keys_off_the_tenths_grid() {
        let keys = [0.0, 0.25];
        assert_eq!(LookupStrategy::ExactMatch.locate(&keys, 0.3), None);
        assert_eq!(LookupStrategy::ExactMatch.locate(&keys, 0.2), None);
        assert_eq!(LookupStrategy::ExactMatch.locate(&keys, 0.0), Some(0));

        assert!(is_whole_tenths(25.5 - 25.0));
        assert!(!is_whole_tenths(0.25));
    }

    #[test]
    fn nearest_match_picks_closest_bracket() {
        assert_eq!(LookupStrategy::NearestMatch.locate(&BRACKETS, 1013.0), Some(1));
        assert_eq!(LookupStrategy::NearestMatch.locate(&BRACKETS, 990.0), Some(0));
        assert_eq!(LookupStrategy::NearestMatch.locate(&BRACKETS, 1050.0), Some(2));
    }

    #[test]
    fn nearest_match_ties_go_to_the_lower_bracket() {
        assert_eq!(LookupStrategy::NearestMatch.locate(&BRACKETS, 1012.5), Some(0));
        assert_eq!(LookupStrategy::NearestMatch.locate(&BRACKETS, 1017.5), Some(1));
    }

    #[test]
    fn nearest_match_needs_at_least_one_key() {
        assert_eq!(LookupStrategy::NearestMatch.locate(&[], 1013.0), None);
    }
}
