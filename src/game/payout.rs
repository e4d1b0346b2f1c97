//! Payout Resolution
//!
//! Maps a final bin to a multiplier through a curve indexed by distance
//! from the center bin. The curve is configuration; it plays no part in
//! how the bin is chosen.

use serde::{Deserialize, Serialize};

use crate::game::config::ValidationError;

/// Default curve for a 12-row board, indexed by distance from center (0..=6).
///
/// Operators are expected to supply their own via `PLINKO_PAYOUTS`.
pub const DEFAULT_PAYOUTS: [f64; 7] = [0.5, 1.0, 1.1, 1.4, 2.0, 9.0, 16.0];

/// Multiplier curve by distance from center.
///
/// Invariants (checked on construction):
/// - at least one entry
/// - every entry finite and non-negative
/// - non-decreasing as distance grows
///
/// Indexing by distance makes the per-bin table symmetric by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PayoutTable {
    by_distance: Vec<f64>,
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self {
            by_distance: DEFAULT_PAYOUTS.to_vec(),
        }
    }
}

impl PayoutTable {
    /// Create a validated curve.
    pub fn new(by_distance: Vec<f64>) -> Result<Self, ValidationError> {
        if by_distance.is_empty() {
            return Err(ValidationError::InvalidPayoutTable("empty".into()));
        }
        if let Some(bad) = by_distance.iter().find(|m| !m.is_finite() || **m < 0.0) {
            return Err(ValidationError::InvalidPayoutTable(format!(
                "multiplier {bad} is not a finite non-negative number"
            )));
        }
        if let Some(i) = by_distance.windows(2).position(|w| w[1] < w[0]) {
            return Err(ValidationError::InvalidPayoutTable(format!(
                "multiplier at distance {} is below distance {}",
                i + 1,
                i
            )));
        }
        Ok(Self { by_distance })
    }

    /// Parse a comma-separated list such as `"0.5,1,1.1,1.4"`.
    pub fn parse_list(list: &str) -> Result<Self, ValidationError> {
        let values = list
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    ValidationError::InvalidPayoutTable(format!("{:?} is not a number", part.trim()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(values)
    }

    /// Multipliers by distance from center.
    pub fn by_distance(&self) -> &[f64] {
        &self.by_distance
    }

    /// Entries a board with `rows` rows needs.
    #[inline]
    pub fn required_len(rows: u32) -> usize {
        rows as usize / 2 + 1
    }

    /// Check the curve covers every bin of a board.
    pub fn check_rows(&self, rows: u32) -> Result<(), ValidationError> {
        let needed = Self::required_len(rows);
        if self.by_distance.len() < needed {
            return Err(ValidationError::PayoutTableTooShort {
                len: self.by_distance.len(),
                rows,
                needed,
            });
        }
        Ok(())
    }

    /// Distance of a bin from center: `|2 * bin - rows| / 2`.
    ///
    /// For odd row counts the two middle bins both have distance 0.
    #[inline]
    pub fn distance(bin: u32, rows: u32) -> usize {
        ((2 * bin as i64 - rows as i64).unsigned_abs() / 2) as usize
    }

    /// Multiplier for a final bin.
    pub fn resolve(&self, bin: u32, rows: u32) -> Result<f64, ValidationError> {
        if bin > rows {
            return Err(ValidationError::BinOutOfRange { bin, rows });
        }
        self.check_rows(rows)?;
        Ok(self.by_distance[Self::distance(bin, rows)])
    }

    /// Per-bin multipliers, left to right.
    pub fn bin_multipliers(&self, rows: u32) -> Result<Vec<f64>, ValidationError> {
        self.check_rows(rows)?;
        Ok((0..=rows)
            .map(|bin| self.by_distance[Self::distance(bin, rows)])
            .collect())
    }
}

impl TryFrom<Vec<f64>> for PayoutTable {
    type Error = ValidationError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PayoutTable> for Vec<f64> {
    fn from(table: PayoutTable) -> Self {
        table.by_distance
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_bins_12_rows() {
        let table = PayoutTable::default();
        assert_eq!(
            table.bin_multipliers(12).unwrap(),
            vec![16.0, 9.0, 2.0, 1.4, 1.1, 1.0, 0.5, 1.0, 1.1, 1.4, 2.0, 9.0, 16.0]
        );
    }

    #[test]
    fn test_resolve_center_and_edges() {
        let table = PayoutTable::default();
        assert_eq!(table.resolve(6, 12), Ok(0.5));
        assert_eq!(table.resolve(0, 12), Ok(16.0));
        assert_eq!(table.resolve(12, 12), Ok(16.0));
    }

    #[test]
    fn test_distance_odd_rows() {
        assert_eq!(PayoutTable::distance(3, 7), 0);
        assert_eq!(PayoutTable::distance(4, 7), 0);
        assert_eq!(PayoutTable::distance(2, 7), 1);
        assert_eq!(PayoutTable::distance(5, 7), 1);
        assert_eq!(PayoutTable::distance(0, 7), 3);
        assert_eq!(PayoutTable::distance(7, 7), 3);
        assert_eq!(PayoutTable::required_len(7), 4);
    }

    #[test]
    fn test_bin_out_of_range() {
        let table = PayoutTable::default();
        assert_eq!(
            table.resolve(13, 12),
            Err(ValidationError::BinOutOfRange { bin: 13, rows: 12 })
        );
    }

    #[test]
    fn test_too_short_for_board() {
        let table = PayoutTable::new(vec![1.0, 2.0]).unwrap();
        assert!(table.resolve(0, 2).is_ok());
        assert_eq!(
            table.resolve(0, 4),
            Err(ValidationError::PayoutTableTooShort { len: 2, rows: 4, needed: 3 })
        );
    }

    #[test]
    fn test_rejects_bad_curves() {
        assert!(PayoutTable::new(vec![]).is_err());
        assert!(PayoutTable::new(vec![1.0, 0.5]).is_err());
        assert!(PayoutTable::new(vec![1.0, f64::NAN]).is_err());
        assert!(PayoutTable::new(vec![-1.0, 1.0]).is_err());
        assert!(PayoutTable::new(vec![1.0, 1.0, 3.0]).is_ok());
    }

    #[test]
    fn test_parse_list() {
        let table = PayoutTable::parse_list(" 0.2, 1 ,4").unwrap();
        assert_eq!(table.by_distance(), &[0.2, 1.0, 4.0]);
        assert!(PayoutTable::parse_list("1,x").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let table: PayoutTable = serde_json::from_str("[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(table.by_distance(), &[1.0, 2.0, 3.0]);
        assert_eq!(serde_json::to_string(&table).unwrap(), "[1.0,2.0,3.0]");
        assert!(serde_json::from_str::<PayoutTable>("[3.0, 2.0]").is_err());
    }

    proptest! {
        #[test]
        fn prop_bins_symmetric_and_monotone(rows in 1u32..=32) {
            let curve: Vec<f64> = (0..=rows / 2).map(|d| 0.5 + d as f64).collect();
            let table = PayoutTable::new(curve).unwrap();
            let bins = table.bin_multipliers(rows).unwrap();

            prop_assert_eq!(bins.len(), rows as usize + 1);
            for i in 0..bins.len() {
                prop_assert_eq!(bins[i], bins[bins.len() - 1 - i]);
            }
            // Non-decreasing walking out from the center
            let mid = rows as usize / 2;
            for i in 0..mid {
                prop_assert!(bins[i] >= bins[i + 1]);
            }
        }
    }
}
