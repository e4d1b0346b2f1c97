//! Board Generation
//!
//! Derives the per-round peg bias table from the round's generator.
//!
//! Row `r` has `r + 1` pegs. Biases are drawn row-major before any draw
//! that depends on the drop column, so the board cannot be shaped to the
//! player's choice.

use serde::{Deserialize, Serialize};

use crate::core::hash::sha256_hex;
use crate::core::rng::DeterministicRng;
use crate::game::config::ValidationError;

/// Total width of the bias band around 0.5 (biases lie in [0.4, 0.6]).
pub const BIAS_SPREAD: f64 = 0.2;

/// Lowest possible peg bias.
pub const MIN_BIAS: f64 = 0.4;

/// Highest possible peg bias.
pub const MAX_BIAS: f64 = 0.6;

/// Scale for six-decimal rounding.
const ROUND6_SCALE: f64 = 1_000_000.0;

/// Round to 6 decimal places, halves away from zero.
///
/// This is the canonical bias value, not a display format. Later threshold
/// comparisons use the rounded value.
#[inline]
pub fn round6(value: f64) -> f64 {
    (value * ROUND6_SCALE).round() / ROUND6_SCALE
}

/// Map a uniform draw in [0, 1) to a canonical peg bias.
#[inline]
pub fn peg_bias(draw: f64) -> f64 {
    round6(0.5 + (draw - 0.5) * BIAS_SPREAD)
}

/// Per-round peg biases, one row per board row.
///
/// Serializes as a nested JSON array (`[[0.422123],[0.552503,0.408786],...]`).
/// Deserialization goes through [`BiasTable::from_rows`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct BiasTable {
    rows: Vec<Vec<f64>>,
}

impl BiasTable {
    /// Draw a fresh table from the generator.
    ///
    /// Consumes exactly `rows * (rows + 1) / 2` draws.
    pub fn generate(rng: &mut DeterministicRng, rows: u32) -> Self {
        let rows = (0..rows as usize)
            .map(|r| (0..=r).map(|_| peg_bias(rng.next_f64())).collect())
            .collect();
        Self { rows }
    }

    /// Accept a published table after checking its shape and values.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        for (r, row) in rows.iter().enumerate() {
            if row.len() != r + 1 {
                return Err(ValidationError::InvalidBiasTable(format!(
                    "row {} has {} pegs, expected {}",
                    r,
                    row.len(),
                    r + 1
                )));
            }
            if let Some(bias) = row
                .iter()
                .find(|b| !(MIN_BIAS..=MAX_BIAS).contains(*b) || round6(**b) != **b)
            {
                return Err(ValidationError::InvalidBiasTable(format!(
                    "row {r} has non-canonical bias {bias}"
                )));
            }
        }
        Ok(Self { rows })
    }

    /// Number of rows.
    #[inline]
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Total pegs.
    pub fn peg_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Bias of the peg a ball at `position` meets in `row`.
    ///
    /// Positions past the end of the row read its last peg.
    pub fn peg(&self, row: usize, position: usize) -> Option<f64> {
        let pegs = self.rows.get(row)?;
        let last = pegs.len().checked_sub(1)?;
        pegs.get(position.min(last)).copied()
    }

    /// Iterate over every bias, row-major.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// SHA-256 of the compact JSON encoding, lowercase hex.
    ///
    /// Lets two parties compare boards without exchanging the full table.
    pub fn hash_hex(&self) -> String {
        // Vec<Vec<f64>> serialization cannot fail
        let json = serde_json::to_vec(&self.rows).expect("bias table serializes");
        sha256_hex(&json)
    }
}

impl TryFrom<Vec<Vec<f64>>> for BiasTable {
    type Error = ValidationError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<BiasTable> for Vec<Vec<f64>> {
    fn from(table: BiasTable) -> Self {
        table.rows
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const COMBINED_SEED: &str =
        "e1dddf77de27d395ea2be2ed49aa2a59bd6bf12ee8d350c16c008abd406c07e0";

    fn reference_table() -> BiasTable {
        let mut rng = DeterministicRng::from_seed_hex(COMBINED_SEED).unwrap();
        BiasTable::generate(&mut rng, 12)
    }

    #[test]
    fn test_round6() {
        assert_eq!(round6(0.4221233), 0.422123);
        assert_eq!(round6(0.4221235), 0.422124);
        assert_eq!(round6(0.5), 0.5);
    }

    #[test]
    fn test_peg_bias_bounds() {
        assert_eq!(peg_bias(0.0), 0.4);
        assert_eq!(peg_bias(0.5), 0.5);
        assert!(peg_bias(0.999_999_999) <= MAX_BIAS);
    }

    #[test]
    fn test_reference_table_values() {
        let table = reference_table();
        assert_eq!(table.row_count(), 12);
        assert_eq!(table.peg_count(), 78);
        assert_eq!(table.rows()[0], vec![0.422123]);
        assert_eq!(table.rows()[1], vec![0.552503, 0.408786]);
        assert_eq!(table.rows()[2], vec![0.491574, 0.46878, 0.43654]);
        assert_eq!(
            table.rows()[11],
            vec![
                0.468648, 0.495017, 0.484479, 0.545786, 0.527099, 0.425195, 0.589863, 0.431024,
                0.464873, 0.58545, 0.494836, 0.563154
            ]
        );
    }

    #[test]
    fn test_reference_table_hash() {
        assert_eq!(
            reference_table().hash_hex(),
            "21296c4b32a9cf0993d6988835d5a109d3337791239f411384794251c51e7784"
        );
    }

    #[test]
    fn test_generation_consumes_peg_count_draws() {
        let mut rng = DeterministicRng::from_seed_hex(COMBINED_SEED).unwrap();
        BiasTable::generate(&mut rng, 12);

        let mut manual = DeterministicRng::from_seed_hex(COMBINED_SEED).unwrap();
        for _ in 0..78 {
            manual.next_u32();
        }
        assert_eq!(rng.state(), manual.state());
    }

    #[test]
    fn test_smaller_board_is_prefix() {
        // Row-major draw order: an 8-row board is the first 8 rows of a 12-row one
        let mut rng = DeterministicRng::from_seed_hex(COMBINED_SEED).unwrap();
        let small = BiasTable::generate(&mut rng, 8);
        assert_eq!(small.rows(), &reference_table().rows()[..8]);
    }

    #[test]
    fn test_all_biases_in_band() {
        for seed in 1..200u32 {
            let mut rng = DeterministicRng::new(seed);
            let table = BiasTable::generate(&mut rng, 16);
            for bias in table.iter() {
                assert!((MIN_BIAS..=MAX_BIAS).contains(&bias), "bias {bias} out of band");
                assert_eq!(round6(bias), bias);
            }
        }
    }

    #[test]
    fn test_peg_lookup() {
        let table = reference_table();
        assert_eq!(table.peg(2, 1), Some(0.46878));
        assert_eq!(table.peg(2, 9), Some(0.43654));
        assert_eq!(table.peg(12, 0), None);
    }

    #[test]
    fn test_from_rows_round_trip() {
        let table = reference_table();
        let rebuilt = BiasTable::from_rows(table.rows().to_vec()).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let err = BiasTable::from_rows(vec![vec![0.5], vec![0.5]]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBiasTable(_)));
    }

    #[test]
    fn test_deserialize_validates_shape() {
        assert!(serde_json::from_str::<BiasTable>("[[0.5],[]]").is_err());
        assert!(serde_json::from_str::<BiasTable>("[[0.5],[0.4]]").is_err());
        assert!(serde_json::from_str::<BiasTable>("[[0.9]]").is_err());

        let table: BiasTable = serde_json::from_str("[[0.5],[0.4,0.6]]").unwrap();
        assert_eq!(table.peg_count(), 3);
    }

    #[test]
    fn test_simulate_rejects_empty_row() {
        use crate::game::config::BoardConfig;
        use crate::game::path::simulate;

        let table = BiasTable {
            rows: vec![vec![0.5], vec![]],
        };
        let mut rng = DeterministicRng::new(1);
        assert!(matches!(
            simulate(&mut rng, &table, 6, &BoardConfig::default()),
            Err(ValidationError::InvalidBiasTable(_))
        ));
    }

    #[test]
    fn test_deserialize_round_trip() {
        let table = reference_table();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<BiasTable>(&json).unwrap(), table);
    }

    #[test]
    fn test_from_rows_rejects_non_canonical() {
        assert!(BiasTable::from_rows(vec![vec![0.7]]).is_err());
        assert!(BiasTable::from_rows(vec![vec![0.4000001]]).is_err());
    }

    #[test]
    fn test_json_shape() {
        let mut rng = DeterministicRng::from_seed_hex(COMBINED_SEED).unwrap();
        let table = BiasTable::generate(&mut rng, 2);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            "[[0.422123],[0.552503,0.408786]]"
        );
    }
}
