//! Round Evaluation
//!
//! The full pipeline for one drop:
//!
//! ```text
//! seeds ──► commit / combine ──► rng ──► bias table ──► path ──► bin ──► multiplier
//! ```
//!
//! Pure function of its inputs. Each call owns its generator, so rounds can
//! be evaluated concurrently without coordination.

use serde::{Deserialize, Serialize};

use crate::core::hash::{combine_digest, commit};
use crate::core::rng::DeterministicRng;
use crate::game::board::BiasTable;
use crate::game::config::{BoardConfig, EngineConfig, ValidationError};
use crate::game::path::{simulate, Direction, Outcome};

/// Seeds for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPair {
    /// Server secret, hidden until reveal.
    pub server_seed: String,
    /// Player-supplied seed.
    pub client_seed: String,
    /// Per-round counter.
    pub nonce: u64,
}

impl SeedPair {
    /// Bundle the three seed inputs.
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    /// Reject seeds that cannot produce a meaningful commitment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.server_seed.is_empty() {
            return Err(ValidationError::EmptyServerSeed);
        }
        Ok(())
    }
}

/// Everything produced by one evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// SHA256(server_seed ":" nonce).
    pub commit_hex: String,
    /// SHA256(server_seed ":" client_seed ":" nonce).
    pub combined_seed: String,
    /// Column the ball was dropped from.
    pub drop_column: i32,
    /// Peg biases for this round.
    pub bias_table: BiasTable,
    /// SHA-256 of the bias table's JSON form.
    pub bias_table_hash: String,
    /// Row-by-row decisions.
    pub path: Vec<Direction>,
    /// Landing bin.
    pub final_bin: u32,
    /// Payout multiplier for the bin.
    pub multiplier: f64,
}

impl RoundOutcome {
    /// The drop as an `Outcome`.
    pub fn outcome(&self) -> Outcome {
        Outcome::from_path(self.path.clone())
    }
}

/// Board-only result: everything but the payout.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardRun {
    /// Combined seed hex.
    pub combined_seed: String,
    /// Generated table.
    pub bias_table: BiasTable,
    /// Simulated drop.
    pub outcome: Outcome,
}

/// Combine seeds, generate the board and drop the ball.
///
/// Validation happens before any hashing. Shared by evaluation and
/// verification so both walk the identical code path.
pub fn run_board(
    seeds: &SeedPair,
    drop_column: i32,
    board: &BoardConfig,
) -> Result<BoardRun, ValidationError> {
    board.validate()?;
    board.validate_drop_column(drop_column)?;
    seeds.validate()?;

    let digest = combine_digest(&seeds.server_seed, &seeds.client_seed, seeds.nonce);
    let mut rng = DeterministicRng::from_digest(&digest);

    // Phase 1: every bias, before anything depends on the drop column
    let bias_table = BiasTable::generate(&mut rng, board.rows);
    // Phase 2: one decision per row, same stream
    let outcome = simulate(&mut rng, &bias_table, drop_column, board)?;

    Ok(BoardRun {
        combined_seed: hex::encode(digest),
        bias_table,
        outcome,
    })
}

/// Evaluate a round.
///
/// # Example
///
/// ```
/// use plinko_fair::game::config::EngineConfig;
/// use plinko_fair::game::round::{evaluate, SeedPair};
///
/// let seeds = SeedPair::new(
///     "b2a5f3f32a4d9c6ee7a8c1d33456677890abcdeffedcba0987654321ffeeddcc",
///     "candidate-hello",
///     42,
/// );
/// let round = evaluate(&seeds, 6, &EngineConfig::default()).unwrap();
/// assert_eq!(round.final_bin, 6);
/// ```
pub fn evaluate(
    seeds: &SeedPair,
    drop_column: i32,
    config: &EngineConfig,
) -> Result<RoundOutcome, ValidationError> {
    config.validate()?;
    let run = run_board(seeds, drop_column, &config.board)?;
    let multiplier = config
        .payouts
        .resolve(run.outcome.final_bin, config.board.rows)?;

    Ok(RoundOutcome {
        commit_hex: commit(&seeds.server_seed, seeds.nonce),
        combined_seed: run.combined_seed,
        drop_column,
        bias_table_hash: run.bias_table.hash_hex(),
        bias_table: run.bias_table,
        path: run.outcome.path,
        final_bin: run.outcome.final_bin,
        multiplier,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::payout::PayoutTable;
    use proptest::prelude::*;

    const SERVER_SEED: &str = "b2a5f3f32a4d9c6ee7a8c1d33456677890abcdeffedcba0987654321ffeeddcc";

    fn reference_seeds() -> SeedPair {
        SeedPair::new(SERVER_SEED, "candidate-hello", 42)
    }

    #[test]
    fn test_reference_round() {
        let round = evaluate(&reference_seeds(), 6, &EngineConfig::default()).unwrap();

        assert_eq!(
            round.commit_hex,
            "bb9acdc67f3f18f3345236a01f0e5072596657a9005c7d8a22cff061451a6b34"
        );
        assert_eq!(
            round.combined_seed,
            "e1dddf77de27d395ea2be2ed49aa2a59bd6bf12ee8d350c16c008abd406c07e0"
        );
        assert_eq!(round.final_bin, 6);
        assert_eq!(round.outcome().path_string(), "LLLRLRLRLRRR");
        assert_eq!(round.multiplier, 0.5);
        assert_eq!(
            round.bias_table_hash,
            "21296c4b32a9cf0993d6988835d5a109d3337791239f411384794251c51e7784"
        );
    }

    #[test]
    fn test_evaluate_determinism() {
        let config = EngineConfig::default();
        let a = evaluate(&reference_seeds(), 3, &config).unwrap();
        let b = evaluate(&reference_seeds(), 3, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn test_bias_table_independent_of_drop_column() {
        let config = EngineConfig::default();
        let left = evaluate(&reference_seeds(), 0, &config).unwrap();
        let right = evaluate(&reference_seeds(), 12, &config).unwrap();
        assert_eq!(left.bias_table, right.bias_table);
        assert_eq!(left.bias_table_hash, right.bias_table_hash);
    }

    #[test]
    fn test_other_vector() {
        let seeds = SeedPair::new("0".repeat(64), "alice", 0);
        let round = evaluate(&seeds, 6, &EngineConfig::default()).unwrap();
        assert_eq!(
            round.commit_hex,
            "6a2ea17ca8998eeb90196b94c7fbf983b995345ce3c6d755358070a980b3544e"
        );
        assert_eq!(
            round.combined_seed,
            "82ba20e98148362902103ef89373c52bcacf595cc24051763d560146bd20eea4"
        );
        assert_eq!(round.outcome().path_string(), "RLLRRLLLRRLR");
        assert_eq!(round.final_bin, 6);
    }

    #[test]
    fn test_row_count_is_a_parameter() {
        let eight = EngineConfig::new(
            BoardConfig::new(8, 12).unwrap(),
            PayoutTable::default(),
        )
        .unwrap();
        let round = evaluate(&reference_seeds(), 6, &eight).unwrap();
        assert_eq!(round.outcome().path_string(), "RRRLRRRL");
        assert_eq!(round.final_bin, 6);
        assert_eq!(round.bias_table.row_count(), 8);
    }

    #[test]
    fn test_validation_before_work() {
        let config = EngineConfig::default();
        assert_eq!(
            evaluate(&reference_seeds(), 13, &config),
            Err(ValidationError::DropColumnOutOfRange { column: 13, max: 12 })
        );
        assert_eq!(
            evaluate(&SeedPair::new("", "c", 1), 6, &config),
            Err(ValidationError::EmptyServerSeed)
        );

        let too_big = EngineConfig {
            board: BoardConfig {
                rows: 40,
                max_drop_column: 12,
            },
            payouts: PayoutTable::default(),
        };
        assert!(matches!(
            evaluate(&reference_seeds(), 6, &too_big),
            Err(ValidationError::RowCountOutOfRange { rows: 40, .. })
        ));
    }

    #[test]
    fn test_empty_client_seed_allowed() {
        let seeds = SeedPair::new(SERVER_SEED, "", 42);
        assert!(evaluate(&seeds, 6, &EngineConfig::default()).is_ok());
    }

    proptest! {
        #[test]
        fn prop_final_bin_in_range(
            server_seed in "[0-9a-f]{64}",
            client_seed in ".{0,32}",
            nonce in any::<u64>(),
            rows in 1u32..=32,
            drop_column in 0i32..=12,
        ) {
            let config = EngineConfig::new(
                BoardConfig::new(rows, 12).unwrap(),
                PayoutTable::new((0..=rows / 2).map(|d| d as f64).collect()).unwrap(),
            ).unwrap();
            let seeds = SeedPair::new(server_seed, client_seed, nonce);
            let round = evaluate(&seeds, drop_column, &config).unwrap();

            prop_assert!(round.final_bin <= rows);
            prop_assert_eq!(round.path.len(), rows as usize);
            prop_assert!(round.outcome().is_consistent());
            prop_assert!(round.bias_table.iter().all(|b| (0.4..=0.6).contains(&b)));
        }

        #[test]
        fn prop_evaluate_is_pure(
            client_seed in "[a-z]{1,16}",
            nonce in any::<u64>(),
            drop_column in 0i32..=12,
        ) {
            let config = EngineConfig::default();
            let seeds = SeedPair::new(SERVER_SEED, client_seed, nonce);
            prop_assert_eq!(
                evaluate(&seeds, drop_column, &config).unwrap(),
                evaluate(&seeds, drop_column, &config).unwrap()
            );
        }
    }
}
