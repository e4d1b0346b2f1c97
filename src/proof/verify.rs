//! Verification API
//!
//! Verify rounds by deterministic recomputation from revealed seeds.
//! A failed check is a normal result, reported as a `MismatchReason`;
//! only malformed input is an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::hash::commit;
use crate::game::config::{validate_commit_hex, BoardConfig, ValidationError};
use crate::game::round::{run_board, SeedPair};
use crate::proof::round::RevealedRound;

/// Which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchReason {
    /// Revealed server seed does not hash to the published commitment.
    CommitMismatch,
    /// Published combined seed differs from the recomputed one.
    SeedMismatch,
    /// Published board (geometry or bias table hash) differs.
    BoardMismatch,
    /// Recomputed path or bin differs from the claim.
    OutcomeMismatch,
}

impl MismatchReason {
    /// Wire name, e.g. `"commit-mismatch"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CommitMismatch => "commit-mismatch",
            Self::SeedMismatch => "seed-mismatch",
            Self::BoardMismatch => "board-mismatch",
            Self::OutcomeMismatch => "outcome-mismatch",
        }
    }
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Did verification pass?
    pub ok: bool,
    /// Commitment recomputed from the revealed seed.
    pub recomputed_commit_hex: String,
    /// Combined seed recomputed from the revealed seeds.
    pub recomputed_combined_seed: String,
    /// Bin recomputed by replaying the board.
    pub recomputed_bin: u32,
    /// First failed check, if any.
    #[serde(rename = "reason", skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<MismatchReason>,
}

/// Recomputes rounds on a known board.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundVerifier {
    board: BoardConfig,
}

impl RoundVerifier {
    /// Verifier for a board.
    pub fn new(board: BoardConfig) -> Self {
        Self { board }
    }

    /// Check a claimed commitment and bin against the revealed seeds.
    ///
    /// The commitment is checked first, then the bin.
    pub fn verify(
        &self,
        seeds: &SeedPair,
        drop_column: i32,
        claimed_commit_hex: &str,
        claimed_bin: u32,
    ) -> Result<VerificationResult, ValidationError> {
        validate_commit_hex(claimed_commit_hex)?;
        let run = run_board(seeds, drop_column, &self.board)?;
        let recomputed_commit_hex = commit(&seeds.server_seed, seeds.nonce);

        let mismatch = if !recomputed_commit_hex.eq_ignore_ascii_case(claimed_commit_hex) {
            Some(MismatchReason::CommitMismatch)
        } else if run.outcome.final_bin != claimed_bin {
            Some(MismatchReason::OutcomeMismatch)
        } else {
            None
        };

        Ok(VerificationResult {
            ok: mismatch.is_none(),
            recomputed_commit_hex,
            recomputed_combined_seed: run.combined_seed,
            recomputed_bin: run.outcome.final_bin,
            mismatch,
        })
    }

    /// Check every published field of a revealed round.
    ///
    /// Order: commitment, combined seed, board, outcome.
    pub fn verify_reveal(
        &self,
        revealed: &RevealedRound,
    ) -> Result<VerificationResult, ValidationError> {
        validate_commit_hex(&revealed.commit_hex)?;
        let seeds = revealed.seeds();
        let run = run_board(&seeds, revealed.drop_column, &self.board)?;
        let recomputed_commit_hex = commit(&seeds.server_seed, seeds.nonce);

        let mismatch = if !recomputed_commit_hex.eq_ignore_ascii_case(&revealed.commit_hex) {
            Some(MismatchReason::CommitMismatch)
        } else if !run.combined_seed.eq_ignore_ascii_case(&revealed.combined_seed) {
            Some(MismatchReason::SeedMismatch)
        } else if revealed.board != self.board
            || run.bias_table.hash_hex() != revealed.bias_table_hash
        {
            Some(MismatchReason::BoardMismatch)
        } else if run.outcome.path != revealed.path || run.outcome.final_bin != revealed.final_bin
        {
            Some(MismatchReason::OutcomeMismatch)
        } else {
            None
        };

        Ok(VerificationResult {
            ok: mismatch.is_none(),
            recomputed_commit_hex,
            recomputed_combined_seed: run.combined_seed,
            recomputed_bin: run.outcome.final_bin,
            mismatch,
        })
    }
}

/// Verify a round on the given board. See [`RoundVerifier::verify`].
pub fn verify(
    seeds: &SeedPair,
    drop_column: i32,
    claimed_commit_hex: &str,
    claimed_bin: u32,
    board: &BoardConfig,
) -> Result<VerificationResult, ValidationError> {
    RoundVerifier::new(*board).verify(seeds, drop_column, claimed_commit_hex, claimed_bin)
}

/// Verify a revealed record on the board it declares.
///
/// The record's geometry is trusted here; use [`RoundVerifier::verify_reveal`]
/// to also check it against a known board.
pub fn verify_reveal(revealed: &RevealedRound) -> Result<VerificationResult, ValidationError> {
    RoundVerifier::new(revealed.board).verify_reveal(revealed)
}
