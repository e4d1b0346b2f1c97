//! Board Configuration and Validation
//!
//! Board geometry and payout curve are parameters supplied by the caller.
//! Every input is validated here before any hashing or generator work.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::hash::DIGEST_HEX_LEN;
use crate::game::payout::PayoutTable;

/// Default number of peg rows.
pub const DEFAULT_ROWS: u32 = 12;

/// Default highest drop column (columns are `0..=12`, center 6).
pub const DEFAULT_MAX_DROP_COLUMN: u32 = 12;

/// Upper bound on supported row counts.
pub const MAX_ROWS: u32 = 32;

/// Threshold shift per column away from center.
pub const DROP_ADJUSTMENT_PER_COLUMN: f64 = 0.01;

/// Environment variable for the row count.
pub const ENV_ROWS: &str = "PLINKO_ROWS";
/// Environment variable for the highest drop column.
pub const ENV_MAX_DROP_COLUMN: &str = "PLINKO_MAX_DROP_COLUMN";
/// Environment variable for the payout curve (comma-separated, by distance).
pub const ENV_PAYOUTS: &str = "PLINKO_PAYOUTS";

/// Input rejected before evaluation.
///
/// Each variant names the exact check that failed so an auditor can tell a
/// bad range from a bad encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Drop column outside the board's column range.
    #[error("drop column {column} is outside 0..={max}")]
    DropColumnOutOfRange {
        /// Column requested.
        column: i64,
        /// Highest valid column.
        max: u32,
    },

    /// Row count is zero or above `MAX_ROWS`.
    #[error("row count {rows} is outside 1..={max}")]
    RowCountOutOfRange {
        /// Rows requested.
        rows: u32,
        /// Highest supported row count.
        max: u32,
    },

    /// Server seed is empty.
    #[error("server seed is empty")]
    EmptyServerSeed,

    /// Server seed is not the expected lowercase hex encoding.
    #[error("server seed must be {expected} lowercase hex characters")]
    MalformedServerSeed {
        /// Required length in hex characters.
        expected: usize,
    },

    /// Combined seed hex cannot seed the generator.
    #[error("malformed seed hex {0:?}")]
    MalformedSeedHex(String),

    /// Claimed commitment is not a 64-char hex digest.
    #[error("malformed commitment {0:?}")]
    MalformedCommitment(String),

    /// Nonce is not a canonical decimal u64.
    #[error("malformed nonce {0:?}")]
    MalformedNonce(String),

    /// Payout curve has fewer entries than the board needs.
    #[error("payout table has {len} entries, a {rows}-row board needs {needed}")]
    PayoutTableTooShort {
        /// Entries provided.
        len: usize,
        /// Board rows.
        rows: u32,
        /// Entries required.
        needed: usize,
    },

    /// Payout curve is empty, non-finite, negative or decreasing.
    #[error("invalid payout table: {0}")]
    InvalidPayoutTable(String),

    /// Published bias table does not have the canonical shape or values.
    #[error("invalid bias table: {0}")]
    InvalidBiasTable(String),

    /// Bin index past the last bin.
    #[error("bin {bin} is outside 0..={rows}")]
    BinOutOfRange {
        /// Bin requested.
        bin: u32,
        /// Board rows (last bin index).
        rows: u32,
    },
}

impl ValidationError {
    /// Stable machine-readable kind for wire responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DropColumnOutOfRange { .. } => "drop_column_out_of_range",
            Self::RowCountOutOfRange { .. } => "row_count_out_of_range",
            Self::EmptyServerSeed => "empty_server_seed",
            Self::MalformedServerSeed { .. } => "malformed_server_seed",
            Self::MalformedSeedHex(_) => "malformed_seed_hex",
            Self::MalformedCommitment(_) => "malformed_commitment",
            Self::MalformedNonce(_) => "malformed_nonce",
            Self::PayoutTableTooShort { .. } => "payout_table_too_short",
            Self::InvalidPayoutTable(_) => "invalid_payout_table",
            Self::InvalidBiasTable(_) => "invalid_bias_table",
            Self::BinOutOfRange { .. } => "bin_out_of_range",
        }
    }
}

/// Errors loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Variable set but not parseable.
    #[error("invalid value for {var}: {value:?}")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// Parsed values fail validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Board geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of peg rows (also the last bin index).
    pub rows: u32,
    /// Highest valid drop column. Center is `max_drop_column / 2`.
    pub max_drop_column: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            max_drop_column: DEFAULT_MAX_DROP_COLUMN,
        }
    }
}

impl BoardConfig {
    /// Create a validated board.
    pub fn new(rows: u32, max_drop_column: u32) -> Result<Self, ValidationError> {
        let config = Self {
            rows,
            max_drop_column,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the row count is supported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rows == 0 || self.rows > MAX_ROWS {
            return Err(ValidationError::RowCountOutOfRange {
                rows: self.rows,
                max: MAX_ROWS,
            });
        }
        Ok(())
    }

    /// Column with zero adjustment.
    #[inline]
    pub fn center_column(&self) -> u32 {
        self.max_drop_column / 2
    }

    /// Reject columns outside `0..=max_drop_column`. Never clamps.
    pub fn validate_drop_column(&self, column: i32) -> Result<(), ValidationError> {
        if column < 0 || column as i64 > self.max_drop_column as i64 {
            return Err(ValidationError::DropColumnOutOfRange {
                column: column as i64,
                max: self.max_drop_column,
            });
        }
        Ok(())
    }

    /// Threshold shift for a drop column: `(column - center) * 0.01`.
    #[inline]
    pub fn drop_adjustment(&self, column: i32) -> f64 {
        (column as i64 - self.center_column() as i64) as f64 * DROP_ADJUSTMENT_PER_COLUMN
    }

    /// Pegs on the board (row `r` has `r + 1`).
    #[inline]
    pub fn peg_count(&self) -> usize {
        let rows = self.rows as usize;
        rows * (rows + 1) / 2
    }

    /// Number of landing bins.
    #[inline]
    pub fn bin_count(&self) -> u32 {
        self.rows + 1
    }
}

/// Everything an evaluation needs besides the seeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Board geometry.
    pub board: BoardConfig,
    /// Multiplier curve by distance from center.
    pub payouts: PayoutTable,
}

impl EngineConfig {
    /// Create and validate a config.
    pub fn new(board: BoardConfig, payouts: PayoutTable) -> Result<Self, ValidationError> {
        let config = Self { board, payouts };
        config.validate()?;
        Ok(config)
    }

    /// Validate the board and that the payout curve covers it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.board.validate()?;
        self.payouts.check_rows(self.board.rows)
    }

    /// Create config from environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_ROWS) {
            config.board.rows = parse_var(ENV_ROWS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_DROP_COLUMN) {
            config.board.max_drop_column = parse_var(ENV_MAX_DROP_COLUMN, &value)?;
        }
        if let Some(value) = lookup(ENV_PAYOUTS) {
            config.payouts = PayoutTable::parse_list(&value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidVar {
        var,
        value: value.to_string(),
    })
}

/// Parse a nonce in canonical decimal form.
///
/// Leading zeros and signs are rejected: the preimage uses the decimal
/// rendering, so `"042"` would silently hash as `"42"`.
pub fn parse_nonce(value: &str) -> Result<u64, ValidationError> {
    let canonical = !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && (value == "0" || !value.starts_with('0'));
    if !canonical {
        return Err(ValidationError::MalformedNonce(value.to_string()));
    }
    value
        .parse()
        .map_err(|_| ValidationError::MalformedNonce(value.to_string()))
}

/// Check a claimed commitment is a 64-char hex digest.
pub fn validate_commit_hex(value: &str) -> Result<(), ValidationError> {
    if crate::core::hash::is_digest_hex(value) {
        Ok(())
    } else {
        Err(ValidationError::MalformedCommitment(value.to_string()))
    }
}

/// Server seeds generated by this crate are 32 random bytes in lowercase hex.
pub fn validate_server_seed_hex(value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == DIGEST_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::MalformedServerSeed {
            expected: DIGEST_HEX_LEN,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
