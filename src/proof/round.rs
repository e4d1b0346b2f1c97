//! Round Lifecycle
//!
//! Typed commit → start → reveal ordering for a single round:
//!
//! 1. `Round::commit` fixes the server seed and publishes the commitment.
//! 2. `Round::start` takes the client seed and drop column and evaluates.
//! 3. `Round::reveal` discloses the server seed for verification.
//!
//! The server seed stays hidden from `Debug` and from `PublicRound` until
//! step 3. Storing rounds is the caller's job.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::game::config::{BoardConfig, EngineConfig, ValidationError};
use crate::game::path::Direction;
use crate::game::round::{evaluate, RoundOutcome, SeedPair};
use crate::proof::commitment::{RoundCommitment, ServerSeed};

/// Lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Commitment published, waiting for the client seed.
    Committed,
    /// Outcome computed, server seed still secret.
    Started,
    /// Server seed disclosed.
    Revealed,
}

/// Lifecycle misuse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoundError {
    /// `start` called twice.
    #[error("round {0} already started")]
    AlreadyStarted(Uuid),

    /// `reveal` before `start`.
    #[error("round {0} has not started")]
    NotStarted(Uuid),

    /// `reveal` called twice, or `start` after reveal.
    #[error("round {0} already revealed")]
    AlreadyRevealed(Uuid),

    /// Inputs rejected by the engine.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One round from commitment to reveal.
#[derive(Clone)]
pub struct Round {
    id: Uuid,
    server_seed: ServerSeed,
    commitment: RoundCommitment,
    status: RoundStatus,
    created_at: DateTime<Utc>,
    started: Option<StartedRound>,
    revealed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
struct StartedRound {
    client_seed: String,
    board: BoardConfig,
    outcome: RoundOutcome,
    started_at: DateTime<Utc>,
}

impl Round {
    /// Commit to a server seed.
    pub fn commit(server_seed: ServerSeed, nonce: u64) -> Self {
        let commitment = RoundCommitment::new(&server_seed, nonce);
        let id = Uuid::new_v4();
        debug!(round = %id, commit = %commitment.commit_hex, nonce, "round committed");

        Self {
            id,
            server_seed,
            commitment,
            status: RoundStatus::Committed,
            created_at: Utc::now(),
            started: None,
            revealed_at: None,
        }
    }

    /// Commit to a freshly generated server seed.
    pub fn generate(nonce: u64) -> Self {
        Self::commit(ServerSeed::generate(), nonce)
    }

    /// Round identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current status.
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// Published commitment.
    pub fn commitment(&self) -> &RoundCommitment {
        &self.commitment
    }

    /// Outcome, once started.
    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.started.as_ref().map(|s| &s.outcome)
    }

    /// Accept the client's input and evaluate the round.
    pub fn start(
        &mut self,
        client_seed: impl Into<String>,
        drop_column: i32,
        config: &EngineConfig,
    ) -> Result<&RoundOutcome, RoundError> {
        match self.status {
            RoundStatus::Committed => {}
            RoundStatus::Started => return Err(RoundError::AlreadyStarted(self.id)),
            RoundStatus::Revealed => return Err(RoundError::AlreadyRevealed(self.id)),
        }

        let seeds = SeedPair::new(
            self.server_seed.expose(),
            client_seed,
            self.commitment.nonce,
        );
        let outcome = evaluate(&seeds, drop_column, config)?;
        debug!(
            round = %self.id,
            drop_column,
            final_bin = outcome.final_bin,
            "round started"
        );

        self.status = RoundStatus::Started;
        let started = self.started.insert(StartedRound {
            client_seed: seeds.client_seed,
            board: config.board,
            outcome,
            started_at: Utc::now(),
        });
        Ok(&started.outcome)
    }

    /// Disclose the server seed. Only valid once, after `start`.
    pub fn reveal(&mut self) -> Result<RevealedRound, RoundError> {
        let started = match (self.status, &self.started) {
            (RoundStatus::Started, Some(started)) => started,
            (RoundStatus::Revealed, _) => return Err(RoundError::AlreadyRevealed(self.id)),
            _ => return Err(RoundError::NotStarted(self.id)),
        };

        let revealed_at = Utc::now();
        let revealed = RevealedRound {
            id: self.id,
            server_seed: self.server_seed.expose().to_string(),
            client_seed: started.client_seed.clone(),
            nonce: self.commitment.nonce,
            commit_hex: self.commitment.commit_hex.clone(),
            combined_seed: started.outcome.combined_seed.clone(),
            drop_column: started.outcome.drop_column,
            board: started.board,
            bias_table_hash: started.outcome.bias_table_hash.clone(),
            path: started.outcome.path.clone(),
            final_bin: started.outcome.final_bin,
            multiplier: started.outcome.multiplier,
            revealed_at,
        };

        self.status = RoundStatus::Revealed;
        self.revealed_at = Some(revealed_at);
        debug!(round = %self.id, "round revealed");
        Ok(revealed)
    }

    /// Everything safe to publish at the current status.
    pub fn public_view(&self) -> PublicRound {
        let revealed = self.status == RoundStatus::Revealed;
        PublicRound {
            id: self.id,
            status: self.status,
            commit_hex: self.commitment.commit_hex.clone(),
            nonce: self.commitment.nonce,
            created_at: self.created_at,
            started_at: self.started.as_ref().map(|s| s.started_at),
            revealed_at: self.revealed_at,
            client_seed: self.started.as_ref().map(|s| s.client_seed.clone()),
            drop_column: self.outcome().map(|o| o.drop_column),
            final_bin: self.outcome().map(|o| o.final_bin),
            multiplier: self.outcome().map(|o| o.multiplier),
            server_seed: revealed.then(|| self.server_seed.expose().to_string()),
        }
    }
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Round")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("commitment", &self.commitment)
            .field("server_seed", &self.server_seed)
            .finish_non_exhaustive()
    }
}

/// Serializable view of a round. `server_seed` is `None` until revealed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicRound {
    /// Round identifier.
    pub id: Uuid,
    /// Current status.
    pub status: RoundStatus,
    /// Published commitment.
    pub commit_hex: String,
    /// Nonce.
    pub nonce: u64,
    /// Commitment time.
    pub created_at: DateTime<Utc>,
    /// Start time.
    pub started_at: Option<DateTime<Utc>>,
    /// Reveal time.
    pub revealed_at: Option<DateTime<Utc>>,
    /// Client seed, once started.
    pub client_seed: Option<String>,
    /// Drop column, once started.
    pub drop_column: Option<i32>,
    /// Landing bin, once started.
    pub final_bin: Option<u32>,
    /// Multiplier, once started.
    pub multiplier: Option<f64>,
    /// Server seed, once revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_seed: Option<String>,
}

/// Full record published at reveal. Enough for `verify_reveal`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealedRound {
    /// Round identifier.
    pub id: Uuid,
    /// Disclosed server seed.
    pub server_seed: String,
    /// Client seed.
    pub client_seed: String,
    /// Nonce.
    pub nonce: u64,
    /// Commitment published at creation.
    pub commit_hex: String,
    /// Combined seed used for the round.
    pub combined_seed: String,
    /// Drop column.
    pub drop_column: i32,
    /// Board the round was played on.
    pub board: BoardConfig,
    /// Hash of the bias table.
    pub bias_table_hash: String,
    /// Row-by-row decisions.
    pub path: Vec<Direction>,
    /// Landing bin.
    pub final_bin: u32,
    /// Payout multiplier.
    pub multiplier: f64,
    /// Reveal time.
    pub revealed_at: DateTime<Utc>,
}

impl RevealedRound {
    /// Seeds as an evaluation input.
    pub fn seeds(&self) -> SeedPair {
        SeedPair::new(&*self.server_seed, &*self.client_seed, self.nonce)
    }
}

// =============================================================================
// TESTS
// =============================================================================
