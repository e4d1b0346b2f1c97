//! Protocol Messages
//!
//! JSON wire format for the engine's boundary functions. The transport is
//! the caller's concern; `handle_message` turns one request into one
//! response with no I/O.

use serde::{Deserialize, Serialize};

use crate::core::hash::commit;
use crate::game::board::BiasTable;
use crate::game::config::{EngineConfig, ValidationError};
use crate::game::path::Direction;
use crate::game::round::{evaluate, SeedPair};
use crate::proof::round::RevealedRound;
use crate::proof::verify::{verify, MismatchReason, RoundVerifier, VerificationResult};

// =============================================================================
// CLIENT -> ENGINE MESSAGES
// =============================================================================

/// Requests accepted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Compute a commitment.
    Commit(CommitRequest),
    /// Evaluate a round.
    Evaluate(EvaluateRequest),
    /// Verify a revealed round.
    Verify(VerifyRequest),
    /// Check every field of a published reveal record.
    VerifyReveal(RevealedRound),
}

/// Commitment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    /// Server seed.
    pub server_seed: String,
    /// Nonce.
    pub nonce: u64,
}

/// Evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// Server seed.
    pub server_seed: String,
    /// Client seed.
    pub client_seed: String,
    /// Nonce.
    pub nonce: u64,
    /// Drop column.
    pub drop_column: i32,
}

/// Verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Revealed server seed.
    pub server_seed: String,
    /// Client seed.
    pub client_seed: String,
    /// Nonce.
    pub nonce: u64,
    /// Drop column.
    pub drop_column: i32,
    /// Commitment published before the round.
    pub commit_hex: String,
    /// Bin the server reported.
    pub final_bin: u32,
}

impl ClientMessage {
    /// Parse a JSON request.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// =============================================================================
// ENGINE -> CLIENT MESSAGES
// =============================================================================

/// Responses produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Commitment computed.
    Commit(CommitResponse),
    /// Round evaluated.
    Evaluate(EvaluateResponse),
    /// Verification finished (pass or mismatch).
    Verify(VerifyResponse),
    /// Request rejected.
    Error(ErrorResponse),
}

/// Commitment response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResponse {
    /// SHA256(server_seed ":" nonce).
    pub commit_hex: String,
}

/// Evaluation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    /// Commitment for the server seed and nonce.
    pub commit_hex: String,
    /// Combined seed.
    pub combined_seed: String,
    /// Peg biases.
    pub bias_table: BiasTable,
    /// Hash of the bias table.
    pub bias_table_hash: String,
    /// Decisions, top to bottom.
    pub path: Vec<Direction>,
    /// Landing bin.
    pub final_bin: u32,
    /// Payout multiplier.
    pub multiplier: f64,
}

/// Verification response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Did verification pass?
    pub ok: bool,
    /// Failed check, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<MismatchReason>,
    /// Recomputed commitment.
    pub recomputed_commit_hex: String,
    /// Recomputed combined seed.
    pub recomputed_combined_seed: String,
    /// Recomputed bin.
    pub recomputed_bin: u32,
}

impl From<VerificationResult> for VerifyResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            ok: result.ok,
            reason: result.mismatch,
            recomputed_commit_hex: result.recomputed_commit_hex,
            recomputed_combined_seed: result.recomputed_combined_seed,
            recomputed_bin: result.recomputed_bin,
        }
    }
}

/// Rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable kind, e.g. `drop_column_out_of_range`.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl ServerMessage {
    /// Rejection for a request that failed to parse.
    pub fn malformed(err: &serde_json::Error) -> Self {
        Self::Error(ErrorResponse {
            kind: "malformed_request".to_string(),
            message: err.to_string(),
        })
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Answer one request.
pub fn handle_message(message: ClientMessage, config: &EngineConfig) -> ServerMessage {
    let result = match message {
        ClientMessage::Commit(req) => handle_commit(req),
        ClientMessage::Evaluate(req) => handle_evaluate(req, config),
        ClientMessage::Verify(req) => handle_verify(req, config),
        ClientMessage::VerifyReveal(revealed) => handle_verify_reveal(&revealed, config),
    };
    result.unwrap_or_else(|err| ServerMessage::Error(err.into()))
}

fn handle_commit(req: CommitRequest) -> Result<ServerMessage, ValidationError> {
    if req.server_seed.is_empty() {
        return Err(ValidationError::EmptyServerSeed);
    }
    Ok(ServerMessage::Commit(CommitResponse {
        commit_hex: commit(&req.server_seed, req.nonce),
    }))
}

fn handle_evaluate(
    req: EvaluateRequest,
    config: &EngineConfig,
) -> Result<ServerMessage, ValidationError> {
    let seeds = SeedPair::new(req.server_seed, req.client_seed, req.nonce);
    let round = evaluate(&seeds, req.drop_column, config)?;
    Ok(ServerMessage::Evaluate(EvaluateResponse {
        commit_hex: round.commit_hex,
        combined_seed: round.combined_seed,
        bias_table: round.bias_table,
        bias_table_hash: round.bias_table_hash,
        path: round.path,
        final_bin: round.final_bin,
        multiplier: round.multiplier,
    }))
}

fn handle_verify(req: VerifyRequest, config: &EngineConfig) -> Result<ServerMessage, ValidationError> {
    let seeds = SeedPair::new(req.server_seed, req.client_seed, req.nonce);
    let result = verify(
        &seeds,
        req.drop_column,
        &req.commit_hex,
        req.final_bin,
        &config.board,
    )?;
    Ok(ServerMessage::Verify(result.into()))
}

/// Records are checked against this engine's board, not the one they declare.
fn handle_verify_reveal(
    revealed: &RevealedRound,
    config: &EngineConfig,
) -> Result<ServerMessage, ValidationError> {
    let result = RoundVerifier::new(config.board).verify_reveal(revealed)?;
    Ok(ServerMessage::Verify(result.into()))
}

// =============================================================================
// TESTS
// =============================================================================
