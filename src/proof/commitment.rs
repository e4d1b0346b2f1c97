//! Round Commitment Protocol
//!
//! Commit to the server seed before the player picks a client seed.
//! Reveal the seed after the round so anyone can check the commitment.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::hash::commit;
use crate::game::config::{validate_server_seed_hex, ValidationError};

/// Bytes of entropy in a generated server seed.
pub const SERVER_SEED_BYTES: usize = 32;

/// Secret server seed.
///
/// Deliberately not `Serialize`, and `Debug` redacts the value. The only way
/// to read it is `expose`, which the reveal step calls.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSeed(String);

impl ServerSeed {
    /// Generate 32 bytes from the OS generator, hex-encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SERVER_SEED_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accept an existing seed in the generated format (64 lowercase hex).
    pub fn from_hex(seed: &str) -> Result<Self, ValidationError> {
        validate_server_seed_hex(seed)?;
        Ok(Self(seed.to_string()))
    }

    /// Read the secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServerSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSeed(<redacted>)")
    }
}

/// Published before the round starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCommitment {
    /// SHA256(server_seed ":" nonce), lowercase hex.
    pub commit_hex: String,
    /// Nonce bound into the commitment.
    pub nonce: u64,
}

impl RoundCommitment {
    /// Commit to a server seed.
    pub fn new(server_seed: &ServerSeed, nonce: u64) -> Self {
        Self {
            commit_hex: commit(server_seed.expose(), nonce),
            nonce,
        }
    }

    /// Check a revealed seed against this commitment.
    pub fn verify(&self, revealed_seed: &str) -> bool {
        commit(revealed_seed, self.nonce) == self.commit_hex
    }
}
