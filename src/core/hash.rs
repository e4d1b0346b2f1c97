//! Commitment Hashing
//!
//! SHA-256 commitments over colon-joined preimages:
//! - `commit`  = SHA256(server_seed ":" nonce)
//! - `combine` = SHA256(server_seed ":" client_seed ":" nonce)
//!
//! The byte layout (field order, `:` separator, decimal nonce) is part of the
//! public contract. Independent verifiers reproduce it exactly.

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes)
pub type Digest32 = [u8; 32];

/// Length of a hex-encoded digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Separator between preimage fields.
const FIELD_SEPARATOR: &[u8] = b":";

/// Incremental hasher for colon-joined preimages.
///
/// Fields are written in call order with a single `:` between them.
/// Integers are written as decimal ASCII, never as raw bytes.
pub struct PreimageHasher {
    hasher: Sha256,
    fields: usize,
}

impl Default for PreimageHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PreimageHasher {
    /// Create an empty hasher.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
            fields: 0,
        }
    }

    /// Append a string field.
    pub fn field_str(&mut self, value: &str) -> &mut Self {
        if self.fields > 0 {
            self.hasher.update(FIELD_SEPARATOR);
        }
        self.hasher.update(value.as_bytes());
        self.fields += 1;
        self
    }

    /// Append an unsigned integer field in decimal.
    pub fn field_u64(&mut self, value: u64) -> &mut Self {
        self.field_str(&value.to_string())
    }

    /// Finalize and return the raw digest.
    pub fn finalize(self) -> Digest32 {
        self.hasher.finalize().into()
    }

    /// Finalize and return the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

/// Compute a simple hash of arbitrary data.
pub fn sha256(data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Lowercase hex SHA-256 of arbitrary data.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Commitment published before the client seed is known.
///
/// ```
/// use plinko_fair::core::hash::commit;
///
/// let hex = commit("b2a5f3f32a4d9c6ee7a8c1d33456677890abcdeffedcba0987654321ffeeddcc", 42);
/// assert_eq!(hex, "bb9acdc67f3f18f3345236a01f0e5072596657a9005c7d8a22cff061451a6b34");
/// ```
pub fn commit(server_seed: &str, nonce: u64) -> String {
    let mut hasher = PreimageHasher::new();
    hasher.field_str(server_seed).field_u64(nonce);
    hasher.finalize_hex()
}

/// Raw combined-seed digest. Seeds the round's generator.
pub fn combine_digest(server_seed: &str, client_seed: &str, nonce: u64) -> Digest32 {
    let mut hasher = PreimageHasher::new();
    hasher
        .field_str(server_seed)
        .field_str(client_seed)
        .field_u64(nonce);
    hasher.finalize()
}

/// Combined seed as lowercase hex.
pub fn combine(server_seed: &str, client_seed: &str, nonce: u64) -> String {
    hex::encode(combine_digest(server_seed, client_seed, nonce))
}

/// Check that a string is a 64-char hex digest (either case).
pub fn is_digest_hex(value: &str) -> bool {
    value.len() == DIGEST_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

// =============================================================================
// TESTS
// =============================================================================
