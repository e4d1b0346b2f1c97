//! Deterministic Random Number Generator
//!
//! Uses the xorshift32 algorithm seeded from the round's combined seed.
//! Given the same seed, produces an identical sequence on all platforms.
//!
//! The generator is not cryptographic. Unpredictability comes from the
//! secret server seed hashed into the combined seed, not from the generator.

use serde::{Deserialize, Serialize};

use super::hash::Digest32;
use crate::game::config::ValidationError;

/// Replacement for a zero initial state.
///
/// Zero is a fixed point of xorshift (every draw would be zero), so a digest
/// whose first four bytes are all zero seeds with this value instead. It is
/// the 32-bit golden-ratio constant `floor(2^32 / phi)`.
pub const ZERO_STATE_REMAP: u32 = 0x9E37_79B9;

/// 2^32 as f64, the normalization divisor for `next_f64`.
const U32_RANGE: f64 = 4_294_967_296.0;

/// Deterministic PRNG using the xorshift32 algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG produces the exact same sequence on any
/// platform. Each round owns its own instance; nothing is shared.
///
/// # Example
///
/// ```
/// use plinko_fair::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::from_seed_hex(
///     "e1dddf77de27d395ea2be2ed49aa2a59bd6bf12ee8d350c16c008abd406c07e0",
/// ).unwrap();
/// assert_eq!(rng.next_u32(), 475094958); // Always the same!
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RngCheckpoint")]
pub struct DeterministicRng {
    state: u32,
}

/// Serialized generator state. Restoring goes through `DeterministicRng::new`.
#[derive(Deserialize)]
struct RngCheckpoint {
    state: u32,
}

impl From<RngCheckpoint> for DeterministicRng {
    fn from(checkpoint: RngCheckpoint) -> Self {
        Self::new(checkpoint.state)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 32-bit state. Zero is remapped.
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_STATE_REMAP } else { seed };
        Self { state }
    }

    /// Create RNG from a combined-seed digest.
    pub fn from_digest(digest: &Digest32) -> Self {
        Self::new(seed_from_digest(digest))
    }

    /// Create RNG from a hex-encoded combined seed.
    ///
    /// Only the first 8 hex characters (4 bytes) are read.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, ValidationError> {
        let prefix = seed_hex
            .get(..8)
            .ok_or_else(|| ValidationError::MalformedSeedHex(seed_hex.to_string()))?;
        let mut bytes = [0u8; 4];
        hex::decode_to_slice(prefix, &mut bytes)
            .map_err(|_| ValidationError::MalformedSeedHex(seed_hex.to_string()))?;
        Ok(Self::new(u32::from_be_bytes(bytes)))
    }

    /// Advance the state and return it.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }

    /// Generate a float in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// First four bytes of a digest as a big-endian u32.
#[inline]
pub fn seed_from_digest(digest: &Digest32) -> u32 {
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

// =============================================================================
// TESTS
// =============================================================================
