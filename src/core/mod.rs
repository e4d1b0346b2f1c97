//! Core deterministic primitives.
//!
//! Hashing and the seeded generator. Everything here is pure and
//! reproducible bit-for-bit on any platform.

pub mod hash;
pub mod rng;

// Re-export core types
pub use hash::{combine, commit, Digest32, PreimageHasher};
pub use rng::{DeterministicRng, ZERO_STATE_REMAP};
