//! # Plinko Fair
//!
//! Provably fair engine for a plinko drop game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PLINKO FAIR                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hash.rs     - SHA-256 commitments and combined seed     │
//! │  └── rng.rs      - Deterministic xorshift32 PRNG             │
//! │                                                              │
//! │  game/           - Board logic (deterministic)               │
//! │  ├── config.rs   - Board geometry and validation             │
//! │  ├── board.rs    - Peg bias table                            │
//! │  ├── path.rs     - Ball path simulation                      │
//! │  ├── payout.rs   - Bin to multiplier                         │
//! │  └── round.rs    - Evaluation pipeline                       │
//! │                                                              │
//! │  proof/          - Commit-reveal and verification            │
//! │  network/        - Wire messages (no transport)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given `(server_seed, client_seed, nonce, drop_column)` and a board
//! config, the combined seed, bias table, path and bin are identical on
//! every platform:
//! - One generator per evaluation, never shared
//! - Biases rounded to 6 decimals before use
//! - IEEE-754 double arithmetic only, in a fixed order

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;
pub mod proof;

// Re-export commonly used types
pub use crate::core::hash::{combine, commit};
pub use crate::core::rng::DeterministicRng;
pub use game::config::{BoardConfig, EngineConfig, ValidationError};
pub use game::round::{evaluate, RoundOutcome, SeedPair};
pub use proof::verify::{verify, MismatchReason, VerificationResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
