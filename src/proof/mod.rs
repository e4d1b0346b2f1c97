//! Fairness Proof System
//!
//! Provides verifiable round outcomes through:
//! - Commit-reveal of the server seed
//! - A typed round lifecycle that hides the seed until reveal
//! - Verification by deterministic recomputation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF SYSTEM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commitment.rs   - Server seed and pre-round commitment     │
//! │  round.rs        - Commit → start → reveal lifecycle        │
//! │  verify.rs       - Verification by recomputation            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod round;
pub mod verify;

// Re-export key types
pub use commitment::{RoundCommitment, ServerSeed};
pub use round::{PublicRound, RevealedRound, Round, RoundError, RoundStatus};
pub use verify::{verify, verify_reveal, MismatchReason, RoundVerifier, VerificationResult};
