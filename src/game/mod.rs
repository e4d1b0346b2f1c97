//! Game Logic Module
//!
//! Board generation, ball simulation and payouts. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `config`: Board geometry, engine config, input validation
//! - `board`: Per-round peg bias table
//! - `path`: Row-by-row ball simulation
//! - `payout`: Bin to multiplier mapping
//! - `round`: The full evaluation pipeline

pub mod config;
pub mod board;
pub mod path;
pub mod payout;
pub mod round;

// Re-export key types
pub use config::{BoardConfig, EngineConfig, ValidationError};
pub use board::BiasTable;
pub use path::{Direction, Outcome};
pub use payout::PayoutTable;
pub use round::{evaluate, RoundOutcome, SeedPair};
