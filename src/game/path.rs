//! Path Simulation
//!
//! Walks the ball down the board one row at a time. Each row draws one
//! value from the same generator that produced the bias table.

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;
use crate::game::board::BiasTable;
use crate::game::config::{BoardConfig, ValidationError};

/// Direction taken at one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Ball stays in its column.
    Left,
    /// Ball moves one bin to the right.
    Right,
}

impl Direction {
    /// Single-letter form (`L` / `R`).
    pub fn as_char(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }
}

/// Result of one drop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Decision at each row, top to bottom.
    pub path: Vec<Direction>,
    /// Count of `Right` decisions.
    pub right_moves: u32,
    /// Landing bin, `0..=rows`. Always equal to `right_moves`.
    pub final_bin: u32,
}

impl Outcome {
    /// Rebuild an outcome from a published path.
    pub fn from_path(path: Vec<Direction>) -> Self {
        let right_moves = path.iter().filter(|d| **d == Direction::Right).count() as u32;
        Self {
            path,
            right_moves,
            final_bin: right_moves,
        }
    }

    /// Compact `"LRRL..."` form.
    pub fn path_string(&self) -> String {
        self.path.iter().map(|d| d.as_char()).collect()
    }

    /// Check the counters agree with the recorded path.
    pub fn is_consistent(&self) -> bool {
        let rights = self.path.iter().filter(|d| **d == Direction::Right).count() as u32;
        rights == self.right_moves && self.final_bin == self.right_moves
    }
}

/// Drop a ball from `drop_column` through `table`.
///
/// Per row: read the peg under the ball, shift its bias by the column
/// adjustment, draw `y`; `y < threshold` goes left, anything else goes right.
/// The column is validated, never clamped.
pub fn simulate(
    rng: &mut DeterministicRng,
    table: &BiasTable,
    drop_column: i32,
    board: &BoardConfig,
) -> Result<Outcome, ValidationError> {
    board.validate_drop_column(drop_column)?;
    let adjustment = board.drop_adjustment(drop_column);

    let mut path = Vec::with_capacity(table.row_count() as usize);
    let mut position = 0usize;

    for r in 0..table.rows().len() {
        let bias = table.peg(r, position).ok_or_else(|| {
            ValidationError::InvalidBiasTable(format!("row {r} has no pegs"))
        })?;
        let threshold = (bias + adjustment).clamp(0.0, 1.0);

        if rng.next_f64() < threshold {
            path.push(Direction::Left);
        } else {
            path.push(Direction::Right);
            position += 1;
        }
    }

    Ok(Outcome {
        path,
        right_moves: position as u32,
        final_bin: position as u32,
    })
}

// =============================================================================
// TESTS
// =============================================================================
