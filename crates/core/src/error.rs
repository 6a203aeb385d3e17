use thiserror::Error;

use crate::color::Color;
use crate::coord::Coord;

/// Why a placement was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMoveReason {
    OutOfRange,
    Occupied,
    NoCaptures,
}

impl std::fmt::Display for InvalidMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMoveReason::OutOfRange => write!(f, "coordinate out of range"),
            InvalidMoveReason::Occupied => write!(f, "square is occupied"),
            InvalidMoveReason::NoCaptures => write!(f, "move captures nothing"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid move {coord}: {reason}")]
    InvalidMove {
        coord: Coord,
        reason: InvalidMoveReason,
    },

    /// The side has no placement but the game continues; it must pass
    #[error("No legal move for {0}")]
    NoLegalMove(Color),

    #[error("Game is over")]
    GameOver,

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, BoardError>;
