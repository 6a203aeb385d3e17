//! Reversi rules engine
//!
//! Owns the 8x8 grid and piece counts, and provides legal-move generation,
//! capture computation, move application with exact undo, and terminal/winner
//! detection. Both search engines in `reversi_mcts` are built on top of it.

mod board;
mod color;
mod coord;
mod error;

pub use board::{Board, CaptureSet, GameResult};
pub use color::{Cell, Color};
pub use coord::{Coord, Move, BOARD_SIZE, NUM_SQUARES};
pub use error::{BoardError, InvalidMoveReason, Result};
