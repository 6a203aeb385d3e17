use rand::seq::SliceRandom;
use rand::Rng;
use reversi_core::{Board, Color, GameResult};

use crate::error::Result;

/// Play uniformly random legal moves on a private copy until neither side can move
///
/// A side without a legal move skips its turn. Returns the final result and margin.
pub fn random_playout<R: Rng + ?Sized>(
    board: &Board,
    to_move: Color,
    rng: &mut R,
) -> Result<(GameResult, u32)> {
    let mut board = board.clone();
    let mut color = to_move;
    let mut passes = 0;

    while passes < 2 {
        let moves = board.legal_moves(color);
        match moves.choose(rng) {
            Some(&coord) => {
                board.apply(coord, color)?;
                passes = 0;
            }
            None => passes += 1,
        }
        color = color.opponent();
    }

    Ok(board.winner())
}
