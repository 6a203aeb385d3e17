use rand::rngs::StdRng;
use rand::SeedableRng;
use reversi_core::{Board, Color, Move};

use crate::classic::ClassicSearch;
use crate::config::{MctsConfig, UctConfig};
use crate::error::Result;
use crate::evaluation::Evaluator;
use crate::guided::GuidedSearch;
use crate::search_result::SearchResult;

/// Something that picks a move for `color` each turn
///
/// Implementations return a legal placement, or `Move::Pass` when `color`
/// has none while the game is still running.
pub trait Player {
    fn get_move(&mut self, board: &Board, color: Color) -> Result<Move>;
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Player backed by the time-boxed UCT search
pub struct ClassicPlayer {
    search: ClassicSearch,
    config: UctConfig,
    rng: StdRng,
}

impl ClassicPlayer {
    pub fn new(config: UctConfig) -> Self {
        Self {
            search: ClassicSearch::new(),
            rng: seeded_rng(config.seed),
            config,
        }
    }
}

impl Default for ClassicPlayer {
    fn default() -> Self {
        Self::new(UctConfig::default())
    }
}

impl Player for ClassicPlayer {
    fn get_move(&mut self, board: &Board, color: Color) -> Result<Move> {
        let result = self
            .search
            .search(board, color, &self.config, &mut self.rng)?;
        Ok(result.best_move)
    }
}

/// Player backed by the evaluator-guided search
pub struct GuidedPlayer<E: Evaluator> {
    search: GuidedSearch,
    evaluator: E,
    config: MctsConfig,
    rng: StdRng,
}

impl<E: Evaluator> GuidedPlayer<E> {
    pub fn new(evaluator: E, config: MctsConfig) -> Self {
        Self {
            search: GuidedSearch::new(),
            evaluator,
            rng: seeded_rng(config.seed),
            config,
        }
    }

    /// Search and return the full result with the competitive (most visited) move
    pub fn analyze(&mut self, board: &Board, color: Color) -> Result<SearchResult> {
        let config = self.config.clone().with_self_play(false);
        self.search
            .search(board, color, &self.evaluator, &config, &mut self.rng)
    }

    /// Search and sample the move from noisy visit counts
    ///
    /// The returned result carries the normalized visit map used as a
    /// training target alongside the sampled move.
    pub fn self_play_move(&mut self, board: &Board, color: Color) -> Result<SearchResult> {
        let config = self.config.clone().with_self_play(true);
        self.search
            .search(board, color, &self.evaluator, &config, &mut self.rng)
    }
}

impl<E: Evaluator> Player for GuidedPlayer<E> {
    fn get_move(&mut self, board: &Board, color: Color) -> Result<Move> {
        Ok(self.analyze(board, color)?.best_move)
    }
}
