use reversi_core::{Coord, Move};

/// Result of a guided search
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Move selected (competitive argmax or self-play sample)
    pub best_move: Move,

    /// Normalized visit map over all 64 squares, zero off expanded root moves
    pub policy_distribution: Vec<f32>,

    /// Mean backed-up score of the root node
    pub root_value: f32,

    /// Number of iterations actually run
    pub num_simulations_run: u32,

    /// Visit counts for each expanded root child: (move, visit_count)
    pub root_visit_counts: Vec<(Move, u32)>,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(
        best_move: Move,
        policy_distribution: Vec<f32>,
        root_value: f32,
        num_simulations_run: u32,
        root_visit_counts: Vec<(Move, u32)>,
    ) -> Self {
        Self {
            best_move,
            policy_distribution,
            root_value,
            num_simulations_run,
            root_visit_counts,
        }
    }

    /// Get the visit count for a specific move
    pub fn visit_count_for_move(&self, mv: Move) -> u32 {
        self.root_visit_counts
            .iter()
            .find(|(m, _)| *m == mv)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Probability assigned to `coord` in the output map
    pub fn probability(&self, coord: Coord) -> f32 {
        self.policy_distribution
            .get(coord.index())
            .copied()
            .unwrap_or(0.0)
    }

    /// Get the total number of visits to root children
    pub fn total_visits(&self) -> u32 {
        self.root_visit_counts.iter().map(|(_, v)| v).sum()
    }
}
