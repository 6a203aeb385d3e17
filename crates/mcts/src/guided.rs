use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use reversi_core::{Board, Color, Move, NUM_SQUARES};
use tracing::{debug, trace};

use crate::backup::{backup, revisit_terminal};
use crate::config::MctsConfig;
use crate::dirichlet::noisy_visit_weights;
use crate::error::{MctsError, Result};
use crate::evaluation::Evaluator;
use crate::expansion::{best_prior_candidate, expand_and_evaluate};
use crate::search_result::SearchResult;
use crate::selection::select;
use crate::tree::{MctsNode, MctsTree, NodeId};

/// Prior-guided Monte Carlo Tree Search
///
/// Every node is scored once by an [`Evaluator`] when it is created; there
/// are no rollouts. The tree is rebuilt for every call to [`GuidedSearch::search`].
pub struct GuidedSearch {
    tree: MctsTree,
}

impl GuidedSearch {
    /// Create a new guided search instance
    pub fn new() -> Self {
        Self {
            tree: MctsTree::new(),
        }
    }

    /// Run a fixed number of iterations from `board` with `color` to move
    ///
    /// Returns the chosen move and the normalized visit map. A side that must
    /// pass gets `Move::Pass` and an all-zero map.
    pub fn search<E: Evaluator, R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        color: Color,
        evaluator: &E,
        config: &MctsConfig,
        rng: &mut R,
    ) -> Result<SearchResult> {
        let result = self.run(board, color, evaluator, config, rng);
        // Trees are never reused across decisions
        self.tree.clear();
        result
    }

    fn run<E: Evaluator, R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        color: Color,
        evaluator: &E,
        config: &MctsConfig,
        rng: &mut R,
    ) -> Result<SearchResult> {
        // 1. Initialize root node
        let root_id = self.initialize_root(board, color, evaluator)?;

        let root = self.tree.root();
        if root.is_terminal {
            return Err(MctsError::TerminalPosition);
        }
        if root.legal_moves.is_empty() {
            debug!(%color, "no legal move, passing");
            return Ok(SearchResult::new(
                Move::Pass,
                vec![0.0; NUM_SQUARES],
                root.q_value(),
                0,
                Vec::new(),
            ));
        }

        // 2. Run iterations
        let mut iterations = 0;
        for _ in 0..config.num_simulations {
            if self.tree.nodes[root_id].is_exhausted {
                trace!(iterations, "root exhausted, stopping early");
                break;
            }
            iterations += 1;

            // Selection: traverse tree using PUCT
            let leaf_id = select(&self.tree, root_id, config.c_puct);

            // Expansion & Evaluation: one new child scored by the evaluator
            match expand_and_evaluate(&mut self.tree, leaf_id, evaluator)? {
                Some(child_id) => {
                    let score = self.tree.nodes[child_id].eval_score;
                    trace!(leaf = leaf_id, child = child_id, score, "expanded");
                    backup(&mut self.tree, child_id, score);
                }
                None => {
                    let score = self.tree.nodes[leaf_id].eval_score;
                    trace!(leaf = leaf_id, score, "terminal revisit");
                    revisit_terminal(&mut self.tree, leaf_id);
                }
            }
        }

        // 3. Extract results
        let result = self.create_search_result(root_id, iterations, config, rng)?;
        debug!(
            %color,
            best_move = %result.best_move,
            iterations,
            nodes = self.tree.size(),
            root_value = result.root_value,
            self_play = config.self_play,
            "guided search finished"
        );
        Ok(result)
    }

    /// Initialize the tree with an evaluated root node
    fn initialize_root<E: Evaluator>(
        &mut self,
        board: &Board,
        color: Color,
        evaluator: &E,
    ) -> Result<NodeId> {
        let eval = evaluator.evaluate(board, color)?;
        eval.validate()?;
        let root = MctsNode::new_root(board.clone(), color, eval.priors, -eval.value);
        Ok(self.tree.initialize_root(root))
    }

    /// Create search result from root node statistics
    fn create_search_result<R: Rng + ?Sized>(
        &self,
        root_id: NodeId,
        iterations: u32,
        config: &MctsConfig,
        rng: &mut R,
    ) -> Result<SearchResult> {
        let root = &self.tree.nodes[root_id];

        let mut visit_map = [0f32; NUM_SQUARES];
        let mut move_visits = Vec::with_capacity(root.children.len());
        for &child_id in &root.children {
            let child = &self.tree.nodes[child_id];
            let action = child.move_action.ok_or(MctsError::InvalidNodeId(child_id))?;
            if let Move::Place(c) = action {
                visit_map[c.index()] = child.visit_count as f32;
            }
            move_visits.push((action, child.visit_count));
        }

        let best_move = if move_visits.is_empty() {
            // No iteration ran: fall back to the root's top-prior move
            best_prior_candidate(root)
                .map(|(c, _)| Move::Place(c))
                .ok_or(MctsError::NoLegalMoves)?
        } else if config.self_play {
            self.sample_self_play_move(root.visit_count, &move_visits, config, rng)?
        } else {
            most_visited(&move_visits)
        };

        Ok(SearchResult::new(
            best_move,
            visit_distribution(&visit_map),
            root.q_value(),
            iterations,
            move_visits,
        ))
    }

    /// Sample a root move from visit counts mixed with Dirichlet noise
    fn sample_self_play_move<R: Rng + ?Sized>(
        &self,
        root_visits: u32,
        move_visits: &[(Move, u32)],
        config: &MctsConfig,
        rng: &mut R,
    ) -> Result<Move> {
        let visits: Vec<u32> = move_visits.iter().map(|(_, v)| *v).collect();
        let weights = noisy_visit_weights(
            &visits,
            root_visits,
            config.visit_weight,
            config.noise_weight,
            config.dirichlet_scale,
            rng,
        )?;

        let dist =
            WeightedIndex::new(&weights).map_err(|e| MctsError::SamplingError(e.to_string()))?;
        Ok(move_visits[dist.sample(rng)].0)
    }

    /// Get the number of nodes in the tree
    pub fn tree_size(&self) -> usize {
        self.tree.size()
    }
}

impl Default for GuidedSearch {
    fn default() -> Self {
        Self::new()
    }
}

/// Root move with the most visits (first one on ties)
fn most_visited(move_visits: &[(Move, u32)]) -> Move {
    let mut best = move_visits[0];
    for &(mv, visits) in &move_visits[1..] {
        if visits > best.1 {
            best = (mv, visits);
        }
    }
    best.0
}

/// Normalize the raw visit map so it sums to one
///
/// Each entry is divided by the map total, so squares without an expanded
/// child stay exactly zero.
pub fn visit_distribution(visit_map: &[f32; NUM_SQUARES]) -> Vec<f32> {
    let total: f32 = visit_map.iter().sum();
    if total > 0.0 {
        visit_map.iter().map(|&v| v / total).collect()
    } else {
        vec![0.0; NUM_SQUARES]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::UniformEvaluator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use reversi_core::Coord;

    #[test]
    fn test_guided_search_creation() {
        let search = GuidedSearch::new();
        assert_eq!(search.tree_size(), 0);
    }

    #[test]
    fn test_most_visited_first_on_ties() {
        let a = Move::Place(Coord::new(0, 0));
        let b = Move::Place(Coord::new(0, 1));
        let c = Move::Place(Coord::new(0, 2));
        assert_eq!(most_visited(&[(a, 3), (b, 7), (c, 7)]), b);
        assert_eq!(most_visited(&[(a, 5)]), a);
    }

    #[test]
    fn test_visit_distribution_normalizes() {
        let mut map = [0f32; NUM_SQUARES];
        map[3] = 3.0;
        map[10] = 1.0;
        let dist = visit_distribution(&map);
        assert_eq!(dist[3], 0.75);
        assert_eq!(dist[10], 0.25);
        assert_eq!(dist.iter().filter(|&&p| p == 0.0).count(), 62);
        assert!(visit_distribution(&[0.0; NUM_SQUARES])
            .iter()
            .all(|&p| p == 0.0));
    }

    #[test]
    fn test_tree_discarded_after_search() {
        let mut search = GuidedSearch::new();
        let mut rng = StdRng::seed_from_u64(0);
        let config = MctsConfig::default().with_simulations(10);
        search
            .search(
                &Board::new(),
                Color::Black,
                &UniformEvaluator,
                &config,
                &mut rng,
            )
            .unwrap();
        assert_eq!(search.tree_size(), 0);
    }

    #[test]
    fn test_zero_iterations_falls_back_to_prior() {
        let mut search = GuidedSearch::new();
        let mut rng = StdRng::seed_from_u64(0);
        let config = MctsConfig::default().with_simulations(0);
        let board = Board::new();
        let result = search
            .search(&board, Color::Black, &UniformEvaluator, &config, &mut rng)
            .unwrap();

        let mv = result.best_move.coord().unwrap();
        assert!(board.legal_moves(Color::Black).contains(&mv));
        assert_eq!(result.num_simulations_run, 0);
        assert!(result.policy_distribution.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_terminal_root_is_rejected() {
        let mut search = GuidedSearch::new();
        let mut rng = StdRng::seed_from_u64(0);
        let board: Board = "X".repeat(64).parse().unwrap();
        let result = search.search(
            &board,
            Color::White,
            &UniformEvaluator,
            &MctsConfig::default(),
            &mut rng,
        );
        assert!(matches!(result, Err(MctsError::TerminalPosition)));
    }
}
