use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use reversi_core::{Board, BoardError, Color, GameResult, Move};
use tracing::{debug, trace};

use super::rollout::random_playout;
use super::tree::{UctNode, UctTree};
use crate::config::UctConfig;
use crate::error::{MctsError, Result};
use crate::tree::NodeId;

/// Outcome of one time-boxed UCT decision
#[derive(Debug, Clone)]
pub struct ClassicResult {
    pub best_move: Move,

    /// Completed select/simulate/backpropagate iterations
    pub iterations: u64,

    /// Nodes in the tree when the budget ran out (0 when no tree was built)
    pub tree_size: usize,

    /// Visits recorded at the root
    pub root_visits: u32,

    pub elapsed: Duration,
}

impl ClassicResult {
    fn immediate(best_move: Move, start: Instant) -> Self {
        Self {
            best_move,
            iterations: 0,
            tree_size: 0,
            root_visits: 0,
            elapsed: start.elapsed(),
        }
    }
}

/// UCT search with epsilon-greedy selection and random rollouts, bounded by wall-clock time
pub struct ClassicSearch {
    tree: UctTree,
}

impl ClassicSearch {
    pub fn new() -> Self {
        Self {
            tree: UctTree::default(),
        }
    }

    /// Search until `config.time_budget` elapses and return the move with the best reward rate
    ///
    /// The deadline is checked before each iteration, so one rollout may run past it.
    pub fn search<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        color: Color,
        config: &UctConfig,
        rng: &mut R,
    ) -> Result<ClassicResult> {
        let start = Instant::now();

        let legal_moves = match board.require_moves(color) {
            Ok(moves) => moves,
            Err(BoardError::NoLegalMove(_)) => {
                debug!(%color, "no legal move, passing");
                return Ok(ClassicResult::immediate(Move::Pass, start));
            }
            Err(BoardError::GameOver) => return Err(MctsError::TerminalPosition),
            Err(e) => return Err(e.into()),
        };
        let fallback = Move::Place(legal_moves[0]);
        if legal_moves.len() == 1 {
            return Ok(ClassicResult::immediate(fallback, start));
        }

        self.tree = UctTree::new(UctNode::new(board.clone(), color, None, None));
        let deadline = deadline(start, config.time_budget);
        let mut iterations = 0u64;
        while deadline.map_or(true, |d| Instant::now() < d) {
            self.run_iteration(config, rng)?;
            iterations += 1;
        }

        let root = self.tree.root();
        let result = ClassicResult {
            best_move: self.decide(fallback),
            iterations,
            tree_size: self.tree.size(),
            root_visits: root.visit_count,
            elapsed: start.elapsed(),
        };
        debug!(
            %color,
            best_move = %result.best_move,
            iterations,
            nodes = result.tree_size,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "classic search finished"
        );

        self.tree = UctTree::default();
        Ok(result)
    }

    /// Visited root child with the best reward rate for the root color, else `fallback`
    fn decide(&self, fallback: Move) -> Move {
        self.tree
            .root()
            .best_reward_child
            .and_then(|id| self.tree.nodes[id].move_action)
            .unwrap_or(fallback)
    }

    fn run_iteration<R: Rng + ?Sized>(&mut self, config: &UctConfig, rng: &mut R) -> Result<()> {
        let leaf_id = self.select(config, rng);
        let leaf = &self.tree.nodes[leaf_id];

        let (sim_id, outcome) = if leaf.is_terminal {
            (leaf_id, leaf.state.winner())
        } else {
            let sim_id = if leaf.visit_count > 0 {
                self.expand(leaf_id)?
            } else {
                leaf_id
            };
            let node = &self.tree.nodes[sim_id];
            (sim_id, random_playout(&node.state, node.to_move, rng)?)
        };

        trace!(leaf = leaf_id, simulated = sim_id, ?outcome, "iteration");
        self.backpropagate(sim_id, outcome, config.exploration);
        Ok(())
    }

    /// Descend to a leaf, exploiting the cached best child with probability `1 - epsilon`
    ///
    /// Epsilon decays by `gamma` per level and restarts at every iteration.
    fn select<R: Rng + ?Sized>(&self, config: &UctConfig, rng: &mut R) -> NodeId {
        let mut current_id = UctTree::ROOT;
        let mut epsilon = config.epsilon;

        loop {
            let node = &self.tree.nodes[current_id];
            if node.is_leaf {
                return current_id;
            }

            let next = if rng.gen::<f64>() > epsilon {
                node.best_child
            } else {
                node.children.choose(rng).copied()
            };
            match next {
                Some(child_id) => current_id = child_id,
                None => return current_id,
            }
            epsilon *= config.gamma;
        }
    }

    /// Materialize every legal move of `node_id` (or a single pass) and return the child to simulate
    fn expand(&mut self, node_id: NodeId) -> Result<NodeId> {
        let node = &self.tree.nodes[node_id];
        let mover = node.to_move;
        let next = mover.opponent();

        if node.legal_moves.is_empty() {
            let child = UctNode::new(node.state.clone(), next, Some(Move::Pass), Some(node_id));
            return Ok(self.tree.add_child(node_id, child));
        }

        let children = node
            .legal_moves
            .iter()
            .map(|&coord| -> Result<UctNode> {
                let mut state = node.state.clone();
                state.apply(coord, mover)?;
                Ok(UctNode::new(
                    state,
                    next,
                    Some(Move::Place(coord)),
                    Some(node_id),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        for child in children {
            self.tree.add_child(node_id, child);
        }

        // Fresh children are all unvalued, so this is the first one
        self.tree.nodes[node_id]
            .best_child
            .ok_or(MctsError::InvalidNodeId(node_id))
    }

    /// Walk from `node_id` to the root, updating visits, rewards and caches
    fn backpropagate(&mut self, node_id: NodeId, outcome: (GameResult, u32), exploration: f64) {
        let (result, margin) = outcome;
        let margin = margin as f64;
        let black = Color::Black.index();
        let white = Color::White.index();

        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = &mut self.tree.nodes[id];
            node.visit_count += 1;
            match result {
                GameResult::Draw => {
                    node.reward[black] += margin;
                    node.reward[white] -= margin;
                }
                GameResult::BlackWins => node.reward[black] -= margin,
                GameResult::WhiteWins => node.reward[white] -= margin,
            }
            current = node.parent;

            self.tree.update_value(id, exploration);
            self.tree.refresh_best(id);
        }
    }
}

/// Instant at which the search stops; `None` when the budget is too large to represent
fn deadline(start: Instant, budget: Duration) -> Option<Instant> {
    start.checked_add(budget)
}

impl Default for ClassicSearch {
    fn default() -> Self {
        Self::new()
    }
}
