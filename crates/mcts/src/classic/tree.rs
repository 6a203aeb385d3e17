use reversi_core::{Board, Color, Coord, Move};

use crate::tree::NodeId;

/// A single node in the UCT statistics tree
#[derive(Debug, Clone)]
pub struct UctNode {
    /// Board state at this node
    pub state: Board,

    /// Side to move in `state`
    pub to_move: Color,

    /// Move that led to this state (None for root)
    pub move_action: Option<Move>,

    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    /// Legal placements for `to_move`
    pub legal_moves: Vec<Coord>,

    pub visit_count: u32,

    /// Cumulative rollout reward, indexed by [`Color::index`]
    pub reward: [f64; 2],

    /// Cached UCT value per color; `-inf` until the node is first backed up
    pub value: [f64; 2],

    /// No children materialized yet
    pub is_leaf: bool,

    /// Child with the highest UCT value for `to_move`
    pub best_child: Option<NodeId>,

    /// Visited child with the highest reward rate for `to_move`
    pub best_reward_child: Option<NodeId>,

    /// Neither side can move in `state`
    pub is_terminal: bool,
}

impl UctNode {
    pub fn new(
        state: Board,
        to_move: Color,
        move_action: Option<Move>,
        parent: Option<NodeId>,
    ) -> Self {
        let legal_moves = state.legal_moves(to_move);
        let is_terminal = legal_moves.is_empty() && !state.has_legal_move(to_move.opponent());
        Self {
            state,
            to_move,
            move_action,
            parent,
            children: Vec::new(),
            legal_moves,
            visit_count: 0,
            reward: [0.0; 2],
            value: [f64::NEG_INFINITY; 2],
            is_leaf: true,
            best_child: None,
            best_reward_child: None,
            is_terminal,
        }
    }

    /// Mean reward for `color`, or `-inf` for an unvisited node
    pub fn reward_rate(&self, color: Color) -> f64 {
        if self.visit_count == 0 {
            f64::NEG_INFINITY
        } else {
            self.reward[color.index()] / self.visit_count as f64
        }
    }
}

/// Arena-allocated UCT tree, rebuilt for every decision
#[derive(Debug, Default)]
pub struct UctTree {
    pub nodes: Vec<UctNode>,
}

impl UctTree {
    pub const ROOT: NodeId = 0;

    pub fn new(root: UctNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> &UctNode {
        &self.nodes[Self::ROOT]
    }

    /// Attach a new child to `parent` and refresh the parent's caches
    pub fn add_child(&mut self, parent: NodeId, child: UctNode) -> NodeId {
        let child_id = self.nodes.len();
        self.nodes.push(child);

        let node = &mut self.nodes[parent];
        node.children.push(child_id);
        node.is_leaf = false;
        self.refresh_best(parent);
        child_id
    }

    /// Recompute the UCT value cache of `node_id` from its current statistics
    ///
    /// The parent's visit count is read as it stands, so callers walking
    /// upwards must update a node before its parent.
    pub fn update_value(&mut self, node_id: NodeId, exploration: f64) {
        let node = &self.nodes[node_id];
        let Some(parent_id) = node.parent else {
            return;
        };
        if node.visit_count == 0 {
            return;
        }

        let visits = node.visit_count as f64;
        let parent_visits = self.nodes[parent_id].visit_count.max(1) as f64;
        let bonus = exploration * (2.0 * parent_visits.ln() / visits).sqrt();

        let node = &mut self.nodes[node_id];
        for color in Color::ALL {
            node.value[color.index()] = node.reward[color.index()] / visits + bonus;
        }
    }

    /// Refresh both best-child caches of `node_id` from its children
    pub fn refresh_best(&mut self, node_id: NodeId) {
        let node = &self.nodes[node_id];
        let color = node.to_move.index();

        let mut best_child: Option<(NodeId, f64)> = None;
        let mut best_reward: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let child = &self.nodes[child_id];

            let value = child.value[color];
            if best_child.map_or(true, |(_, v)| value > v) {
                best_child = Some((child_id, value));
            }

            let rate = child.reward_rate(node.to_move);
            if child.visit_count > 0 && best_reward.map_or(true, |(_, r)| rate > r) {
                best_reward = Some((child_id, rate));
            }
        }

        let node = &mut self.nodes[node_id];
        node.best_child = best_child.map(|(id, _)| id);
        node.best_reward_child = best_reward.map(|(id, _)| id);
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }
}
