use reversi_core::{Board, Color, Coord, Move, NUM_SQUARES};

/// Node ID in the arena-style tree
pub type NodeId = usize;

/// Whether every legal move of a node has been materialized as a child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionStatus {
    Partial,
    Full,
}

/// A single node in the guided search tree
pub struct MctsNode {
    /// Board state at this node
    pub state: Board,

    /// Color that played into this node (the root keeps the searching color)
    pub color: Color,

    /// Side to move in `state`
    pub to_move: Color,

    /// Move that led to this state (None for root)
    pub move_action: Option<Move>,

    /// Parent node ID
    pub parent: Option<NodeId>,

    /// Child node IDs, in creation order
    pub children: Vec<NodeId>,

    /// Moves already materialized as children
    pub expanded_moves: Vec<Move>,

    /// Legal placements for `to_move`
    pub legal_moves: Vec<Coord>,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of scores backed up through this node
    pub total_score: f32,

    /// Score assigned when the node was evaluated
    pub eval_score: f32,

    /// Prior probability from the parent's evaluation
    pub prior_probability: f32,

    /// Priors from this node's own evaluation, used to order its expansion
    pub priors: [f32; NUM_SQUARES],

    pub status: ExpansionStatus,

    /// Neither side can move in `state`
    pub is_terminal: bool,

    /// Every continuation below this node has been materialized down to terminal positions
    pub is_exhausted: bool,
}

impl MctsNode {
    /// Create a new root node
    pub fn new_root(state: Board, color: Color, priors: [f32; NUM_SQUARES], score: f32) -> Self {
        let legal_moves = state.legal_moves(color);
        let is_terminal = legal_moves.is_empty() && !state.has_legal_move(color.opponent());
        Self {
            state,
            color,
            to_move: color,
            move_action: None,
            parent: None,
            children: Vec::new(),
            expanded_moves: Vec::new(),
            legal_moves,
            visit_count: 0,
            total_score: score,
            eval_score: score,
            prior_probability: 1.0,
            priors,
            status: ExpansionStatus::Partial,
            is_terminal,
            is_exhausted: is_terminal,
        }
    }

    /// Create a freshly evaluated child node (counts as one visit)
    pub fn new_child(
        state: Board,
        color: Color,
        move_action: Move,
        parent: NodeId,
        prior: f32,
        priors: [f32; NUM_SQUARES],
        score: f32,
    ) -> Self {
        let to_move = color.opponent();
        let legal_moves = state.legal_moves(to_move);
        let is_terminal = legal_moves.is_empty() && !state.has_legal_move(color);
        Self {
            state,
            color,
            to_move,
            move_action: Some(move_action),
            parent: Some(parent),
            children: Vec::new(),
            expanded_moves: Vec::new(),
            legal_moves,
            visit_count: 1,
            total_score: score,
            eval_score: score,
            prior_probability: prior,
            priors,
            status: ExpansionStatus::Partial,
            is_terminal,
            is_exhausted: is_terminal,
        }
    }

    /// Average backed-up score
    pub fn q_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_score / self.visit_count as f32
        }
    }

    pub fn is_full(&self) -> bool {
        self.status == ExpansionStatus::Full
    }

    /// Legal placements not yet materialized as children
    pub fn unexpanded_moves(&self) -> impl Iterator<Item = Coord> + '_ {
        self.legal_moves
            .iter()
            .copied()
            .filter(|&c| !self.expanded_moves.contains(&Move::Place(c)))
    }
}

/// Guided search tree using arena allocation
pub struct MctsTree {
    /// Arena of all nodes
    pub nodes: Vec<MctsNode>,

    /// Root node ID (usually 0)
    pub root_id: NodeId,
}

impl MctsTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root_id: 0,
        }
    }

    /// Reset the arena to a single root node
    pub fn initialize_root(&mut self, root: MctsNode) -> NodeId {
        self.nodes.clear();
        self.nodes.push(root);
        self.root_id = 0;
        self.root_id
    }

    /// Add a new node and return its ID
    pub fn add_node(&mut self, node: MctsNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    /// Attach a new child to `parent` and return its ID
    pub fn add_child(&mut self, parent: NodeId, child: MctsNode) -> NodeId {
        let child_id = self.add_node(child);
        self.nodes[parent].children.push(child_id);
        self.propagate_exhausted(child_id);
        child_id
    }

    /// Re-check exhaustion from `node_id` upwards
    ///
    /// A node is exhausted once it is fully expanded and all of its children are.
    pub fn propagate_exhausted(&mut self, node_id: NodeId) {
        let mut current = self.nodes[node_id].parent;
        if !self.nodes[node_id].is_exhausted {
            return;
        }
        while let Some(id) = current {
            let node = &self.nodes[id];
            let done = node.is_full()
                && node
                    .children
                    .iter()
                    .all(|&child| self.nodes[child].is_exhausted);
            if !done {
                break;
            }
            self.nodes[id].is_exhausted = true;
            current = self.nodes[id].parent;
        }
    }

    pub fn root(&self) -> &MctsNode {
        &self.nodes[self.root_id]
    }

    /// Get the number of nodes in the tree
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Clear the tree
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl Default for MctsTree {
    fn default() -> Self {
        Self::new()
    }
}
