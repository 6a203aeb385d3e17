use crate::tree::{MctsTree, NodeId};

/// Select a node to expand using the PUCT formula
///
/// Descends from `root_id` while the current node is fully expanded,
/// taking the child with the highest PUCT value (first one on ties).
/// Stops at the first partially expanded node.
pub fn select(tree: &MctsTree, root_id: NodeId, c_puct: f32) -> NodeId {
    let mut current_id = root_id;

    loop {
        let node = &tree.nodes[current_id];

        if !node.is_full() || node.children.is_empty() {
            return current_id;
        }

        let sqrt_parent = (2.0 * node.visit_count as f32).sqrt();

        let mut best: Option<(NodeId, f32)> = None;
        for &child_id in &node.children {
            let value = puct_value(tree, child_id, sqrt_parent, c_puct);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((child_id, value)),
            }
        }

        match best {
            Some((child_id, _)) => current_id = child_id,
            None => return current_id,
        }
    }
}

/// Calculate PUCT value for a node
///
/// PUCT(s, a) = W(s, a) / N(s, a) + c * P(s, a) * sqrt(2 * N(s)) / (1 + N(s, a))
///
/// Where:
/// - W(s, a) is the cumulative score backed up through the child
/// - P(s, a) is the prior probability from the parent's evaluation
/// - N(s) is parent visit count
/// - N(s, a) is child visit count
fn puct_value(tree: &MctsTree, node_id: NodeId, sqrt_parent: f32, c_puct: f32) -> f32 {
    let node = &tree.nodes[node_id];

    // Q value (exploitation)
    let q = node.q_value();

    // U value (exploration)
    let u = c_puct * node.prior_probability * sqrt_parent / (1.0 + node.visit_count as f32);

    q + u
}
