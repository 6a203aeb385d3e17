use crate::tree::{MctsTree, NodeId};

/// Backup a freshly scored node's score to the root
///
/// The node itself already carries its score and first visit. Each ancestor
/// receives the score negated once more than its child did, since adjacent
/// levels are scored from opposite perspectives.
pub fn backup(tree: &mut MctsTree, leaf_id: NodeId, score: f32) {
    let mut current_score = score;
    let mut current_id = tree.nodes[leaf_id].parent;

    while let Some(node_id) = current_id {
        let node = &mut tree.nodes[node_id];

        current_score = -current_score;
        node.visit_count += 1;
        node.total_score += current_score;

        current_id = node.parent;
    }
}

/// Count another visit to a terminal node and back up its stored score again
pub fn revisit_terminal(tree: &mut MctsTree, node_id: NodeId) {
    let node = &mut tree.nodes[node_id];
    let score = node.eval_score;
    node.visit_count += 1;
    node.total_score += score;
    backup(tree, node_id, score);
}
