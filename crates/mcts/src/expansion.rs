use reversi_core::{Board, Color, Coord, Move};

use crate::error::Result;
use crate::evaluation::Evaluator;
use crate::tree::{ExpansionStatus, MctsNode, MctsTree, NodeId};

/// Materialize one child of `leaf_id` and score it with the evaluator
///
/// The child is the un-materialized legal move with the highest prior in the
/// leaf's own evaluation; a leaf that must pass gets a single pass child.
/// Returns `None` when the leaf is terminal and has nothing to expand.
pub fn expand_and_evaluate<E: Evaluator>(
    tree: &mut MctsTree,
    leaf_id: NodeId,
    evaluator: &E,
) -> Result<Option<NodeId>> {
    let leaf = &tree.nodes[leaf_id];
    if leaf.is_terminal {
        return Ok(None);
    }

    let (action, prior) = match best_prior_candidate(leaf) {
        Some((coord, prior)) => (Move::Place(coord), prior),
        None => (Move::Pass, 1.0),
    };

    // Root children keep the searching color; deeper nodes alternate
    let color = if leaf.parent.is_none() {
        leaf.color
    } else {
        leaf.color.opponent()
    };
    let mover = leaf.to_move;

    let mut child_state = leaf.state.clone();
    if let Move::Place(coord) = action {
        child_state.apply(coord, mover)?;
    }

    let leaf = &mut tree.nodes[leaf_id];
    leaf.expanded_moves.push(action);
    if leaf.unexpanded_moves().next().is_none() {
        leaf.status = ExpansionStatus::Full;
    }

    let to_move = color.opponent();
    let eval = evaluator.evaluate(&child_state, to_move)?;
    eval.validate()?;

    // The evaluator scores the position for the side to move; flip it to the node's color
    let mut score = -eval.value;
    if child_state.is_full() {
        score = terminal_score(&child_state, color);
    }

    let child = MctsNode::new_child(
        child_state,
        color,
        action,
        leaf_id,
        prior,
        eval.priors,
        score,
    );
    Ok(Some(tree.add_child(leaf_id, child)))
}

/// Highest-prior legal move not yet materialized (first one on ties)
pub(crate) fn best_prior_candidate(node: &MctsNode) -> Option<(Coord, f32)> {
    let mut best: Option<(Coord, f32)> = None;
    for coord in node.unexpanded_moves() {
        let prior = node.priors[coord.index()];
        match best {
            Some((_, best_prior)) if !(prior > best_prior) => {}
            _ => best = Some((coord, prior)),
        }
    }
    best
}

/// Exact score of a filled board for the node whose mover is `color`
///
/// The absolute margin counts for Black and against White, regardless of
/// which side actually won.
pub(crate) fn terminal_score(board: &Board, color: Color) -> f32 {
    let (_, margin) = board.winner();
    match color {
        Color::Black => margin as f32,
        Color::White => -(margin as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{EvalResult, EvaluatorError, UniformEvaluator};
    use reversi_core::NUM_SQUARES;

    fn root_tree(board: Board, color: Color, priors: [f32; NUM_SQUARES]) -> MctsTree {
        let mut tree = MctsTree::new();
        tree.initialize_root(MctsNode::new_root(board, color, priors, 0.0));
        tree
    }

    #[test]
    fn test_expansion_follows_priors() {
        let mut priors = [0.0; NUM_SQUARES];
        priors[Coord::new(4, 5).index()] = 0.6;
        priors[Coord::new(2, 3).index()] = 0.3;
        let mut tree = root_tree(Board::new(), Color::Black, priors);

        let first = expand_and_evaluate(&mut tree, 0, &UniformEvaluator)
            .unwrap()
            .unwrap();
        let second = expand_and_evaluate(&mut tree, 0, &UniformEvaluator)
            .unwrap()
            .unwrap();

        assert_eq!(
            tree.nodes[first].move_action,
            Some(Move::Place(Coord::new(4, 5)))
        );
        assert_eq!(tree.nodes[first].prior_probability, 0.6);
        assert_eq!(
            tree.nodes[second].move_action,
            Some(Move::Place(Coord::new(2, 3)))
        );
        assert_eq!(tree.nodes[0].status, ExpansionStatus::Partial);
    }

    #[test]
    fn test_root_becomes_full_after_last_candidate() {
        let mut tree = root_tree(Board::new(), Color::Black, [0.25; NUM_SQUARES]);
        for _ in 0..3 {
            expand_and_evaluate(&mut tree, 0, &UniformEvaluator).unwrap();
            assert_eq!(tree.nodes[0].status, ExpansionStatus::Partial);
        }
        expand_and_evaluate(&mut tree, 0, &UniformEvaluator).unwrap();
        assert_eq!(tree.nodes[0].status, ExpansionStatus::Full);
        assert_eq!(tree.nodes[0].children.len(), 4);
    }

    #[test]
    fn test_child_colors_and_state() {
        let mut tree = root_tree(Board::new(), Color::White, [0.25; NUM_SQUARES]);
        let child = expand_and_evaluate(&mut tree, 0, &UniformEvaluator)
            .unwrap()
            .unwrap();
        // Root children keep the searching color
        assert_eq!(tree.nodes[child].color, Color::White);
        assert_eq!(tree.nodes[child].to_move, Color::Black);
        assert_eq!(tree.nodes[child].state.white_count(), 4);

        let grandchild = expand_and_evaluate(&mut tree, child, &UniformEvaluator)
            .unwrap()
            .unwrap();
        assert_eq!(tree.nodes[grandchild].color, Color::Black);
        assert_eq!(tree.nodes[grandchild].to_move, Color::White);
    }

    #[test]
    fn test_evaluator_value_is_negated() {
        let evaluator = |_: &Board, _: Color| {
            Ok::<_, EvaluatorError>(EvalResult::new([0.0; NUM_SQUARES], 0.4))
        };
        let mut tree = root_tree(Board::new(), Color::Black, [0.25; NUM_SQUARES]);
        let child = expand_and_evaluate(&mut tree, 0, &evaluator)
            .unwrap()
            .unwrap();
        assert!((tree.nodes[child].eval_score + 0.4).abs() < 1e-6);
        assert_eq!(tree.nodes[child].visit_count, 1);
    }

    #[test]
    fn test_pass_child_for_blocked_side() {
        // White can capture at A3; Black has no legal move
        let board: Board = format!("O-------X-------{}", "-".repeat(48))
            .parse()
            .unwrap();
        let mut tree = root_tree(board, Color::Black, [0.0; NUM_SQUARES]);
        let child = expand_and_evaluate(&mut tree, 0, &UniformEvaluator)
            .unwrap()
            .unwrap();

        assert_eq!(tree.nodes[child].move_action, Some(Move::Pass));
        assert_eq!(tree.nodes[child].state, tree.nodes[0].state);
        assert_eq!(tree.nodes[child].to_move, Color::White);
        assert_eq!(tree.nodes[child].legal_moves, vec![Coord::new(2, 0)]);
        assert_eq!(tree.nodes[0].status, ExpansionStatus::Full);
    }

    #[test]
    fn test_terminal_leaf_is_not_expanded() {
        let board: Board = "X".repeat(64).parse().unwrap();
        let mut tree = root_tree(board, Color::Black, [0.0; NUM_SQUARES]);
        assert!(expand_and_evaluate(&mut tree, 0, &UniformEvaluator)
            .unwrap()
            .is_none());
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn test_filled_board_uses_color_signed_margin() {
        // One empty corner: Black fills it and the board is full
        let board: Board = format!("-O{}{}", "X".repeat(40), "O".repeat(22))
            .parse()
            .unwrap();
        let evaluator = |_: &Board, _: Color| {
            Ok::<_, EvaluatorError>(EvalResult::new([0.0; NUM_SQUARES], 0.9))
        };
        let mut tree = root_tree(board, Color::Black, [0.0; NUM_SQUARES]);
        let child = expand_and_evaluate(&mut tree, 0, &evaluator)
            .unwrap()
            .unwrap();

        let node = &tree.nodes[child];
        assert!(node.state.is_full());
        let (_, margin) = node.state.winner();
        assert_eq!(node.eval_score, margin as f32);
        assert!(node.is_terminal);
    }

    #[test]
    fn test_terminal_score_sign_follows_color() {
        let board: Board = format!("{}{}", "O".repeat(40), "X".repeat(24))
            .parse()
            .unwrap();
        assert_eq!(terminal_score(&board, Color::Black), 16.0);
        assert_eq!(terminal_score(&board, Color::White), -16.0);
    }

    #[test]
    fn test_evaluator_error_propagates() {
        let failing = |_: &Board, _: Color| -> std::result::Result<EvalResult, EvaluatorError> {
            Err(EvaluatorError::EvaluationFailed("model offline".into()))
        };
        let mut tree = root_tree(Board::new(), Color::Black, [0.25; NUM_SQUARES]);
        let result = expand_and_evaluate(&mut tree, 0, &failing);
        assert!(matches!(
            result,
            Err(crate::error::MctsError::EvaluatorError(_))
        ));
    }
}
