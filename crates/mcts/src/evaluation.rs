use reversi_core::{Board, Color, Coord, NUM_SQUARES};
use thiserror::Error;

/// Errors reported by an evaluator
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid evaluator output: {0}")]
    InvalidOutput(String),
}

/// Priors and value for one position
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    /// Prior probability per square, indexed `row * 8 + col`.
    /// Only entries at legal moves are consulted.
    pub priors: [f32; NUM_SQUARES],

    /// Expected outcome in [-1, 1] from the side to move's perspective
    pub value: f32,
}

impl EvalResult {
    pub fn new(priors: [f32; NUM_SQUARES], value: f32) -> Self {
        Self { priors, value }
    }

    /// Build priors from raw policy logits, softmaxed over `legal_moves` only
    ///
    /// Illegal squares get probability 0.
    pub fn from_logits(logits: &[f32; NUM_SQUARES], legal_moves: &[Coord], value: f32) -> Self {
        let mut priors = [0f32; NUM_SQUARES];
        for (c, p) in legal_moves
            .iter()
            .zip(softmax_legal_moves(logits, legal_moves))
        {
            priors[c.index()] = p;
        }
        Self { priors, value }
    }

    /// Prior assigned to `coord`
    pub fn prior(&self, coord: Coord) -> f32 {
        self.priors[coord.index()]
    }

    pub(crate) fn validate(&self) -> Result<(), EvaluatorError> {
        if !self.value.is_finite() {
            return Err(EvaluatorError::InvalidOutput(format!(
                "non-finite value {}",
                self.value
            )));
        }
        if let Some((idx, p)) = self.priors.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(EvaluatorError::InvalidOutput(format!(
                "non-finite prior {p} at square {idx}"
            )));
        }
        Ok(())
    }
}

/// Maps a position to move priors and a scalar value
///
/// Implementations are expected to be free of external side effects so the
/// search can call them once per created node. Any closure
/// `Fn(&Board, Color) -> Result<EvalResult, EvaluatorError>` is an evaluator.
pub trait Evaluator {
    fn evaluate(&self, board: &Board, to_move: Color) -> Result<EvalResult, EvaluatorError>;
}

impl<F> Evaluator for F
where
    F: Fn(&Board, Color) -> Result<EvalResult, EvaluatorError>,
{
    fn evaluate(&self, board: &Board, to_move: Color) -> Result<EvalResult, EvaluatorError> {
        self(board, to_move)
    }
}

/// Equal priors over the legal moves and a neutral value
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, board: &Board, to_move: Color) -> Result<EvalResult, EvaluatorError> {
        let legal = board.legal_moves(to_move);
        let mut priors = [0f32; NUM_SQUARES];
        if !legal.is_empty() {
            let p = 1.0 / legal.len() as f32;
            for c in legal {
                priors[c.index()] = p;
            }
        }
        Ok(EvalResult::new(priors, 0.0))
    }
}

/// Compute softmax over legal moves only
///
/// Returns one probability per entry of `legal_moves`, in the same order.
pub fn softmax_legal_moves(logits: &[f32; NUM_SQUARES], legal_moves: &[Coord]) -> Vec<f32> {
    if legal_moves.is_empty() {
        return Vec::new();
    }

    // Find max for numerical stability
    let max = legal_moves
        .iter()
        .map(|c| logits[c.index()])
        .fold(f32::NEG_INFINITY, f32::max);

    let exp_vals: Vec<f32> = legal_moves
        .iter()
        .map(|c| (logits[c.index()] - max).exp())
        .collect();
    let exp_sum: f32 = exp_vals.iter().sum();

    exp_vals.into_iter().map(|e| e / exp_sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coords(idxs: &[usize]) -> Vec<Coord> {
        idxs.iter().map(|&i| Coord::from_index(i).unwrap()).collect()
    }

    #[test]
    fn test_softmax_legal_moves() {
        let mut logits = [0f32; NUM_SQUARES];
        logits[..4].copy_from_slice(&[1.0, 2.0, 3.0, 0.5]);
        let legal = coords(&[0, 1, 2]);

        let probs = softmax_legal_moves(&logits, &legal);

        let sum: f32 = probs.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
        assert!(probs[2] > probs[1]);
        assert!(probs[1] > probs[0]);
        assert_eq!(probs.len(), 3);
    }

    #[test]
    fn test_softmax_numerical_stability() {
        let mut logits = [0f32; NUM_SQUARES];
        logits[..3].copy_from_slice(&[1000.0, 1001.0, 1002.0]);
        let probs = softmax_legal_moves(&logits, &coords(&[0, 1, 2]));

        assert!(probs.iter().all(|&p| p.is_finite()));
        let sum: f32 = probs.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_softmax_empty() {
        let logits = [0f32; NUM_SQUARES];
        assert!(softmax_legal_moves(&logits, &[]).is_empty());
    }

    #[test]
    fn test_from_logits_zeroes_illegal_squares() {
        let mut logits = [5f32; NUM_SQUARES];
        logits[19] = 10.0;
        let legal = coords(&[19, 26]);
        let eval = EvalResult::from_logits(&logits, &legal, 0.2);

        assert!(eval.prior(Coord::new(2, 3)) > eval.prior(Coord::new(3, 2)));
        let total: f32 = eval.priors.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-5);
        assert_eq!(eval.priors.iter().filter(|&&p| p > 0.0).count(), 2);
        assert_eq!(eval.value, 0.2);
    }

    #[test]
    fn test_uniform_evaluator_opening() {
        let board = Board::new();
        let eval = UniformEvaluator::new()
            .evaluate(&board, Color::Black)
            .unwrap();

        assert_eq!(eval.value, 0.0);
        for c in board.legal_moves(Color::Black) {
            assert_relative_eq!(eval.prior(c), 0.25);
        }
        let total: f32 = eval.priors.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_closure_is_evaluator() {
        let eval = |_: &Board, _: Color| {
            Ok::<_, EvaluatorError>(EvalResult::new([0.0; NUM_SQUARES], 0.5))
        };
        let out = eval.evaluate(&Board::new(), Color::White).unwrap();
        assert_eq!(out.value, 0.5);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let eval = EvalResult::new([0.0; NUM_SQUARES], f32::NAN);
        assert!(eval.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_priors() {
        let mut priors = [0.25; NUM_SQUARES];
        priors[19] = f32::NAN;
        let result = EvalResult::new(priors, 0.0).validate();
        assert!(matches!(result, Err(EvaluatorError::InvalidOutput(_))));

        priors[19] = f32::INFINITY;
        assert!(EvalResult::new(priors, 0.0).validate().is_err());

        priors[19] = 0.25;
        assert!(EvalResult::new(priors, 0.0).validate().is_ok());
    }
}
