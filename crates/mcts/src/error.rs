use thiserror::Error;

use crate::evaluation::EvaluatorError;

#[derive(Error, Debug)]
pub enum MctsError {
    #[error("Board error: {0}")]
    BoardError(#[from] reversi_core::BoardError),

    #[error("Evaluator error: {0}")]
    EvaluatorError(#[from] EvaluatorError),

    #[error("Terminal position cannot be searched")]
    TerminalPosition,

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid node ID: {0}")]
    InvalidNodeId(usize),

    #[error("Dirichlet sampling error: {0}")]
    DirichletError(String),

    #[error("Move sampling error: {0}")]
    SamplingError(String),
}

pub type Result<T> = std::result::Result<T, MctsError>;
