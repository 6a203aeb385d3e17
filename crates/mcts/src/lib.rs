// Module declarations
mod backup;
pub mod classic;
mod config;
mod dirichlet;
mod error;
mod evaluation;
mod expansion;
mod guided;
mod player;
mod search_result;
mod selection;
mod tree;

// Public exports
pub use classic::{ClassicResult, ClassicSearch};
pub use config::{MctsConfig, UctConfig};
pub use error::{MctsError, Result};
pub use evaluation::{
    softmax_legal_moves, EvalResult, Evaluator, EvaluatorError, UniformEvaluator,
};
pub use guided::{visit_distribution, GuidedSearch};
pub use player::{ClassicPlayer, GuidedPlayer, Player};
pub use search_result::SearchResult;
