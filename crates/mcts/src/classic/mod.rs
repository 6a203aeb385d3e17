//! Time-boxed UCT search with random rollouts
//!
//! Each decision grows a fresh statistics tree until the wall-clock budget
//! runs out, then plays the root child with the best mean reward.

mod rollout;
mod search;
mod tree;

pub use rollout::random_playout;
pub use search::{ClassicResult, ClassicSearch};
pub use tree::{UctNode, UctTree};
