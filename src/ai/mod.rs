//! Computer opponent: static evaluation and minimax search with alpha-beta
//! pruning.

mod heuristic;
mod minimax;

pub use heuristic::{Heuristic, WindowHeuristic};
pub use minimax::{MinimaxAgent, SearchResult};

/// Position score from the AI's point of view.
pub type Score = i64;

/// Score of a position the AI has won. The human's win is its negation.
pub const WIN_SCORE: Score = 100_000_000_000;

pub const NEG_INF: Score = Score::MIN;
pub const POS_INF: Score = Score::MAX;
