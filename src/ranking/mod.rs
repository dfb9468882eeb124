pub mod normalize;
pub mod selector;

pub use normalize::{normalize, without_whitespace};
pub use selector::{
    select_best_match, similarity, MatchSelector, DEFAULT_POSITION_DECAY, DEFAULT_THRESHOLD,
    WHITESPACE_EQUIVALENT_SCORE,
};
