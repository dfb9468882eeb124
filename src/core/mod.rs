pub mod candidate;
pub mod match_result;

pub use candidate::{Candidate, ModLoader, ModQuery, Website};
pub use match_result::{MatchResult, ModFile, ModResponse};
