//! # ModFinder Engine
//!
//! Minecraft mod lookup engine with:
//! - Multi-catalog support (Modrinth, CurseForge)
//! - Loader-aware title normalization ("JEI (Fabric)" == "jei")
//! - Tiered best-match selection with position decay
//! - FIFO request throttling for the HTTP layer
//! - Multiple interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use modfinder_engine::{EngineConfig, ModFinder, ModLoader, ModQuery, Website};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let finder = ModFinder::from_config(&EngineConfig::from_env()?)?;
//!
//!     let query = ModQuery::new("sodium", "1.20.1", ModLoader::Fabric);
//!     let found = finder.find(Website::Modrinth, &query).await?;
//!
//!     println!("Found: {} - {:.2}", found.title, found.similarity);
//!     Ok(())
//! }
//! ```
//!
//! The matching core is synchronous and pure:
//!
//! ```rust
//! use modfinder_engine::{normalize, select_best_match, Candidate, Website};
//!
//! assert_eq!(normalize("Mod Name - Fabric/Quilt"), "mod name");
//!
//! let candidates = vec![Candidate::new(Website::Modrinth, "P7dR8mSH", "Fabric API", 0)];
//! let result = select_best_match("fabric api", &candidates);
//! assert_eq!(result.similarity, 1.0);
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod providers;
pub mod ranking;
pub mod throttle;

// Re-export primary types
pub use crate::core::{Candidate, MatchResult, ModFile, ModLoader, ModQuery, ModResponse, Website};
pub use config::{ConfigError, EngineConfig};
pub use engine::{BatchEntry, ModFinder};
pub use error::{ModFinderError, Result};
pub use providers::{IntoCandidate, ModProvider};
pub use ranking::{normalize, select_best_match, MatchSelector};
pub use throttle::RateLimiter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
