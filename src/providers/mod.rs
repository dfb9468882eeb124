pub mod curseforge;
pub mod modrinth;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};

use crate::core::{Candidate, ModFile, ModQuery, Website};
use crate::error::{ModFinderError, Result};

pub use curseforge::CurseForgeProvider;
pub use modrinth::ModrinthProvider;

/// Provider-specific search hit that can be flattened into a [`Candidate`]
pub trait IntoCandidate {
    fn to_candidate(&self, rank: usize) -> Candidate;
}

/// Trait for mod catalogs (Modrinth, CurseForge)
#[async_trait]
pub trait ModProvider: Send + Sync {
    /// Search by name, filtered by game version and loader, in relevance order
    async fn search(&self, query: &ModQuery) -> Result<Vec<Candidate>>;

    /// Newest file of a project matching the query's version and loader
    async fn latest_file(&self, candidate: &Candidate, query: &ModQuery) -> Result<Option<ModFile>>;

    /// Release game versions known to the catalog, newest first
    async fn game_versions(&self) -> Result<Vec<String>>;

    fn website(&self) -> Website;

    /// Get provider name for logging
    fn name(&self) -> &str {
        self.website().as_str()
    }
}

/// Map a transport failure, keeping timeouts distinguishable
pub(crate) fn request_error(provider: &str, err: reqwest::Error) -> ModFinderError {
    if err.is_timeout() {
        ModFinderError::HttpRequest(err)
    } else {
        ModFinderError::provider(provider, format!("Request failed: {}", err))
    }
}

/// Reject non-success responses, singling out catalog rate limiting
pub(crate) async fn check_status(provider: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ModFinderError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if !status.is_success() {
        return Err(ModFinderError::provider(
            provider,
            format!("HTTP {}: {}", status, response.text().await.unwrap_or_default()),
        ));
    }
    Ok(response)
}

/// Decode a JSON body, reporting failures against the provider
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ModFinderError::provider(provider, format!("Invalid JSON: {}", e)))
}
