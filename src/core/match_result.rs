use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Candidate, Website};

/// Outcome of the match selector
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Whether a qualifying candidate was found
    pub matched: bool,

    /// Winning candidate, present only when `matched`
    pub candidate: Option<Candidate>,

    /// 1.0 for exact/canonical matches, otherwise the decayed fuzzy score
    pub similarity: f64,
}

impl MatchResult {
    pub fn found(candidate: Candidate, similarity: f64) -> Self {
        Self {
            matched: true,
            candidate: Some(candidate),
            similarity,
        }
    }

    pub fn not_found() -> Self {
        Self {
            matched: false,
            candidate: None,
            similarity: 0.0,
        }
    }

    /// Check if the match was exact (raw or canonical)
    pub fn is_exact(&self) -> bool {
        self.matched && self.similarity >= 1.0
    }
}

/// A downloadable file for a matched mod
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModFile {
    pub file_name: String,
    pub url: String,
    pub version_name: String,
    pub published_at: DateTime<Utc>,
}

/// Resolved mod as returned to HTTP/CLI callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModResponse {
    pub title: String,
    pub slug: String,
    pub id: String,
    pub image: String,

    /// Match similarity (0.0 - 1.0)
    pub similarity: f64,

    pub website: Website,

    /// Newest file for the requested version/loader, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<ModFile>,

    /// Lookup latency in milliseconds
    #[serde(default)]
    pub latency_ms: f64,
}

impl ModResponse {
    pub fn new(candidate: Candidate, similarity: f64) -> Self {
        Self {
            title: candidate.title,
            slug: candidate.slug,
            id: candidate.identifier,
            image: candidate.image,
            similarity,
            website: candidate.website,
            file: None,
            latency_ms: 0.0,
        }
    }

    pub fn with_file(mut self, file: Option<ModFile>) -> Self {
        self.file = file;
        self
    }

    /// Anything short of 1.0 is worth a warning in the UI
    pub fn is_uncertain(&self) -> bool {
        self.similarity < 1.0
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        format!(
            "{} [{}:{}] {:.3}",
            self.title, self.website, self.slug, self.similarity
        )
    }
}
