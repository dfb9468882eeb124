use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::EngineConfig;
use crate::core::{Candidate, ModFile, ModQuery, Website};
use crate::error::Result;
use crate::providers::{check_status, decode, request_error, IntoCandidate, ModProvider};

const PROVIDER: &str = "modrinth";

/// Modrinth v2 API provider
pub struct ModrinthProvider {
    client: Client,
    base_url: String,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    project_id: String,
    #[serde(default)]
    slug: String,
    title: String,
    #[serde(default)]
    icon_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectVersion {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version_number: String,
    date_published: DateTime<Utc>,
    #[serde(default)]
    files: Vec<VersionFile>,
}

#[derive(Debug, Deserialize)]
struct VersionFile {
    url: String,
    filename: String,
    #[serde(default)]
    primary: bool,
}

#[derive(Debug, Deserialize)]
struct GameVersionTag {
    version: String,
    version_type: String,
}

impl IntoCandidate for SearchHit {
    fn to_candidate(&self, rank: usize) -> Candidate {
        let slug = if self.slug.is_empty() {
            &self.project_id
        } else {
            &self.slug
        };
        Candidate::new(Website::Modrinth, &self.project_id, &self.title, rank)
            .with_slug(slug.as_str())
            .with_image(self.icon_url.clone().unwrap_or_default())
    }
}

/// Newest version's primary file (first file when none is flagged primary)
fn newest_file(versions: Vec<ProjectVersion>) -> Option<ModFile> {
    let newest = versions.into_iter().max_by_key(|v| v.date_published)?;
    let file = newest
        .files
        .iter()
        .find(|f| f.primary)
        .or_else(|| newest.files.first())?;

    let version_name = if newest.version_number.is_empty() {
        newest.name.clone()
    } else {
        newest.version_number.clone()
    };

    Some(ModFile {
        file_name: file.filename.clone(),
        url: file.url.clone(),
        version_name,
        published_at: newest.date_published,
    })
}

impl ModrinthProvider {
    /// Create new Modrinth provider
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.modrinth_url.trim_end_matches('/').to_string(),
            limit: config.search_limit,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER, e))?;
        let response = check_status(PROVIDER, response).await?;
        decode(PROVIDER, response).await
    }
}

#[async_trait]
impl ModProvider for ModrinthProvider {
    async fn search(&self, query: &ModQuery) -> Result<Vec<Candidate>> {
        let facets = serde_json::to_string(&[
            [format!("categories:{}", query.loader)],
            [format!("versions:{}", query.game_version)],
            ["project_type:mod".to_string()],
        ])?;
        let url = format!(
            "{}/v2/search?query={}&facets={}&limit={}",
            self.base_url,
            urlencoding::encode(&query.name),
            urlencoding::encode(&facets),
            self.limit
        );

        let response: SearchResponse = self.get(&url).await?;
        tracing::debug!("Modrinth returned {} hits for '{}'", response.hits.len(), query.name);

        Ok(response
            .hits
            .iter()
            .enumerate()
            .map(|(rank, hit)| hit.to_candidate(rank))
            .collect())
    }

    async fn latest_file(&self, candidate: &Candidate, query: &ModQuery) -> Result<Option<ModFile>> {
        let loaders = serde_json::to_string(&[query.loader.as_str()])?;
        let game_versions = serde_json::to_string(&[query.game_version.as_str()])?;
        let url = format!(
            "{}/v2/project/{}/version?loaders={}&game_versions={}",
            self.base_url,
            urlencoding::encode(&candidate.identifier),
            urlencoding::encode(&loaders),
            urlencoding::encode(&game_versions)
        );

        let versions: Vec<ProjectVersion> = self.get(&url).await?;
        Ok(newest_file(versions))
    }

    async fn game_versions(&self) -> Result<Vec<String>> {
        let url = format!("{}/v2/tag/game_version", self.base_url);
        let tags: Vec<GameVersionTag> = self.get(&url).await?;

        Ok(tags
            .into_iter()
            .filter(|t| t.version_type == "release")
            .map(|t| t.version)
            .collect())
    }

    fn website(&self) -> Website {
        Website::Modrinth
    }
}
