use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::EngineConfig;
use crate::core::{Candidate, ModFile, ModLoader, ModQuery, Website};
use crate::error::Result;
use crate::providers::{check_status, decode, request_error, IntoCandidate, ModProvider};

const PROVIDER: &str = "curseforge";

/// CurseForge game id for Minecraft
const MINECRAFT_GAME_ID: u32 = 432;

/// CurseForge class id for "Mods" (as opposed to modpacks, resource packs...)
const MODS_CLASS_ID: u32 = 6;

/// CurseForge `ModLoaderType` enum values
fn loader_type(loader: ModLoader) -> u8 {
    match loader {
        ModLoader::Forge => 1,
        ModLoader::Fabric => 4,
        ModLoader::Quilt => 5,
        ModLoader::NeoForge => 6,
    }
}

/// CurseForge core API provider (requires an API key)
pub struct CurseForgeProvider {
    client: Client,
    base_url: String,
    api_key: String,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct CurseForgeMod {
    id: u64,
    name: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    logo: Option<ModAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModAsset {
    #[serde(default)]
    thumbnail_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseForgeFile {
    id: u64,
    #[serde(default)]
    display_name: String,
    file_name: String,
    file_date: DateTime<Utc>,
    #[serde(default)]
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MinecraftVersion {
    version_string: String,
}

impl IntoCandidate for CurseForgeMod {
    fn to_candidate(&self, rank: usize) -> Candidate {
        let mut candidate = Candidate::new(Website::CurseForge, self.id.to_string(), &self.name, rank);
        if !self.slug.is_empty() {
            candidate = candidate.with_slug(self.slug.as_str());
        }
        if let Some(logo) = &self.logo {
            candidate = candidate.with_image(logo.thumbnail_url.as_str());
        }
        candidate
    }
}

impl CurseForgeFile {
    /// Files whose authors opted out of third-party distribution come back
    /// without a `downloadUrl`; the CDN path is derived from the file id.
    fn resolved_url(&self) -> String {
        match &self.download_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "https://edge.forgecdn.net/files/{}/{}/{}",
                self.id / 1000,
                self.id % 1000,
                urlencoding::encode(&self.file_name)
            ),
        }
    }
}

fn newest_file(files: Vec<CurseForgeFile>) -> Option<ModFile> {
    let newest = files.into_iter().max_by_key(|f| f.file_date)?;
    let url = newest.resolved_url();
    let version_name = if newest.display_name.is_empty() {
        newest.file_name.clone()
    } else {
        newest.display_name.clone()
    };

    Some(ModFile {
        file_name: newest.file_name,
        url,
        version_name,
        published_at: newest.file_date,
    })
}

/// Plain release numbers like `1.20.1`; drops snapshots and pre-releases
fn is_release_version(version: &str) -> bool {
    !version.is_empty()
        && version.split('.').all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

impl CurseForgeProvider {
    /// Create new CurseForge provider; fails when no API key is configured
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let api_key = config.require_curseforge_key()?.to_string();
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.curseforge_url.trim_end_matches('/').to_string(),
            api_key,
            limit: config.search_limit,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| request_error(PROVIDER, e))?;
        let response = check_status(PROVIDER, response).await?;
        let envelope: DataEnvelope<T> = decode(PROVIDER, response).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ModProvider for CurseForgeProvider {
    async fn search(&self, query: &ModQuery) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}/v1/mods/search?gameId={}&classId={}&searchFilter={}&gameVersion={}&modLoaderType={}&sortField=2&sortOrder=desc&pageSize={}",
            self.base_url,
            MINECRAFT_GAME_ID,
            MODS_CLASS_ID,
            urlencoding::encode(&query.name),
            urlencoding::encode(&query.game_version),
            loader_type(query.loader),
            self.limit
        );

        let mods: Vec<CurseForgeMod> = self.get(&url).await?;
        tracing::debug!("CurseForge returned {} mods for '{}'", mods.len(), query.name);

        Ok(mods
            .iter()
            .enumerate()
            .map(|(rank, m)| m.to_candidate(rank))
            .collect())
    }

    async fn latest_file(&self, candidate: &Candidate, query: &ModQuery) -> Result<Option<ModFile>> {
        let url = format!(
            "{}/v1/mods/{}/files?gameVersion={}&modLoaderType={}",
            self.base_url,
            urlencoding::encode(&candidate.identifier),
            urlencoding::encode(&query.game_version),
            loader_type(query.loader)
        );

        let files: Vec<CurseForgeFile> = self.get(&url).await?;
        Ok(newest_file(files))
    }

    async fn game_versions(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1/minecraft/version", self.base_url);
        let versions: Vec<MinecraftVersion> = self.get(&url).await?;

        Ok(versions
            .into_iter()
            .map(|v| v.version_string)
            .filter(|v| is_release_version(v))
            .collect())
    }

    fn website(&self) -> Website {
        Website::CurseForge
    }
}
