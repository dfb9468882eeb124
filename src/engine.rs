use crate::config::EngineConfig;
use crate::core::{ModLoader, ModQuery, ModResponse, Website};
use crate::error::{ModFinderError, Result};
use crate::providers::{CurseForgeProvider, ModProvider, ModrinthProvider};
use crate::ranking::MatchSelector;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Main mod lookup orchestrator
pub struct ModFinder {
    selector: MatchSelector,
    providers: HashMap<Website, Arc<dyn ModProvider>>,
}

/// Outcome for one name of a batch lookup
#[derive(Debug)]
pub struct BatchEntry {
    pub name: String,
    pub result: Result<ModResponse>,
}

impl Default for ModFinder {
    fn default() -> Self {
        Self::new(MatchSelector::default())
    }
}

impl ModFinder {
    /// Create an engine with no providers registered
    pub fn new(selector: MatchSelector) -> Self {
        Self {
            selector,
            providers: HashMap::new(),
        }
    }

    /// Create an engine with Modrinth, plus CurseForge when a key is configured
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut finder = Self::default();
        finder.add_provider(Arc::new(ModrinthProvider::new(config)?));

        if config.curseforge_api_key.is_some() {
            finder.add_provider(Arc::new(CurseForgeProvider::new(config)?));
            tracing::info!("✅ CurseForge provider initialized");
        } else {
            tracing::warn!("⚠️ No CurseForge API key, only Modrinth is available");
        }

        Ok(finder)
    }

    /// Register a provider, replacing any previous one for the same website
    pub fn add_provider(&mut self, provider: Arc<dyn ModProvider>) {
        self.providers.insert(provider.website(), provider);
    }

    pub fn websites(&self) -> Vec<Website> {
        let mut websites: Vec<Website> = self.providers.keys().copied().collect();
        websites.sort_by_key(|w| w.as_str());
        websites
    }

    fn provider(&self, website: Website) -> Result<&Arc<dyn ModProvider>> {
        self.providers
            .get(&website)
            .ok_or(ModFinderError::ProviderUnavailable(website))
    }

    /// Resolve one mod name against a catalog
    pub async fn find(&self, website: Website, query: &ModQuery) -> Result<ModResponse> {
        let start = Instant::now();
        let provider = self.provider(website)?;

        let candidates = provider.search(query).await?;
        tracing::debug!("Provider {} returned {} candidates", provider.name(), candidates.len());

        let result = self.selector.select(&query.name, &candidates);
        let (candidate, similarity) = match result.candidate {
            Some(candidate) if result.matched => (candidate, result.similarity),
            _ => return Err(ModFinderError::NotFound(query.name.clone())),
        };

        let file = match provider.latest_file(&candidate, query).await {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Failed to fetch files for {}: {}", candidate.title, e);
                None
            }
        };
        if file.is_none() {
            tracing::debug!(
                "No {} file for {} on {}",
                query.loader,
                candidate.title,
                query.game_version
            );
        }

        let mut response = ModResponse::new(candidate, similarity).with_file(file);
        response.latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::info!("✅ {} → {} ({:.2}ms)", query.name, response.display(), response.latency_ms);
        Ok(response)
    }

    /// Resolve several names one after another.
    ///
    /// Entries resolving to the same title are collapsed, keeping a success
    /// over a failure. A catalog answering 429 aborts the whole batch with
    /// `RateLimited`; no further names are searched.
    pub async fn find_all(
        &self,
        website: Website,
        names: &[String],
        game_version: &str,
        loader: ModLoader,
    ) -> Result<Vec<BatchEntry>> {
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let query = ModQuery::new(name.as_str(), game_version, loader);
            let result = match self.find(website, &query).await {
                Err(e @ ModFinderError::RateLimited { .. }) => {
                    tracing::warn!("⚠️ Batch aborted at '{}': {}", name, e);
                    return Err(e);
                }
                result => result,
            };
            if let Err(e) = &result {
                tracing::warn!("Lookup for '{}' failed: {}", name, e);
            }
            entries.push(BatchEntry {
                name: name.clone(),
                result,
            });
        }
        Ok(dedupe_by_title(entries))
    }

    /// Release game versions offered by a catalog
    pub async fn game_versions(&self, website: Website) -> Result<Vec<String>> {
        self.provider(website)?.game_versions().await
    }
}

fn entry_title(entry: &BatchEntry) -> &str {
    match &entry.result {
        Ok(response) => &response.title,
        Err(_) => &entry.name,
    }
}

fn dedupe_by_title(entries: Vec<BatchEntry>) -> Vec<BatchEntry> {
    let mut kept: Vec<BatchEntry> = Vec::with_capacity(entries.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let title = entry_title(&entry).to_string();
        match index.get(&title) {
            Some(&i) => {
                if kept[i].result.is_err() && entry.result.is_ok() {
                    kept[i] = entry;
                }
            }
            None => {
                index.insert(title, kept.len());
                kept.push(entry);
            }
        }
    }
    kept
}
