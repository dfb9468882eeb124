use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use modfinder_engine::{
    Candidate, ModFile, ModFinder, ModFinderError, ModLoader, ModProvider, ModQuery, Result, Website,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Canned catalog returning the same result list for every search
struct MockProvider {
    website: Website,
    titles: Vec<&'static str>,
    searches: AtomicUsize,
    file_lookups: AtomicUsize,
    fail_files: bool,
    rate_limit_search: bool,
}

impl MockProvider {
    fn new(website: Website, titles: Vec<&'static str>) -> Self {
        Self {
            website,
            titles,
            searches: AtomicUsize::new(0),
            file_lookups: AtomicUsize::new(0),
            fail_files: false,
            rate_limit_search: false,
        }
    }
}

#[async_trait]
impl ModProvider for MockProvider {
    async fn search(&self, _query: &ModQuery) -> Result<Vec<Candidate>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.rate_limit_search {
            return Err(ModFinderError::RateLimited {
                provider: "mock".to_string(),
            });
        }
        Ok(self
            .titles
            .iter()
            .enumerate()
            .map(|(rank, title)| {
                let slug = title.to_lowercase().replace(' ', "-");
                Candidate::new(self.website, format!("id-{}", rank), *title, rank).with_slug(slug)
            })
            .collect())
    }

    async fn latest_file(&self, candidate: &Candidate, query: &ModQuery) -> Result<Option<ModFile>> {
        self.file_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_files {
            return Err(ModFinderError::RateLimited {
                provider: "mock".to_string(),
            });
        }
        Ok(Some(ModFile {
            file_name: format!("{}-{}-{}.jar", candidate.slug, query.loader, query.game_version),
            url: format!("https://cdn.example/{}.jar", candidate.slug),
            version_name: "1.0.0".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }))
    }

    async fn game_versions(&self) -> Result<Vec<String>> {
        Ok(vec!["1.20.4".to_string(), "1.20.1".to_string()])
    }

    fn website(&self) -> Website {
        self.website
    }
}

fn finder_with(provider: MockProvider) -> (ModFinder, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let mut finder = ModFinder::default();
    finder.add_provider(provider.clone());
    (finder, provider)
}

#[tokio::test]
async fn test_exact_title_resolves_with_file() {
    let (finder, provider) = finder_with(MockProvider::new(
        Website::Modrinth,
        vec!["Fabric API", "Fabric Language Kotlin", "Forge Config API Port"],
    ));
    let query = ModQuery::new("fabric api", "1.20.1", ModLoader::Fabric);

    let found = finder.find(Website::Modrinth, &query).await.unwrap();

    assert_eq!(found.title, "Fabric API");
    assert_eq!(found.id, "id-0");
    assert_eq!(found.similarity, 1.0);
    assert!(!found.is_uncertain());
    assert_eq!(found.file.unwrap().file_name, "fabric-api-fabric-1.20.1.jar");
    assert_eq!(provider.file_lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_loader_variant_resolves_as_canonical_match() {
    let (finder, _) = finder_with(MockProvider::new(
        Website::CurseForge,
        vec!["Just Enough Resources", "JEI (Forge)"],
    ));
    let query = ModQuery::new("JEI", "1.20.1", ModLoader::Forge);

    let found = finder.find(Website::CurseForge, &query).await.unwrap();

    assert_eq!(found.title, "JEI (Forge)");
    assert_eq!(found.similarity, 1.0);
    assert_eq!(found.website, Website::CurseForge);
}

#[tokio::test]
async fn test_unrelated_name_is_not_found() {
    let (finder, provider) = finder_with(MockProvider::new(
        Website::Modrinth,
        vec!["Sodium", "Lithium", "Iris Shaders"],
    ));
    let query = ModQuery::new("lorem ipsum", "1.20.1", ModLoader::Fabric);

    let err = finder.find(Website::Modrinth, &query).await.unwrap_err();

    assert!(matches!(err, ModFinderError::NotFound(name) if name == "lorem ipsum"));
    assert_eq!(provider.file_lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_catalog_is_not_found() {
    let (finder, _) = finder_with(MockProvider::new(Website::Modrinth, Vec::new()));
    let query = ModQuery::new("sodium", "1.20.1", ModLoader::Fabric);

    assert!(matches!(
        finder.find(Website::Modrinth, &query).await,
        Err(ModFinderError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_file_lookup_failure_still_returns_match() {
    let mut provider = MockProvider::new(Website::Modrinth, vec!["Mod Menu"]);
    provider.fail_files = true;
    let (finder, _) = finder_with(provider);
    let query = ModQuery::new("modmenu", "1.20.1", ModLoader::Quilt);

    let found = finder.find(Website::Modrinth, &query).await.unwrap();

    assert_eq!(found.title, "Mod Menu");
    assert_eq!(found.similarity, 0.9);
    assert!(found.file.is_none());
}

#[tokio::test]
async fn test_batch_lookup_dedupes_titles() {
    let (finder, _) = finder_with(MockProvider::new(
        Website::Modrinth,
        vec!["Sodium", "Sodium Extra", "Reese's Sodium Options"],
    ));
    let names = vec![
        "sodium".to_string(),
        "Sodium (Fabric)".to_string(),
        "lorem ipsum".to_string(),
    ];

    let entries = finder
        .find_all(Website::Modrinth, &names, "1.20.1", ModLoader::Fabric)
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "sodium");
    assert!(entries[0].result.is_ok());
    assert!(entries[1].result.is_err());
}

#[tokio::test]
async fn test_batch_lookup_stops_when_rate_limited() {
    let mut provider = MockProvider::new(Website::Modrinth, vec!["Sodium", "Lithium"]);
    provider.rate_limit_search = true;
    let (finder, provider) = finder_with(provider);
    let names: Vec<String> = ["sodium", "lithium", "iris", "modmenu", "jei"]
        .iter()
        .map(|name| name.to_string())
        .collect();

    let result = finder
        .find_all(Website::Modrinth, &names, "1.20.1", ModLoader::Fabric)
        .await;

    assert!(matches!(result, Err(ModFinderError::RateLimited { .. })));
    assert_eq!(provider.searches.load(Ordering::SeqCst), 1);
    assert_eq!(provider.file_lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_game_versions_and_websites() {
    let (mut finder, _) = finder_with(MockProvider::new(Website::Modrinth, Vec::new()));
    finder.add_provider(Arc::new(MockProvider::new(Website::CurseForge, Vec::new())));

    assert_eq!(finder.websites(), vec![Website::CurseForge, Website::Modrinth]);
    assert_eq!(
        finder.game_versions(Website::Modrinth).await.unwrap(),
        vec!["1.20.4", "1.20.1"]
    );
}
