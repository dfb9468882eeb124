use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModFinderError;

/// Minecraft mod-loading framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModLoader {
    Fabric,
    Forge,
    NeoForge,
    Quilt,
}

impl ModLoader {
    /// Every loader the normalizer treats as decoration
    pub const ALL: [ModLoader; 4] = [
        ModLoader::Fabric,
        ModLoader::Forge,
        ModLoader::NeoForge,
        ModLoader::Quilt,
    ];

    /// Lowercase identifier, as used in catalog facets and titles
    pub fn as_str(&self) -> &'static str {
        match self {
            ModLoader::Fabric => "fabric",
            ModLoader::Forge => "forge",
            ModLoader::NeoForge => "neoforge",
            ModLoader::Quilt => "quilt",
        }
    }
}

impl fmt::Display for ModLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModLoader {
    type Err = ModFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ModLoader::ALL
            .into_iter()
            .find(|loader| loader.as_str() == lower)
            .ok_or_else(|| ModFinderError::UnknownLoader(s.to_string()))
    }
}

/// Mod-hosting site a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Website {
    Modrinth,
    CurseForge,
}

impl Website {
    pub fn as_str(&self) -> &'static str {
        match self {
            Website::Modrinth => "modrinth",
            Website::CurseForge => "curseforge",
        }
    }

    /// Public project page for a slug
    pub fn project_url(&self, slug: &str) -> String {
        match self {
            Website::Modrinth => format!("https://modrinth.com/mod/{}", slug),
            Website::CurseForge => {
                format!("https://www.curseforge.com/minecraft/mc-mods/{}", slug)
            }
        }
    }
}

impl fmt::Display for Website {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Website {
    type Err = ModFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "modrinth" => Ok(Website::Modrinth),
            "curseforge" => Ok(Website::CurseForge),
            _ => Err(ModFinderError::UnknownWebsite(s.to_string())),
        }
    }
}

/// One search result from an external catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    /// Display name, arbitrary casing/spacing
    pub title: String,

    /// Provider-specific stable key (Modrinth project id, CurseForge numeric id)
    pub identifier: String,

    /// URL slug of the project page
    #[serde(default)]
    pub slug: String,

    /// Icon URL, passed through untouched
    #[serde(default)]
    pub image: String,

    /// Zero-based position in the provider's relevance order
    #[serde(default)]
    pub rank: usize,

    /// Catalog the candidate was returned by
    pub website: Website,
}

impl Candidate {
    /// Create a new Candidate with required fields
    pub fn new(
        website: Website,
        identifier: impl Into<String>,
        title: impl Into<String>,
        rank: usize,
    ) -> Self {
        let identifier = identifier.into();
        Self {
            title: title.into(),
            slug: identifier.clone(),
            identifier,
            image: String::new(),
            rank,
            website,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Project page on the originating website
    pub fn url(&self) -> String {
        self.website.project_url(&self.slug)
    }
}

/// User input for a single mod lookup
///
/// `game_version` and `loader` only parameterize the catalog request; the
/// matcher looks at `name` alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModQuery {
    pub name: String,
    pub game_version: String,
    pub loader: ModLoader,
}

impl ModQuery {
    pub fn new(name: impl Into<String>, game_version: impl Into<String>, loader: ModLoader) -> Self {
        Self {
            name: name.into(),
            game_version: game_version.into(),
            loader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_parsing_is_case_insensitive() {
        assert_eq!("Fabric".parse::<ModLoader>().unwrap(), ModLoader::Fabric);
        assert_eq!(" NEOFORGE ".parse::<ModLoader>().unwrap(), ModLoader::NeoForge);
        assert!(matches!(
            "rift".parse::<ModLoader>(),
            Err(ModFinderError::UnknownLoader(_))
        ));
    }

    #[test]
    fn test_website_parsing() {
        assert_eq!("CurseForge".parse::<Website>().unwrap(), Website::CurseForge);
        assert_eq!("modrinth".parse::<Website>().unwrap(), Website::Modrinth);
        assert!("planetminecraft".parse::<Website>().is_err());
    }

    #[test]
    fn test_candidate_url() {
        let candidate = Candidate::new(Website::Modrinth, "P7dR8mSH", "Fabric API", 0)
            .with_slug("fabric-api");
        assert_eq!(candidate.url(), "https://modrinth.com/mod/fabric-api");
    }

    #[test]
    fn test_loader_serializes_lowercase() {
        let json = serde_json::to_string(&ModLoader::NeoForge).unwrap();
        assert_eq!(json, "\"neoforge\"");
    }
}
