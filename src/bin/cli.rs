use clap::{Parser, Subcommand};
use modfinder_engine::{normalize, EngineConfig, ModFinder, ModFinderError, ModLoader, Website};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modfinder-cli")]
#[command(about = "ModFinder CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one or more mods by name
    Search {
        /// Mod names
        #[arg(required = true)]
        names: Vec<String>,

        /// Minecraft version
        #[arg(short, long)]
        version: String,

        /// Mod loader (fabric, forge, neoforge, quilt)
        #[arg(short, long, default_value = "fabric")]
        loader: String,

        /// Catalog to search (modrinth, curseforge)
        #[arg(short, long, default_value = "modrinth")]
        website: String,
    },

    /// Print the canonical form of a title
    Normalize {
        title: String,
    },

    /// List release game versions known to a catalog
    Versions {
        #[arg(short, long, default_value = "modrinth")]
        website: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modfinder_engine=warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search { names, version, loader, website } => {
            let loader: ModLoader = loader.parse()?;
            let website: Website = website.parse()?;
            let finder = ModFinder::from_config(&EngineConfig::from_env()?)?;

            println!("🔍 Resolving {} mod(s) for {} {} on {}", names.len(), loader, version, website);

            let entries = match finder.find_all(website, &names, &version, loader).await {
                Ok(entries) => entries,
                Err(e @ ModFinderError::RateLimited { .. }) => {
                    println!("\n❌ {} is rate limiting requests, try again later", website);
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            };
            let mut missing = 0;

            for entry in &entries {
                match &entry.result {
                    Ok(found) => {
                        let marker = if found.is_uncertain() { "⚠️" } else { "✅" };
                        println!("\n{} {} → {}", marker, entry.name, found.title);
                        println!("   Similarity: {:.3}", found.similarity);
                        println!("   Page: {}", found.website.project_url(&found.slug));
                        match &found.file {
                            Some(file) => println!("   File: {} ({})", file.file_name, file.url),
                            None => println!("   File: none for {} {}", loader, version),
                        }
                    }
                    Err(e) => {
                        missing += 1;
                        println!("\n❌ {}: {}", entry.name, e);
                    }
                }
            }

            println!("\n📋 {} resolved, {} failed", entries.len() - missing, missing);
        }

        Commands::Normalize { title } => {
            println!("{}", normalize(&title));
        }

        Commands::Versions { website } => {
            let website: Website = website.parse()?;
            let finder = ModFinder::from_config(&EngineConfig::from_env()?)?;

            for version in finder.game_versions(website).await? {
                println!("{}", version);
            }
        }
    }

    Ok(())
}
