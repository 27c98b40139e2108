mod browse;
mod cache;
mod post;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lokal_client::BoardClient;
use lokal_location::{
    CacheStore, DirectoryCache, DirectorySource, FileStore, LastLocationStore, LocationResolver,
};

#[derive(Debug, Parser)]
#[command(name = "lokal")]
#[command(about = "Browse and post on the provincial classifieds board")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve location slugs against the directory
    Resolve {
        /// Province slug (e.g. davao-del-norte)
        province: String,
        /// Municipality slug, or `all`
        municipality: Option<String>,
        /// Barangay slug; requires a municipality
        #[arg(long, requires = "municipality")]
        barangay: Option<String>,
    },
    /// List listings for a location
    Listings {
        province: String,
        municipality: Option<String>,
        #[command(flatten)]
        filters: browse::ListingArgs,
    },
    /// List announcements for a location
    Announcements {
        province: String,
        municipality: Option<String>,
        #[command(flatten)]
        filters: browse::AnnouncementArgs,
    },
    /// Create a listing
    Post(post::PostArgs),
    /// Manage the local directory cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommands {
    /// Drop cached directory entries
    Clear {
        /// Also forget the last used location
        #[arg(long)]
        all: bool,
    },
}

/// Shared handles for every command.
pub(crate) struct Context {
    pub(crate) client: Arc<BoardClient>,
    pub(crate) resolver: LocationResolver,
    pub(crate) last_location: LastLocationStore,
}

impl Context {
    fn build(config: &lokal_core::AppConfig) -> anyhow::Result<Self> {
        let client = Arc::new(BoardClient::from_config(config)?);
        Ok(Self::with_store(
            client,
            Arc::new(FileStore::new(config.cache_dir.clone())),
        ))
    }

    pub(crate) fn with_store(client: Arc<BoardClient>, store: Arc<dyn CacheStore>) -> Self {
        let source = Arc::clone(&client) as Arc<dyn DirectorySource>;
        let resolver = LocationResolver::new(source, DirectoryCache::new(Arc::clone(&store)));
        Self {
            client,
            resolver,
            last_location: LastLocationStore::new(store),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = lokal_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context::build(&config)?;
    tracing::debug!(env = %config.env, cache_dir = %config.cache_dir.display(), "lokal starting");

    match cli.command {
        Commands::Resolve {
            province,
            municipality,
            barangay,
        } => browse::run_resolve(&ctx, &province, municipality.as_deref(), barangay.as_deref()).await,
        Commands::Listings {
            province,
            municipality,
            filters,
        } => browse::run_listings(&ctx, &province, municipality.as_deref(), &filters).await,
        Commands::Announcements {
            province,
            municipality,
            filters,
        } => browse::run_announcements(&ctx, &province, municipality.as_deref(), &filters).await,
        Commands::Post(args) => post::run_post(&ctx, args).await,
        Commands::Cache {
            command: CacheCommands::Clear { all },
        } => cache::run_cache_clear(&ctx, all).await,
    }
}

#[cfg(test)]
mod tests;
