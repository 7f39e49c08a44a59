use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use msme_core::{Config, Result};
use msme_ingest::{CsvLoader, LoadReport, NewsClient};
use msme_storage::Repository;
use msme_web::AppState;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, default_value = "memory", help = "Storage backend: memory (default) or mongo")]
    storage: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load company CSV files into the store
    Load {
        /// CSV paths. Falls back to COMPANY_CSV_PATHS when empty.
        paths: Vec<PathBuf>,
    },
    /// Fetch news for a topic and store new articles
    FetchNews {
        #[arg(default_value = "MSME business manufacturing")]
        query: String,
        #[arg(long, default_value = "in")]
        country: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let store = msme_storage::create_store(&cli.storage, &config).await?;
    store.ping().await?;
    info!("💾 Storage initialized successfully (using {})", cli.storage);

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let state = AppState::new(config, store)?;
            let app = msme_web::create_app(state).await;

            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
                .await
                .map_err(msme_core::Error::Io)?;
            info!("🏭 MSME aggregator listening on port {}", port);
            axum::serve(listener, app)
                .await
                .map_err(msme_core::Error::Io)?;
        }
        Commands::Load { paths } => {
            let repo = Repository::new(store);
            let paths = if paths.is_empty() {
                config.company_csv_paths.iter().map(PathBuf::from).collect()
            } else {
                paths
            };
            let mut report = LoadReport::default();
            for path in &paths {
                report.merge(CsvLoader::load(&repo, path).await?);
            }
            info!("📦 Loaded {} companies ({} rows skipped)", report.loaded, report.skipped);
        }
        Commands::FetchNews { query, country } => {
            let repo = Repository::new(store);
            let news = NewsClient::new(
                &config.news_base_url,
                config.news_api_key.clone(),
                config.request_timeout,
            )?;
            let (articles, stored) = news.ingest(&repo, &query, &country).await?;
            info!("📰 Fetched {} articles, {} new", articles.len(), stored);
        }
    }

    Ok(())
}
