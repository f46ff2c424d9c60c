use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use dawan_core::{ArticleStore, EmailDispatcher};
use dawan_digest::{
    fetch_top_digest_articles, Config, DigestJob, HttpDispatcher, LogDispatcher,
    UnsubscribeTokenService,
};
use dawan_storage::{CmsConfig, CmsStore, MemoryStore};
use dawan_web::{create_app, AppState};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dawan", author, version, about = "Dawan TV newsletter digest tools", long_about = None)]
struct Cli {
    #[arg(long, value_enum, default_value_t = StorageArg::Cms)]
    storage: StorageArg,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StorageArg {
    Memory,
    Cms,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select today's digest articles and print them
    Preview,
    /// Run the full digest job against a recipient list
    Send {
        /// Recipient email, repeatable
        #[arg(long = "to", required = true)]
        recipients: Vec<String>,
        /// Render and log instead of delivering
        #[arg(long)]
        dry_run: bool,
    },
    /// Serve the newsletter API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn create_store(storage: StorageArg) -> Arc<dyn ArticleStore> {
    match storage {
        StorageArg::Memory => Arc::new(MemoryStore::new()),
        StorageArg::Cms => Arc::new(CmsStore::new(CmsConfig::from_env())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = Config::load()?;
    let store = create_store(cli.storage);
    info!("💾 article store ready (using {:?})", cli.storage);

    match cli.command {
        Commands::Preview => {
            let snapshots =
                fetch_top_digest_articles(store.as_ref(), &config.site_url, Utc::now()).await?;
            if snapshots.is_empty() {
                println!("No published articles to feature today.");
            }
            for (i, snapshot) in snapshots.iter().enumerate() {
                println!("{}. {} ({} views)", i + 1, snapshot.title, snapshot.views);
                println!("   {}", snapshot.url);
                println!("   {}", snapshot.summary);
            }
        }
        Commands::Send {
            recipients,
            dry_run,
        } => {
            let dispatcher: Arc<dyn EmailDispatcher> = if dry_run {
                Arc::new(LogDispatcher)
            } else {
                Arc::new(HttpDispatcher::from_config(&config)?)
            };
            let tokens = UnsubscribeTokenService::new(
                config.unsubscribe_secret.clone(),
                config.site_url.clone(),
            )?;
            let job = DigestJob::new(store, dispatcher, tokens, config.site_url.clone());
            let report = job.run(&recipients).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Serve { port } => {
            let dispatcher: Arc<dyn EmailDispatcher> =
                Arc::new(HttpDispatcher::from_config(&config)?);
            let tokens = UnsubscribeTokenService::new(
                config.unsubscribe_secret.clone(),
                config.site_url.clone(),
            )?;
            let job = DigestJob::new(store, dispatcher, tokens, config.site_url.clone());
            let state = AppState {
                job,
                tokens: UnsubscribeTokenService::new(
                    config.unsubscribe_secret.clone(),
                    config.site_url.clone(),
                )?,
                trigger_secret: config.trigger_secret.clone(),
            };
            let app = create_app(state);
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
            info!("🌐 newsletter API listening on port {}", port);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
