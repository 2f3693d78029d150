//! FocusLens - browsing activity classifier
//!
//! A local HTTP service for a browser extension. It groups visited pages
//! by title, asks a language model whether each title is productive,
//! stores the results in SQLite and reports session and daily totals.
//!
//! Exit codes:
//!   0 - Clean shutdown
//!   1 - Startup or runtime error (config, database, bind failure, etc.)

mod analysis;
mod classifier;
mod cli;
mod config;
mod models;
mod pipeline;
mod report;
mod server;
mod store;

use anyhow::{Context, Result};
use classifier::ClassifierGateway;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use pipeline::Pipeline;
use store::HistoryStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("FocusLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_server(args).await {
        error!("Server failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default config file.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to choose the model backend, port and database path.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Wire the store, classifier and pipeline together and serve until shutdown.
async fn run_server(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let store = HistoryStore::open(&config.storage.database)?;
    info!("Database: {}", config.storage.database.display());

    let model = classifier::build_model(&config.model)?;
    let gateway = ClassifierGateway::new(model);
    info!("Classifier: {}", gateway.describe());

    // Missing credentials fail each /classify call, not startup.
    if let Err(e) = gateway.ensure_configured() {
        warn!("Classifier is not configured: {}", e);
    }

    let pipeline = Pipeline::new(gateway, store.clone(), config.server.history_limit);

    println!(
        "🚀 FocusLens listening on http://{}:{}",
        config.server.host, config.server.port
    );

    let served = server::serve(&config.server.host, config.server.port, pipeline).await;

    info!("Closing database");
    store.close().await?;

    served
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
