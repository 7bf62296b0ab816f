//! studium server entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use studium::{
    config::Config,
    embed::create_embedder,
    error::Result,
    library::{reindex_uploads, Library},
    server::{serve, AppState},
    store::VectorStore,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "studium")]
#[command(version, about = "Course-document study-aid service backed by local RAG", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Override the configured bind address
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Init { force } => handle_init(cli.config, force),

        Commands::Serve { addr } => {
            let mut config = load_config(cli.config)?;
            if let Some(addr) = addr {
                config.bind_addr = addr;
            }

            run_server(config).await
        }
    }
}

fn handle_init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let base_dir = config_path
        .as_deref()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_base_dir);

    let mut config = Config::default();
    let config_file = base_dir.join("config.toml");

    if config_file.exists() && !force {
        eprintln!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            config_file.display()
        );
        std::process::exit(1);
    }

    config.paths.base_dir = base_dir.clone();
    config.paths.config_file = config_file.clone();
    config.paths.upload_dir = base_dir.join("uploads");
    config.save()?;

    println!("✓ studium initialized successfully");
    println!("  Config: {}", config_file.display());
    println!("\nNext steps:");
    println!("  1. Start Qdrant: docker run -p 6334:6334 qdrant/qdrant");
    println!("  2. Export your API key: export ANTHROPIC_API_KEY=...");
    println!("  3. Start the server: studium serve");

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(p) => Config::load(&p),
        None => Config::load_from(None),
    }
}

async fn run_server(config: Config) -> Result<()> {
    config.validate()?;

    let store = VectorStore::connect(&config).await?;
    store.ensure_collection().await?;

    let embedder = create_embedder(&config.embedding)?;

    // The library is process-lifetime only; rebuild it (and the index)
    // from the files already on disk
    let mut library = Library::new();
    let restored = reindex_uploads(&config, &mut library, &store, embedder.as_ref()).await?;
    if restored > 0 {
        info!("Restored {} documents from the upload directory", restored);
    }

    if config.api_key().is_none() {
        info!(
            "No {} set; configure a key via POST /set_api_key before querying",
            config.generation.api_key_env
        );
    }

    let state = Arc::new(AppState::new(config, library, store, embedder));
    serve(state).await
}
