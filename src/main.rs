use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{PlaceCommand, SettingsCommand};
use config::Config;
use osimesi_core::{ApiClient, LocalStorage, RestaurantStore};

#[derive(Parser)]
#[command(name = "osimesi")]
#[command(version)]
#[command(about = "Bookmark your favorite restaurants", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage saved restaurants
    Place(PlaceCommand),

    /// Manage user settings
    Settings(SettingsCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    tracing::debug!(data_dir = %config.data_dir.display(), api_url = ?config.api_url, "loaded config");

    match cli.command {
        Some(Commands::Place(cmd)) => {
            let mut store = match &config.api_url {
                Some(api_url) => RestaurantStore::remote(ApiClient::new(api_url.clone())),
                None => RestaurantStore::local(LocalStorage::new(config.data_dir.clone())),
            };
            store.load().await?;
            cmd.run(&mut store).await?;
        }
        Some(Commands::Settings(cmd)) => {
            // Settings stay on this machine even when records sync remotely.
            let storage = LocalStorage::new(config.data_dir.clone());
            cmd.run(&storage)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
