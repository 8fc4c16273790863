use std::path::PathBuf;

use anyhow::Result;
use awards_api::config::Config;
use awards_api::server::Server;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "awards-api", version, about = "Golden Raspberry producer-interval API")]
struct Cli {
    /// Port to bind, overriding BIND_ADDR
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the movies CSV, overriding DATA_PATH
    #[arg(short, long)]
    data_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config =
        Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Some(port) = cli.port {
        config.bind_addr.set_port(port);
    }
    if let Some(data_path) = cli.data_path {
        config.data_path = data_path;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("awards_api={},tower_http=debug", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting awards-api service");
    tracing::info!(
        "Configuration: bind_addr={}, data_path={}",
        config.bind_addr,
        config.data_path.display()
    );

    let server =
        Server::new(config).map_err(|e| anyhow::anyhow!("Failed to create server: {}", e))?;

    server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
