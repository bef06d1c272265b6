//! cinesphere server binary

use cinesphere::api::{AppState, start_api_server};
use cinesphere::{Config, Library};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cinesphere")]
#[command(about = "Browse and stream a OneDrive media library")]
#[command(version)]
struct Cli {
    /// Address to listen on (overrides PORT)
    #[arg(long, env = "BIND_ADDRESS")]
    bind: Option<SocketAddr>,

    /// Serve Swagger UI at /api/swagger-ui
    #[arg(long)]
    swagger_ui: bool,

    /// Validate configuration and exit
    #[arg(long)]
    config_check: bool,
}

#[tokio::main]
async fn main() -> cinesphere::Result<()> {
    // A missing .env is fine; the environment may already be set
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinesphere=info,tower_http=info")),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(bind) = cli.bind {
        config.api.bind_address = bind;
    }
    if cli.swagger_ui {
        config.api.swagger_ui = true;
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e);
    }

    if cli.config_check {
        tracing::info!(
            user = %config.graph.user,
            root = %config.graph.root_folder,
            bind = %config.api.bind_address,
            "Configuration OK"
        );
        return Ok(());
    }

    let library = Library::from_config(&config)?;
    let state = AppState::new(Arc::new(library), Arc::new(config));

    start_api_server(state, cinesphere::wait_for_signal()).await
}
