//! HTTP service exposing the incident engine.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use incident_engine::api::{AppState, create_router};
use incident_engine::config::SettingsLoader;
use incident_engine::master_data::MasterDataCache;

/// Incident logging and payroll export service.
#[derive(Parser, Debug)]
#[command(name = "incident-engine", version = env!("CARGO_PKG_VERSION"), long_about = None)]
struct Cli {
    /// Settings file (YAML). Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind, overriding the settings file and environment.
    #[arg(long)]
    bind: Option<String>,

    /// Master workbook path, overriding the settings file and environment.
    #[arg(long)]
    master: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut settings = SettingsLoader::load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        settings.server.bind = bind;
    }
    if let Some(master) = cli.master {
        settings.master_data.path = master;
    }

    let cache = MasterDataCache::new(
        settings.master_data.path.clone(),
        settings.master_data.layout.clone(),
    );
    if let Err(err) = cache.get() {
        error!(error = %err, "Master data could not be loaded");
        return Err(err.into());
    }

    let bind = settings.server.bind.clone();
    let state = AppState::new(settings, cache);
    let router = create_router(state);

    let listener = TcpListener::bind(&bind).await?;
    info!(bind = %bind, "Incident engine listening");
    axum::serve(listener, router).await?;

    Ok(())
}
