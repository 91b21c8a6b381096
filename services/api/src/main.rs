use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod middleware;
mod models;
mod proxy;
mod routes;
mod state;

use common::config::Settings;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

    let settings = Settings::from_env()?;
    let app_state = AppState::from_settings(&settings)?;

    info!(
        "Upstream salon API: {}, dashboard: {}",
        settings.upstream_url, settings.dashboard_url
    );

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&settings.api_bind).await?;
    info!("API service listening on {}", settings.api_bind);

    axum::serve(listener, app).await?;

    Ok(())
}
