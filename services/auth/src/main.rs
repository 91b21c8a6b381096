use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod routes;

use common::{auth::AuthService, config::Settings, http::HttpClient, session::SessionCodec};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub session_codec: SessionCodec,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let upstream = HttpClient::from_settings(settings)?;

        Ok(AppState {
            auth_service: AuthService::new(upstream),
            session_codec: SessionCodec::new(&settings.session_secret, settings.session_ttl_secs),
            cookie_secure: settings.cookie_secure,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting authentication service");

    let settings = Settings::from_env()?;
    let app_state = AppState::from_settings(&settings)?;

    info!("Upstream salon API: {}", settings.upstream_url);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&settings.auth_bind).await?;
    info!("Authentication service listening on {}", settings.auth_bind);

    axum::serve(listener, app).await?;

    Ok(())
}
