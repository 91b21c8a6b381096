//! Application state shared across handlers

use anyhow::Result;
use common::{
    catalog::ServicesService, config::Settings, http::HttpClient, session::SessionCodec,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub upstream: HttpClient,
    pub catalog: ServicesService,
    pub session_codec: SessionCodec,
}

impl AppState {
    pub fn new(upstream: HttpClient, dashboard_url: &str, session_codec: SessionCodec) -> Self {
        let catalog = ServicesService::new(upstream.clone(), upstream.rebase(dashboard_url));

        AppState {
            upstream,
            catalog,
            session_codec,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let upstream = HttpClient::from_settings(settings)?;
        let session_codec = SessionCodec::new(&settings.session_secret, settings.session_ttl_secs);

        Ok(Self::new(upstream, &settings.dashboard_url, session_codec))
    }
}
