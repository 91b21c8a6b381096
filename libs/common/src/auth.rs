//! Client for the upstream authentication resource

use tracing::{error, info};

use crate::{
    error::ClientResult,
    http::HttpClient,
    models::{LoginRequest, LoginResponse},
};

const AUTH_RESOURCE: &str = "auth";

/// Exchanges dashboard credentials for an upstream bearer token
#[derive(Debug, Clone)]
pub struct AuthService {
    client: HttpClient,
}

impl AuthService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Post credentials to `auth/login`
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        info!("Login attempt for user: {}", request.user_name);

        self.client
            .post(&format!("{}/login", AUTH_RESOURCE), request, None)
            .await
            .inspect_err(|e| error!("Upstream login failed for {}: {}", request.user_name, e))
    }
}
