//! Services catalog façade
//!
//! Reads go straight to the upstream API with the session's bearer token.
//! Writes go through the dashboard's own proxy routes, which re-check the
//! session before forwarding, so they take the signed session credential
//! rather than the upstream token.

use serde_json::Value;
use tracing::error;

use crate::{
    error::{ClientError, ClientResult},
    http::HttpClient,
    models::{NewService, Page, ServiceRecord},
    session::Session,
    validation::validate_new_service,
};

/// Upstream resource holding the services catalog
pub const SERVICES_RESOURCE: &str = "services";

/// Typed access to the services catalog
#[derive(Debug, Clone)]
pub struct ServicesService {
    upstream: HttpClient,
    dashboard: HttpClient,
}

impl ServicesService {
    /// `upstream` points at the salon API, `dashboard` at the api service
    pub fn new(upstream: HttpClient, dashboard: HttpClient) -> Self {
        Self {
            upstream,
            dashboard,
        }
    }

    /// Fetch one page of services
    pub async fn find_all(
        &self,
        session: Option<&Session>,
        page: u32,
        size: u32,
    ) -> ClientResult<Page<ServiceRecord>> {
        let path = format!("{}?page={}&size={}", SERVICES_RESOURCE, page, size);

        self.upstream
            .get(&path, session.and_then(Session::bearer))
            .await
            .inspect_err(|e| error!("Failed to list services: {}", e))
    }

    /// Create a service through the create proxy route
    pub async fn create(&self, credential: &str, service: &NewService) -> ClientResult<ServiceRecord> {
        validate_new_service(service).map_err(ClientError::Validation)?;
        let credential = require_credential(credential)?;

        let path = format!("api/services/create/{}", SERVICES_RESOURCE);
        self.dashboard
            .post(&path, service, Some(credential))
            .await
            .inspect_err(|e| error!("Failed to create service: {}", e))
    }

    /// Replace a service through the save proxy route
    pub async fn save(
        &self,
        credential: &str,
        service: &NewService,
        id: i64,
    ) -> ClientResult<ServiceRecord> {
        validate_new_service(service).map_err(ClientError::Validation)?;
        let credential = require_credential(credential)?;

        let path = format!("api/services/save/{}/{}", SERVICES_RESOURCE, id);
        self.dashboard
            .put(&path, service, Some(credential))
            .await
            .inspect_err(|e| error!("Failed to save service {}: {}", id, e))
    }

    /// Delete a service through the destroy proxy route
    ///
    /// Returns `None` when the upstream answers without a body.
    pub async fn destroy(&self, credential: &str, id: i64) -> ClientResult<Option<Value>> {
        let credential = require_credential(credential)?;

        let path = format!("api/services/destroy/{}/{}", SERVICES_RESOURCE, id);
        self.dashboard
            .delete(&path, Some(credential))
            .await
            .inspect_err(|e| error!("Failed to delete service {}: {}", id, e))
    }
}

fn require_credential(credential: &str) -> ClientResult<&str> {
    if credential.is_empty() {
        return Err(ClientError::Unauthorized);
    }
    Ok(credential)
}
