//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use common::session::Session;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    error::ApiError,
    middleware::session_middleware,
    models::{ListQuery, ServicesListing},
    proxy,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/services", get(list_services))
        .route("/api/services/create/:resource", post(proxy::create))
        .route("/api/services/save/:resource/:id", put(proxy::save))
        .route("/api/services/destroy/:resource/:id", delete(proxy::destroy))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// One page of the services grid for the signed-in user
pub async fn list_services(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .catalog
        .find_all(Some(&session), query.page(), query.size())
        .await?;

    Ok(Json(ServicesListing::from(page)))
}
