//! Session gate for dashboard routes

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    extract::cookie::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use common::session::SESSION_COOKIE;
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Resolve the session from the bearer header or the session cookie
///
/// The decoded [`common::session::Session`] is inserted into the request
/// extensions. Requests without a valid, token-carrying session stop here
/// with 401.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = bearer
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .or_else(|| jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()))
        .ok_or(ApiError::Unauthorized)?;

    let session = state.session_codec.decode(&credential).map_err(|e| {
        warn!("Rejected session on {}: {}", req.uri().path(), e);
        ApiError::Unauthorized
    })?;

    if session.bearer().is_none() {
        warn!("Session for {} carries no upstream token", session.user_id);
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
