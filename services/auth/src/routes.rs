//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    extract::cookie::{Cookie, CookieJar, SameSite},
    headers::{Authorization, authorization::Bearer},
};
use chrono::{DateTime, Utc};
use common::{
    error::{ClientError, SessionError},
    models::LoginRequest,
    session::{SESSION_COOKIE, Session},
    validation::validate_login,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::AppState;

/// Public view of the logged-in user
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Session> for SessionUser {
    fn from(session: &Session) -> Self {
        SessionUser {
            id: session.user_id.clone(),
            name: session.display_name.clone(),
            email: session.email.clone(),
        }
    }
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginSuccess {
    pub user: SessionUser,
    /// Signed session, for clients that send it as a bearer token instead of the cookie
    pub session_token: String,
    pub expires_in: i64,
}

/// Response for the current session
#[derive(Serialize)]
pub struct SessionInfo {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/session", get(current_session))
        .route("/auth/logout", post(logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginSuccess>), AuthError> {
    validate_login(&payload).map_err(AuthError::BadRequest)?;

    let response = state.auth_service.login(&payload).await?;

    let session = Session {
        user_id: payload.user_name.clone(),
        bearer_token: response.token,
        display_name: payload.user_name.clone(),
        email: payload.user_name,
    };

    let issued = state.session_codec.issue(&session).map_err(|e| match e {
        SessionError::MissingToken => {
            warn!("Upstream login for {} returned an empty token", session.user_id);
            AuthError::Unauthorized
        }
        other => {
            error!("Failed to sign session: {}", other);
            AuthError::InternalServerError
        }
    })?;

    let cookie = Cookie::build((SESSION_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax);

    info!("Session issued for user: {}", session.user_id);

    let body = LoginSuccess {
        user: SessionUser::from(&session),
        session_token: issued.token,
        expires_in: state.session_codec.ttl_secs(),
    };

    Ok((jar.add(cookie), Json(body)))
}

/// Current session endpoint
pub async fn current_session(
    State(state): State<AppState>,
    jar: CookieJar,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<SessionInfo>, AuthError> {
    let credential = bearer
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .or_else(|| jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()))
        .ok_or(AuthError::Unauthorized)?;

    let claims = state.session_codec.verify(&credential).map_err(|e| {
        warn!("Rejected session: {}", e);
        AuthError::Unauthorized
    })?;

    let expires_at = claims.expires_at().ok_or(AuthError::Unauthorized)?;
    let session = claims.into_session();

    Ok(Json(SessionInfo {
        user: SessionUser::from(&session),
        expires_at,
    }))
}

/// Logout endpoint
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    info!("Logout request");
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// Custom error type for authentication errors
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    BadRequest(String),
    Upstream {
        status: StatusCode,
        content_type: Option<String>,
        body: Vec<u8>,
    },
    InternalServerError,
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Upstream {
                status,
                content_type,
                raw,
                ..
            } => AuthError::Upstream {
                status,
                content_type,
                body: raw,
            },
            ClientError::Validation(msg) => AuthError::BadRequest(msg),
            ClientError::Unauthorized => AuthError::Unauthorized,
            other => {
                error!("Upstream call failed: {}", other);
                AuthError::InternalServerError
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::Upstream {
                status,
                content_type,
                body,
            } => {
                let mut response = (status, body).into_response();
                match content_type.and_then(|value| HeaderValue::from_str(&value).ok()) {
                    Some(value) => response.headers_mut().insert(CONTENT_TYPE, value),
                    None => response.headers_mut().remove(CONTENT_TYPE),
                };
                return response;
            }
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
