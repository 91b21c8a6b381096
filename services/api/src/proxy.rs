//! Proxy routes for catalog writes
//!
//! Each handler runs behind the session gate, then forwards the inbound
//! payload to `{upstream}/{resource}[/{id}]` with the session's bearer token.
//! Upstream answers are relayed as-is: 204 stays 204, errors keep their
//! status and bytes. Only transport failures are rewritten, to a generic 500.

use axum::{
    Extension,
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use common::{http::UpstreamReply, session::Session, validation::validate_resource};
use serde_json::Value;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult, raw_response},
    state::AppState,
};

/// `POST /api/services/create/:resource`
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(resource): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    validate_resource(&resource).map_err(ApiError::BadRequest)?;
    let payload = parse_payload(&body)?;

    forward(&state, &session, Method::POST, resource, Some(payload)).await
}

/// `PUT /api/services/save/:resource/:id`
pub async fn save(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((resource, id)): Path<(String, i64)>,
    body: Bytes,
) -> ApiResult<Response> {
    validate_resource(&resource).map_err(ApiError::BadRequest)?;
    let payload = parse_payload(&body)?;

    forward(&state, &session, Method::PUT, format!("{}/{}", resource, id), Some(payload)).await
}

/// `DELETE /api/services/destroy/:resource/:id`
pub async fn destroy(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((resource, id)): Path<(String, i64)>,
) -> ApiResult<Response> {
    validate_resource(&resource).map_err(ApiError::BadRequest)?;

    forward(&state, &session, Method::DELETE, format!("{}/{}", resource, id), None).await
}

fn parse_payload(body: &[u8]) -> ApiResult<Value> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

async fn forward(
    state: &AppState,
    session: &Session,
    method: Method,
    path: String,
    payload: Option<Value>,
) -> ApiResult<Response> {
    let token = session.bearer().ok_or(ApiError::Unauthorized)?;

    let request_id = Uuid::new_v4();
    let span = info_span!("proxy", %request_id, %method, path = %path, user = %session.user_id);

    async move {
        let reply = state
            .upstream
            .forward(method, &path, payload.as_ref(), Some(token))
            .await
            .map_err(|e| {
                error!("Forwarding failed: {}", e);
                ApiError::InternalServerError
            })?;

        relay(reply)
    }
    .instrument(span)
    .await
}

fn relay(reply: UpstreamReply) -> ApiResult<Response> {
    let UpstreamReply {
        status,
        content_type,
        body,
    } = reply;

    if status == StatusCode::NO_CONTENT {
        info!("Upstream answered 204");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    if !status.is_success() {
        warn!("Upstream answered {}", status);
        return Err(ApiError::Relay {
            status,
            content_type,
            body,
        });
    }

    info!("Upstream answered {}", status);
    Ok(raw_response(status, content_type, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use axum::{body::Body, http::Request};
    use common::{http::HttpClient, session::SessionCodec};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{any, body_json, header, method, path},
    };

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn test_state(upstream: &MockServer) -> AppState {
        AppState::new(
            HttpClient::new(upstream.uri()),
            "http://localhost:3001",
            SessionCodec::new(SECRET, 3600),
        )
    }

    fn session_token(state: &AppState) -> String {
        let session = Session {
            user_id: "ana@salon.test".to_string(),
            bearer_token: "upstream-token".to_string(),
            display_name: "ana@salon.test".to_string(),
            email: "ana@salon.test".to_string(),
        };
        state.session_codec.issue(&session).unwrap().token
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("cookie", format!("salon_session={}", token));
        }
        builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn forbid_upstream_calls(upstream: &MockServer) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(upstream)
            .await;
    }

    #[tokio::test]
    async fn test_writes_without_session_are_unauthorized() {
        let upstream = MockServer::start().await;
        forbid_upstream_calls(&upstream).await;
        let router = create_router(test_state(&upstream));

        let payload = r#"{"name":"Trim","description":"Hot towel and razor","price":10}"#;
        for request in [
            request("POST", "/api/services/create/services", None, Some(payload)),
            request("PUT", "/api/services/save/services/1", None, Some(payload)),
            request("DELETE", "/api/services/destroy/services/1", None, None),
            request("DELETE", "/api/services/destroy/services/1", Some("forged"), None),
        ] {
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(body_bytes(response).await, br#"{"error":"Unauthorized"}"#.to_vec());
        }
    }

    #[tokio::test]
    async fn test_create_forwards_with_session_token() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services"))
            .and(header("authorization", "Bearer upstream-token"))
            .and(body_json(json!({"name": "Trim", "description": "Hot towel and razor", "price": 10})))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                json!({"id": 4, "name": "Trim", "description": "Hot towel and razor", "price": 10.0}),
            ))
            .expect(1)
            .mount(&upstream)
            .await;

        let state = test_state(&upstream);
        let token = session_token(&state);
        let response = create_router(state)
            .oneshot(request(
                "POST",
                "/api/services/create/services",
                Some(&token),
                Some(r#"{"name":"Trim","description":"Hot towel and razor","price":10}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["id"], 4);
    }

    #[tokio::test]
    async fn test_session_accepted_as_bearer() {
        let upstream = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/services/4"))
            .and(header("authorization", "Bearer upstream-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"id": 4, "name": "Trim", "description": "Hot towel and razor", "price": 11.0}),
            ))
            .expect(1)
            .mount(&upstream)
            .await;

        let state = test_state(&upstream);
        let token = session_token(&state);
        let request = Request::builder()
            .method("PUT")
            .uri("/api/services/save/services/4")
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Trim","description":"Hot towel and razor","price":11}"#))
            .unwrap();

        let response = create_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_destroy_no_content_passes_through() {
        let upstream = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/services/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&upstream)
            .await;

        let state = test_state(&upstream);
        let token = session_token(&state);
        let response = create_router(state)
            .oneshot(request("DELETE", "/api/services/destroy/services/3", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_destroy_missing_id_relays_upstream_error_unchanged() {
        let upstream = MockServer::start().await;
        let error_body = r#"{"timestamp":"2024-11-20T10:00:00","status":404,"message":"Service with id 999 not found"}"#;
        Mock::given(method("DELETE"))
            .and(path("/services/999"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("content-type", "application/json")
                    .set_body_string(error_body),
            )
            .mount(&upstream)
            .await;

        let state = test_state(&upstream);
        let token = session_token(&state);
        let response = create_router(state)
            .oneshot(request("DELETE", "/api/services/destroy/services/999", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(body_bytes(response).await, error_body.as_bytes().to_vec());
    }

    #[tokio::test]
    async fn test_non_json_upstream_error_is_relayed_verbatim() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("maintenance"),
            )
            .mount(&upstream)
            .await;

        let state = test_state(&upstream);
        let token = session_token(&state);
        let response = create_router(state)
            .oneshot(request(
                "POST",
                "/api/services/create/services",
                Some(&token),
                Some(r#"{"name":"Trim"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get("content-type").unwrap(), "text/plain");
        assert_eq!(body_bytes(response).await, b"maintenance".to_vec());
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthorized() {
        let upstream = MockServer::start().await;
        forbid_upstream_calls(&upstream).await;

        let state = test_state(&upstream);
        let session = Session {
            user_id: "ana@salon.test".to_string(),
            bearer_token: "upstream-token".to_string(),
            display_name: "ana@salon.test".to_string(),
            email: "ana@salon.test".to_string(),
        };
        let issued_at = chrono::Utc::now() - chrono::Duration::hours(2);
        let token = state.session_codec.issue_at(&session, issued_at).unwrap().token;

        let response = create_router(state)
            .oneshot(request("DELETE", "/api/services/destroy/services/3", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_internal_error() {
        let state = AppState::new(
            HttpClient::new("http://127.0.0.1:1"),
            "http://localhost:3001",
            SessionCodec::new(SECRET, 3600),
        );
        let token = session_token(&state);

        let response = create_router(state)
            .oneshot(request("DELETE", "/api/services/destroy/services/3", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_bytes(response).await,
            br#"{"error":"Internal server error"}"#.to_vec()
        );
    }

    #[tokio::test]
    async fn test_bad_resource_and_body_are_rejected_without_forwarding() {
        let upstream = MockServer::start().await;
        forbid_upstream_calls(&upstream).await;

        let state = test_state(&upstream);
        let token = session_token(&state);
        let router = create_router(state);

        let response = router
            .clone()
            .oneshot(request("POST", "/api/services/create/..", Some(&token), Some("{}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .clone()
            .oneshot(request("POST", "/api/services/create/services", Some(&token), Some("not json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(request("DELETE", "/api/services/destroy/services/abc", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
