//! Generic JSON client for one upstream base URL
//!
//! Every request carries `Content-Type: application/json` and, when the
//! caller passes a non-empty token, `Authorization: Bearer <token>`. GET
//! requests ask intermediaries not to serve cached copies. Non-2xx answers
//! become [`ClientError::Upstream`] with the error body left untouched.

use std::time::Duration;

use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::Settings,
    error::{ClientError, ClientResult},
};

/// Raw upstream answer, relayed by the proxy routes without interpretation
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Stateless HTTP client bound to a base URL
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client with default transport settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Create the upstream client described by the settings
    pub fn from_settings(settings: &Settings) -> ClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;

        Ok(Self::with_client(client, settings.upstream_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reuse the connection pool for another base URL
    pub fn rebase(&self, base_url: impl Into<String>) -> Self {
        Self::with_client(self.client.clone(), base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");

        if method == Method::GET {
            builder = builder
                .header(CACHE_CONTROL, "no-store")
                .header(PRAGMA, "no-cache");
        }

        if let Some(token) = token.filter(|token| !token.is_empty()) {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    /// Send a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        let response = self.request(Method::GET, path, token).send().await?;
        Self::handle_response(response).await
    }

    /// Send a POST request with a JSON body
    pub async fn post<T, B>(&self, path: &str, body: &B, token: Option<&str>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .request(Method::POST, path, token)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Send a PUT request with a JSON body
    pub async fn put<T, B>(&self, path: &str, body: &B, token: Option<&str>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .request(Method::PUT, path, token)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Send a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        let response = self.request(Method::DELETE, path, token).send().await?;
        Self::handle_response(response).await
    }

    /// Send a request and hand back the raw answer, whatever its status
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> ClientResult<UpstreamReply> {
        let mut builder = self.request(method, path, token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let content_type = content_type(&response);
        let body = response.bytes().await?.to_vec();

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let content_type = content_type(&response);
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::Upstream {
                status,
                body: parse_error_body(&bytes),
                content_type,
                raw: bytes.to_vec(),
            });
        }

        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Error bodies are JSON by contract; anything else is kept as text
fn parse_error_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new("http://upstream.test/api/v1/");
        assert_eq!(client.base_url(), "http://upstream.test/api/v1");
        assert_eq!(client.url("services"), "http://upstream.test/api/v1/services");
        assert_eq!(client.url("/services/4"), "http://upstream.test/api/v1/services/4");
    }

    #[test]
    fn test_rebase_keeps_pool_changes_base() {
        let client = HttpClient::new("http://upstream.test/api/v1");
        let dashboard = client.rebase("http://localhost:3001");
        assert_eq!(dashboard.url("api/services"), "http://localhost:3001/api/services");
    }

    #[test]
    fn test_parse_error_body() {
        assert_eq!(parse_error_body(br#"{"error":"nope"}"#), json!({"error": "nope"}));
        assert_eq!(parse_error_body(b"Bad Gateway"), json!("Bad Gateway"));
        assert_eq!(parse_error_body(b""), Value::Null);
    }
}
