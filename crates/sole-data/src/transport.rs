//! HTTP request/response types and the transport seam.

use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::FetchError;

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/`, e.g. `/api/products`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self.header("Content-Type", "application/json"))
    }

    /// Value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a header, matched case-insensitively.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(FetchError::from)
    }

    /// Body as lossy UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    ///
    /// The error message is the body's `message` field when present.
    pub fn error_for_status(self, path: &str) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = serde_json::from_slice::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                self.status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(FetchError::Http {
            status: self.status.as_u16(),
            path: path.to_string(),
            message,
        })
    }
}

/// Sends requests to the API.
///
/// Implementations report transport failures as errors and every HTTP answer,
/// including non-2xx ones, as a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Client for `base_url` (e.g. `http://localhost:8000`) with a total
    /// request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = self.http.request(request.method, &url).query(&request.query);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| map_reqwest_error(&url, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(&url, e))?;

        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "received response");
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

fn map_reqwest_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else if e.is_connect() {
        FetchError::Connection(e.to_string())
    } else {
        FetchError::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::get("/api/products")
            .query("page", 2)
            .query("search", "nike")
            .bearer_auth("tok")
            .accept("application/json");

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.query_value("page"), Some("2"));
        assert_eq!(req.query_value("size"), None);
        assert_eq!(req.header_value("authorization"), Some("Bearer tok"));
        assert_eq!(req.header_value("Accept"), Some("application/json"));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let req = ApiRequest::post("/api/transactions")
            .json(&serde_json::json!({ "a": 1 }))
            .unwrap();
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[test]
    fn test_error_for_status_prefers_body_message() {
        let resp = ApiResponse::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"success":false,"message":"Unit sold out"}"#,
        );
        assert_eq!(
            resp.error_for_status("/api/transactions"),
            Err(FetchError::Http {
                status: 422,
                path: "/api/transactions".into(),
                message: "Unit sold out".into(),
            })
        );

        let bare = ApiResponse::new(StatusCode::BAD_GATEWAY, "<html>");
        match bare.error_for_status("/x") {
            Err(FetchError::Http { message, .. }) => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reqwest_transport_trims_base_url() {
        let transport =
            ReqwestTransport::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000");
    }
}
