//! HTTP client for end-to-end tests
//!
//! Wraps reqwest and provides methods for the vocabulary server endpoints.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, COOKIE};
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// HTTP test client, optionally carrying a session token
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    fn with_headers(base_url: String, headers: HeaderMap) -> Self {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates an anonymous client
    pub fn new(base_url: String) -> Self {
        Self::with_headers(base_url, HeaderMap::new())
    }

    /// Creates a client sending `Authorization: Bearer <token>`
    pub fn with_token(base_url: String, token: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid token"),
        );
        Self::with_headers(base_url, headers)
    }

    /// Creates a client sending the token as the `session_token` cookie
    pub fn with_session_cookie(base_url: String, token: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("session_token={}", token)).expect("Invalid token"),
        );
        Self::with_headers(base_url, headers)
    }

    pub fn editor(base_url: String) -> Self {
        Self::with_token(base_url, EDITOR_TOKEN)
    }

    pub fn newsroom(base_url: String) -> Self {
        Self::with_token(base_url, NEWSROOM_TOKEN)
    }

    pub fn viewer(base_url: String) -> Self {
        Self::with_token(base_url, VIEWER_TOKEN)
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    /// GET /v1/vocabulary with the given query parameters
    pub async fn get_vocabulary(&self, params: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/v1/vocabulary", self.base_url))
            .query(params)
            .send()
            .await
            .expect("Vocabulary request failed")
    }

    /// GET /v1/vocabulary/{path} with the given query parameters
    pub async fn get_vocabulary_at(&self, path: &str, params: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/v1/vocabulary/{}", self.base_url, path))
            .query(params)
            .send()
            .await
            .expect("Vocabulary request failed")
    }

    /// Looks up `name` at the site root and returns the JSON body,
    /// asserting a 200 response.
    pub async fn lookup(&self, name: &str, params: &[(&str, &str)]) -> Value {
        let mut all_params = vec![("name", name)];
        all_params.extend_from_slice(params);
        let response = self.get_vocabulary(&all_params).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Lookup of {} failed",
            name
        );
        response.json().await.expect("Response is not JSON")
    }
}
