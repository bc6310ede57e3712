//! API client for communicating with the Mnada REST services.
//!
//! This module provides the `ApiClient` struct for making plain and
//! bearer-authenticated requests to the authentication and catalog endpoints.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{
    Auction, AuctionItem, ItemSubmission, LoginRequest, LoginResponse, RegistrationRequest,
    ReviewDecision, ReviewRequest,
};

use super::{ApiError, AuthService, CatalogService};

// ============================================================================
// Constants
// ============================================================================

/// Default service location when neither config nor environment names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the Mnada services.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Request rejected");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .authorize(request)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        debug!(path, status = %response.status(), "Response received");
        Self::check_response(response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, path).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{path}: {e}")))
    }
}

#[async_trait]
impl AuthService for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let path = "/auth/login";
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        debug!(username, "Sending login request");
        self.send_json(self.client.post(self.url(path)).json(&body), path)
            .await
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError> {
        let path = "/users";
        debug!(username = %request.username, role = %request.role, "Sending registration");
        self.send(self.client.post(self.url(path)).json(request), path)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogService for ApiClient {
    async fn list_auctions(&self) -> Result<Vec<Auction>, ApiError> {
        let path = "/auctions";
        self.send_json(self.client.get(self.url(path)), path).await
    }

    async fn submit_item(&self, submission: &ItemSubmission) -> Result<AuctionItem, ApiError> {
        let path = "/items";
        self.send_json(self.client.post(self.url(path)).json(submission), path)
            .await
    }

    async fn pending_items(&self) -> Result<Vec<AuctionItem>, ApiError> {
        let path = "/items";
        let request = self.client.get(self.url(path)).query(&[("status", "pending")]);
        self.send_json(request, path).await
    }

    async fn review_item(
        &self,
        item_id: i64,
        decision: ReviewDecision,
    ) -> Result<AuctionItem, ApiError> {
        let path = format!("/items/{item_id}/review");
        let request = self
            .client
            .post(self.url(&path))
            .json(&ReviewRequest { decision });
        self.send_json(request, &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ApiClient::new("http://example.test/").unwrap();
        assert_eq!(api.base_url(), "http://example.test");
        assert_eq!(api.url("/auth/login"), "http://example.test/auth/login");
    }

    #[test]
    fn test_with_token_shares_base_url() {
        let api = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        let authed = api.with_token(Some("a.b.c".to_string()));
        assert_eq!(authed.token(), Some("a.b.c"));
        assert_eq!(authed.base_url(), DEFAULT_BASE_URL);
        assert_eq!(api.token(), None);
    }

    #[test]
    fn test_set_and_clear_token() {
        let mut api = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        api.set_token("t.o.k".to_string());
        assert_eq!(api.token(), Some("t.o.k"));
        api.clear_token();
        assert_eq!(api.token(), None);
    }
}
