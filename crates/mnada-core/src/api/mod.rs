//! REST API client module for the Mnada services.
//!
//! This module provides the `ApiClient` for talking to the authentication
//! service (`/auth/login`, `/users`) and the auction catalog (`/auctions`,
//! `/items`). The two services are also exposed as the `AuthService` and
//! `CatalogService` traits so session flows can run against any backend.
//!
//! Requests are single round trips: no retry, no backoff, no cancellation.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::{
    Auction, AuctionItem, ItemSubmission, LoginResponse, RegistrationRequest, ReviewDecision,
};

pub use client::ApiClient;
pub use error::{ApiError, REJECTED_FALLBACK, TRANSPORT_FALLBACK};

/// Remote endpoint that issues credentials and registers accounts.
#[async_trait]
pub trait AuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;
    async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError>;
}

/// Remote endpoint that lists auctions and accepts item submissions.
#[async_trait]
pub trait CatalogService {
    async fn list_auctions(&self) -> Result<Vec<Auction>, ApiError>;
    async fn submit_item(&self, submission: &ItemSubmission) -> Result<AuctionItem, ApiError>;
    async fn pending_items(&self) -> Result<Vec<AuctionItem>, ApiError>;
    async fn review_item(
        &self,
        item_id: i64,
        decision: ReviewDecision,
    ) -> Result<AuctionItem, ApiError>;
}
