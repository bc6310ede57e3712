//! Data models for the Mnada services.
//!
//! This module contains the request/response bodies exchanged with the
//! authentication service and the auction catalog:
//!
//! - `LoginRequest`, `LoginResponse`, `RegistrationRequest`, `ErrorBody`
//! - `Auction`: a listed auction with its starting price and end time
//! - `AuctionItem`, `ItemSubmission`: items submitted by auctioneers for approval
//! - `Category`, `ItemStatus`, `ReviewDecision`

pub mod auction;
pub mod user;

pub use auction::{Auction, AuctionItem, Category, ItemStatus, ItemSubmission, ReviewDecision, ReviewRequest};
pub use user::{ErrorBody, LoginRequest, LoginResponse, RegistrationRequest};
