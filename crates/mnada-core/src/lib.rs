//! Core library for the Mnada auction client.
//!
//! This crate holds everything that is not terminal rendering:
//!
//! - `auth`: credential stores, token decoding and the `SessionGate`
//! - `routes`: the navigable views and the role-based access policy
//! - `api`: the HTTP client for the authentication and catalog services
//! - `models`: request/response bodies and auction entities
//! - `forms`: input validation for login, registration and item submission
//! - `timer`: countdown/clock helpers for the one-second dashboard timers
//! - `config`: persisted application configuration
//! - `utils`: price, date and string formatting for display

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod routes;
pub mod timer;
pub mod utils;

pub use auth::{Role, Session, SessionGate};
pub use routes::{Navigation, Route};
