//! Authentication module for managing the client session.
//!
//! This module provides:
//! - `SessionGate`: owns the current `Role` and keeps it consistent with the
//!   stored credential
//! - `CredentialStore`: the single-slot persistence area for the bearer token
//! - `token`: role claim decoding for stored credentials
//! - `flow`: sign-in and registration against an `AuthService`

pub mod credentials;
pub mod flow;
pub mod role;
pub mod session;
pub mod token;

pub use credentials::{
    CredentialBackend, CredentialStore, FileCredentialStore, KeyringCredentialStore,
    MemoryCredentialStore, CREDENTIAL_KEY,
};
pub use role::Role;
pub use session::{Session, SessionError, SessionGate};
pub use token::{decode_role, TokenError};
