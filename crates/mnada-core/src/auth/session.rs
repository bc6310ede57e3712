use thiserror::Error;
use tracing::{debug, info, warn};

use super::credentials::CredentialStore;
use super::token::{decode_role, TokenError};
use super::Role;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("already signed in as {0}")]
    AlreadyAuthenticated(Role),
    #[error("credential carries no account role")]
    NotAnAccountRole,
    #[error("credential could not be decoded: {0}")]
    Undecodable(#[from] TokenError),
    #[error("failed to persist credential: {0}")]
    Store(anyhow::Error),
}

/// The current role paired with the credential that proves it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub role: Role,
    pub credential: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.role.is_authenticated()
    }
}

/// Owns the session and keeps it consistent with the credential store.
///
/// The gate is the only way the role changes: `initialize` derives it from the
/// stored credential, `login` moves an anonymous session to an account role and
/// `logout` moves any session back to anonymous.
pub struct SessionGate<S: CredentialStore> {
    store: S,
    session: Session,
}

impl<S: CredentialStore> SessionGate<S> {
    /// Derive the session from whatever credential the store holds.
    ///
    /// An undecodable credential is removed and the session starts anonymous.
    pub fn initialize(store: S) -> Self {
        let mut gate = Self {
            store,
            session: Session::anonymous(),
        };

        let stored = match gate.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential, starting anonymous");
                None
            }
        };

        let Some(credential) = stored else {
            debug!("No stored credential");
            return gate;
        };

        match decode_role(&credential) {
            Ok(role) => {
                debug!(%role, "Session restored from stored credential");
                gate.session = Session {
                    role,
                    credential: Some(credential),
                };
            }
            Err(e) => {
                warn!(error = %e, "Discarding undecodable credential");
                gate.discard_stored();
            }
        }

        gate
    }

    /// Store a credential issued by the authentication service and adopt the
    /// role it reported alongside it.
    pub fn login(&mut self, credential: &str, role: Role) -> Result<Role, SessionError> {
        if self.session.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated(self.session.role));
        }
        if !role.is_authenticated() {
            return Err(SessionError::NotAnAccountRole);
        }

        self.store.save(credential).map_err(SessionError::Store)?;
        self.session = Session {
            role,
            credential: Some(credential.to_string()),
        };
        info!(%role, "Signed in");
        Ok(role)
    }

    /// Store a credential whose role is taken from its own payload.
    pub fn login_decoded(&mut self, credential: &str) -> Result<Role, SessionError> {
        let role = decode_role(credential)?;
        self.login(credential, role)
    }

    /// Drop the credential and return to anonymous. Never fails.
    pub fn logout(&mut self) {
        self.discard_stored();
        if self.session.is_authenticated() {
            info!(role = %self.session.role, "Signed out");
        }
        self.session = Session::anonymous();
    }

    pub fn current_role(&self) -> Role {
        self.session.role
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Bearer credential for authenticated requests.
    pub fn credential(&self) -> Option<&str> {
        self.session.credential.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn discard_stored(&self) {
        if let Err(e) = self.store.remove() {
            warn!(error = %e, "Failed to remove stored credential");
        }
    }
}
