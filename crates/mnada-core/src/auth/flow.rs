//! Sign-in and registration against an `AuthService`.
//!
//! Sign-in is split in two so the network half can run off the event loop:
//! `authenticate` talks to the service, `complete_sign_in` applies the answer
//! to the `SessionGate`. `sign_in` runs both back to back.

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{ApiError, AuthService};
use crate::forms::{validate_login, RegistrationForm, ValidationError};
use crate::models::LoginResponse;

use super::credentials::CredentialStore;
use super::session::{SessionError, SessionGate};
use super::Role;

/// Shown when the login endpoint rejects without a message.
pub const LOGIN_FALLBACK: &str = "Login failed. Please try again.";

/// Shown when the registration endpoint rejects without a message.
pub const REGISTRATION_FALLBACK: &str = "Registration failed. Please try again.";

/// Shown once an account has been created.
pub const REGISTRATION_SUCCESS: &str = "Registration successful! Redirecting to login...";

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl FlowError {
    /// Inline text for the form that started the flow.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            FlowError::Invalid(e) => e.to_string(),
            FlowError::Api(e) => e.user_message(fallback),
            FlowError::Session(SessionError::AlreadyAuthenticated(role)) => {
                format!("Already signed in as {}.", role.display_name())
            }
            FlowError::Session(_) => fallback.to_string(),
        }
    }
}

/// Validate the credentials and ask the service for a token.
pub async fn authenticate<A>(
    service: &A,
    username: &str,
    password: &str,
) -> Result<LoginResponse, FlowError>
where
    A: AuthService + ?Sized,
{
    validate_login(username, password)?;
    let response = service.login(username.trim(), password).await.map_err(|e| {
        warn!(error = %e, "Login request failed");
        e
    })?;
    debug!(role = %response.role, "Login accepted");
    Ok(response)
}

/// Adopt the token and role the service issued.
pub fn complete_sign_in<S: CredentialStore>(
    gate: &mut SessionGate<S>,
    response: &LoginResponse,
) -> Result<Role, FlowError> {
    Ok(gate.login(&response.token, response.role)?)
}

pub async fn sign_in<A, S>(
    service: &A,
    gate: &mut SessionGate<S>,
    username: &str,
    password: &str,
) -> Result<Role, FlowError>
where
    A: AuthService + ?Sized,
    S: CredentialStore,
{
    if gate.session().is_authenticated() {
        return Err(SessionError::AlreadyAuthenticated(gate.current_role()).into());
    }
    let response = authenticate(service, username, password).await?;
    complete_sign_in(gate, &response)
}

/// Validate the form and create the account. The session is not touched.
pub async fn register<A>(service: &A, form: &RegistrationForm) -> Result<(), FlowError>
where
    A: AuthService + ?Sized,
{
    let request = form.validate()?;
    service.register(&request).await.map_err(|e| {
        warn!(error = %e, "Registration request failed");
        FlowError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;
    use crate::models::RegistrationRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Reply {
        Accept(Role),
        Reject(Option<&'static str>),
    }

    struct FakeAuth {
        reply: Reply,
        calls: Mutex<Vec<String>>,
    }

    impl FakeAuth {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn answer<T>(&self, ok: T) -> Result<T, ApiError> {
            match self.reply {
                Reply::Accept(_) => Ok(ok),
                Reply::Reject(message) => Err(ApiError::Rejected {
                    status: 401,
                    message: message.map(str::to_string),
                }),
            }
        }
    }

    #[async_trait]
    impl AuthService for FakeAuth {
        async fn login(&self, username: &str, _password: &str) -> Result<LoginResponse, ApiError> {
            self.calls.lock().unwrap().push(format!("login:{username}"));
            let role = match self.reply {
                Reply::Accept(role) => role,
                Reply::Reject(_) => Role::Anonymous,
            };
            self.answer(LoginResponse {
                token: "h.eyJyb2xlIjoiY2xpZW50In0=.s".to_string(),
                role,
            })
        }

        async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("register:{}:{}", request.username, request.role));
            self.answer(())
        }
    }

    fn anonymous_gate() -> SessionGate<MemoryCredentialStore> {
        SessionGate::initialize(MemoryCredentialStore::new())
    }

    #[tokio::test]
    async fn test_sign_in_stores_token_and_role() {
        let service = FakeAuth::new(Reply::Accept(Role::Auctioneer));
        let mut gate = anonymous_gate();
        let role = sign_in(&service, &mut gate, " ann ", "pw").await.unwrap();
        assert_eq!(role, Role::Auctioneer);
        assert_eq!(gate.current_role(), Role::Auctioneer);
        assert!(gate.store().load().unwrap().is_some());
        assert_eq!(service.calls(), vec!["login:ann"]);
    }

    #[tokio::test]
    async fn test_sign_in_validation_skips_service() {
        let service = FakeAuth::new(Reply::Accept(Role::Client));
        let mut gate = anonymous_gate();
        let err = sign_in(&service, &mut gate, "", "pw").await.unwrap_err();
        assert_eq!(err.user_message(LOGIN_FALLBACK), "Username and password are required.");
        assert!(service.calls().is_empty());
        assert_eq!(gate.current_role(), Role::Anonymous);
    }

    #[tokio::test]
    async fn test_sign_in_rejection_leaves_session_anonymous() {
        let service = FakeAuth::new(Reply::Reject(Some("Invalid credentials")));
        let mut gate = anonymous_gate();
        let err = sign_in(&service, &mut gate, "ann", "bad").await.unwrap_err();
        assert_eq!(err.user_message(LOGIN_FALLBACK), "Invalid credentials");
        assert_eq!(gate.current_role(), Role::Anonymous);
        assert_eq!(gate.store().load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_in_rejection_without_message() {
        let service = FakeAuth::new(Reply::Reject(None));
        let mut gate = anonymous_gate();
        let err = sign_in(&service, &mut gate, "ann", "bad").await.unwrap_err();
        assert_eq!(err.user_message(LOGIN_FALLBACK), LOGIN_FALLBACK);
    }

    #[tokio::test]
    async fn test_sign_in_when_already_authenticated() {
        let service = FakeAuth::new(Reply::Accept(Role::Admin));
        let mut gate = SessionGate::initialize(MemoryCredentialStore::with_credential(
            "h.eyJyb2xlIjoiY2xpZW50In0=.s",
        ));
        let err = sign_in(&service, &mut gate, "ann", "pw").await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Session(SessionError::AlreadyAuthenticated(Role::Client))
        ));
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_complete_sign_in_rejects_anonymous_role() {
        let mut gate = anonymous_gate();
        let response = LoginResponse {
            token: "a.b.c".to_string(),
            role: Role::Anonymous,
        };
        let err = complete_sign_in(&mut gate, &response).unwrap_err();
        assert_eq!(err.user_message(LOGIN_FALLBACK), LOGIN_FALLBACK);
        assert_eq!(gate.current_role(), Role::Anonymous);
    }

    #[tokio::test]
    async fn test_register_sends_validated_form() {
        let service = FakeAuth::new(Reply::Accept(Role::Client));
        let form = RegistrationForm {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
            role: Role::Admin,
        };
        register(&service, &form).await.unwrap();
        assert_eq!(service.calls(), vec!["register:bob:admin"]);
    }

    #[tokio::test]
    async fn test_register_invalid_form_skips_service() {
        let service = FakeAuth::new(Reply::Accept(Role::Client));
        let err = register(&service, &RegistrationForm::new()).await.unwrap_err();
        assert_eq!(err.user_message(REGISTRATION_FALLBACK), "All fields are required.");
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_register_rejection_message() {
        let service = FakeAuth::new(Reply::Reject(Some("Username already taken")));
        let form = RegistrationForm {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
            role: Role::Client,
        };
        let err = register(&service, &form).await.unwrap_err();
        assert_eq!(err.user_message(REGISTRATION_FALLBACK), "Username already taken");
    }
}
