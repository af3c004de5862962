//! Login, registration and identity checks.
//!
//! These are the only flows that write to the [`Session`]. A failed login
//! never touches the session; a 401 from `/auth/me` destroys it.

use candy_market_core::{Credentials, Email, EmailError, LoginResponse, User};
use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{self, ApiError, ApiRequest, Gateway};
use crate::error::{ErrorKind, SESSION_EXPIRED, user_message};
use crate::session::Session;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const LOGIN_FAILED: &str = "No se pudo iniciar sesión";
const REGISTER_FAILED: &str = "No se pudo registrar. ¿Ya existe el correo?";
const WHOAMI_FAILED: &str = "No se pudo verificar la sesión";

/// Auth flow errors. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Correo inválido: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("La contraseña debe tener al menos {} caracteres", MIN_PASSWORD_LENGTH)]
    WeakPassword,

    /// The server refused the registration (usually a duplicate email).
    #[error("{0}")]
    RegistrationRejected(String),

    #[error("No has iniciado sesión")]
    NotAuthenticated,

    #[error("{}", SESSION_EXPIRED)]
    SessionExpired,

    /// Network or server failure.
    #[error("{message}")]
    Unavailable {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl AuthError {
    fn unavailable(generic: &str, source: ApiError) -> Self {
        Self::Unavailable {
            message: user_message(generic, &source),
            source,
        }
    }
}

/// Log in and establish the session.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` when the server rejects the
/// credentials, `AuthError::InvalidEmail` for a malformed address and
/// `AuthError::Unavailable` for network or server failures.
#[instrument(skip(gateway, session, password))]
pub async fn login<G: Gateway>(
    gateway: &G,
    session: &mut Session,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let credentials = Credentials {
        email: Email::parse(email.trim())?,
        password: password.to_owned(),
    };

    let request = ApiRequest::post("/auth/login", &credentials)
        .map_err(|e| AuthError::unavailable(LOGIN_FAILED, e))?;

    let response: LoginResponse = api::call(gateway, request).await.map_err(|e| {
        warn!(error = %e, "Login rejected");
        match e.status() {
            Some(400 | 401 | 422) => AuthError::InvalidCredentials,
            _ => AuthError::unavailable(LOGIN_FAILED, e),
        }
    })?;

    let user = response.user;
    session.establish(SecretString::from(response.access_token), user.clone());
    Ok(user)
}

/// Register a new account. Does not log in.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword` before any
/// call is made, and `AuthError::RegistrationRejected` when the server
/// refuses.
#[instrument(skip(gateway, password))]
pub async fn register<G: Gateway>(gateway: &G, email: &str, password: &str) -> Result<(), AuthError> {
    let credentials = validate_registration(email, password)?;

    let request = ApiRequest::post("/auth/register", &credentials)
        .map_err(|e| AuthError::unavailable(REGISTER_FAILED, e))?;

    api::call_unit(gateway, request).await.map_err(|e| {
        warn!(error = %e, "Registration rejected");
        match ErrorKind::of(&e) {
            ErrorKind::Network => AuthError::unavailable(REGISTER_FAILED, e),
            _ => AuthError::RegistrationRejected(user_message(REGISTER_FAILED, &e)),
        }
    })?;

    info!(email = %credentials.email, "Account registered");
    Ok(())
}

/// Register, then log in with the same credentials.
///
/// # Errors
///
/// Returns the first failing step's error.
pub async fn register_and_login<G: Gateway>(
    gateway: &G,
    session: &mut Session,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    register(gateway, email, password).await?;
    login(gateway, session, email, password).await
}

/// Check the stored credential against `GET /auth/me`.
///
/// On success the stored identity is refreshed. A 401 means the token is
/// no longer valid: the session is destroyed.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` without a session,
/// `AuthError::SessionExpired` on 401 and `AuthError::Unavailable` otherwise.
#[instrument(skip(gateway, session))]
pub async fn whoami<G: Gateway>(gateway: &G, session: &mut Session) -> Result<User, AuthError> {
    let token = session.token().ok_or(AuthError::NotAuthenticated)?;
    let request = ApiRequest::get("/auth/me").with_bearer(Some(token));

    match api::call::<User, _>(gateway, request).await {
        Ok(user) => {
            session.refresh_user(user.clone());
            Ok(user)
        }
        Err(e) if ErrorKind::of(&e) == ErrorKind::Unauthorized => {
            warn!("Stored session rejected by server");
            if let Err(clear) = session.logout() {
                warn!(error = %clear, "Could not clear stored session");
            }
            Err(AuthError::SessionExpired)
        }
        Err(e) => Err(AuthError::unavailable(WHOAMI_FAILED, e)),
    }
}

/// Local registration checks.
fn validate_registration(email: &str, password: &str) -> Result<Credentials, AuthError> {
    let email = Email::parse(email.trim())?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(Credentials {
        email,
        password: password.to_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::FakeGateway;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn login_body(role: &str) -> serde_json::Value {
        json!({
            "access_token": "tok-abc",
            "token_type": "bearer",
            "user": {
                "id": 1,
                "email": "ana@example.com",
                "role": role,
                "is_active": true,
                "created_at": "2025-03-01T10:00:00"
            }
        })
    }

    #[tokio::test]
    async fn test_login_establishes_session() {
        let gateway = FakeGateway::new();
        gateway.respond(Method::Post, "/auth/login", login_body("ADMIN"));
        let mut session = Session::in_memory();

        let user = login(&gateway, &mut session, " ana@example.com ", "secret1")
            .await
            .unwrap();

        assert!(user.is_admin());
        assert!(session.is_admin());
        assert_eq!(session.token().unwrap().expose_secret(), "tok-abc");

        let sent = &gateway.requests()[0];
        assert_eq!(
            sent.body,
            Some(json!({ "email": "ana@example.com", "password": "secret1" }))
        );
        assert_eq!(sent.bearer, None);
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_session_empty() {
        let gateway = FakeGateway::new();
        gateway.respond_status(
            Method::Post,
            "/auth/login",
            401,
            r#"{"detail":"Invalid credentials"}"#,
        );
        let mut session = Session::in_memory();

        let err = login(&gateway, &mut session, "ana@example.com", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Credenciales inválidas");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_network_failure() {
        let gateway = FakeGateway::new();
        gateway.fail_transport(Method::Post, "/auth/login");
        let mut session = Session::in_memory();

        let err = login(&gateway, &mut session, "ana@example.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No se pudo iniciar sesión");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_validates_locally() {
        let gateway = FakeGateway::new();

        let err = register(&gateway, "not-an-email", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));

        let err = register(&gateway, "ana@example.com", "123").await.unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword));

        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let gateway = FakeGateway::new();
        gateway.respond_status(
            Method::Post,
            "/auth/register",
            409,
            r#"{"detail":"Email already registered"}"#,
        );

        let err = register(&gateway, "ana@example.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No se pudo registrar. ¿Ya existe el correo? · Detalle: Email already registered"
        );
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let gateway = FakeGateway::new();
        gateway
            .respond(Method::Post, "/auth/register", json!({ "id": 1 }))
            .respond(Method::Post, "/auth/login", login_body("USER"));
        let mut session = Session::in_memory();

        let user = register_and_login(&gateway, &mut session, "ana@example.com", "secret1")
            .await
            .unwrap();

        assert!(!user.is_admin());
        assert!(session.is_authenticated());
        let paths: Vec<_> = gateway.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, ["/auth/register", "/auth/login"]);
    }

    #[tokio::test]
    async fn test_whoami_requires_session() {
        let gateway = FakeGateway::new();
        let mut session = Session::in_memory();

        let err = whoami(&gateway, &mut session).await.unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_whoami_expired_token_destroys_session() {
        let gateway = FakeGateway::new();
        gateway
            .respond(Method::Post, "/auth/login", login_body("USER"))
            .respond_status(Method::Get, "/auth/me", 401, "");
        let mut session = Session::in_memory();
        login(&gateway, &mut session, "ana@example.com", "secret1")
            .await
            .unwrap();

        let err = whoami(&gateway, &mut session).await.unwrap_err();

        assert!(matches!(err, AuthError::SessionExpired));
        assert!(!session.is_authenticated());
        let me = gateway.requests_to(Method::Get, "/auth/me");
        assert_eq!(me[0].bearer.as_deref(), Some("tok-abc"));
    }
}
