//! User-facing error classification with Sentry context helpers.
//!
//! Every flow catches its own failures and turns them into a component-local
//! message with [`user_message`]. Authentication and authorization failures
//! get a distinct text regardless of the component; everything else uses the
//! component's generic message, with the server detail appended when there is
//! one.

use crate::api::ApiError;

/// Shown on any 401.
pub const SESSION_EXPIRED: &str = "Sesión expirada. Inicia sesión de nuevo.";

/// Shown on any 403.
pub const ADMIN_REQUIRED: &str = "Acceso denegado: requiere rol ADMIN.";

/// Broad category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never completed.
    Network,
    /// 401: missing or expired credential.
    Unauthorized,
    /// 403: authenticated but lacking the role.
    Forbidden,
    /// Any other 4xx: the server rejected the input.
    Validation,
    /// 5xx.
    Server,
    /// The response (or request) body had an unexpected shape.
    Decode,
}

impl ErrorKind {
    /// Classify a gateway error.
    #[must_use]
    pub const fn of(err: &ApiError) -> Self {
        match err {
            ApiError::Transport(_) => Self::Network,
            ApiError::Status { status: 401, .. } => Self::Unauthorized,
            ApiError::Status { status: 403, .. } => Self::Forbidden,
            ApiError::Status { status, .. } if *status < 500 => Self::Validation,
            ApiError::Status { .. } => Self::Server,
            ApiError::Decode(_) | ApiError::Encode(_) => Self::Decode,
        }
    }
}

/// Render the message a component shows for a failed call.
///
/// `generic` is the component's own text, e.g. "No se pudo crear la orden".
#[must_use]
pub fn user_message(generic: &str, err: &ApiError) -> String {
    let base = match ErrorKind::of(err) {
        ErrorKind::Unauthorized => SESSION_EXPIRED,
        ErrorKind::Forbidden => ADMIN_REQUIRED,
        _ => generic,
    };

    match err.detail() {
        Some(detail) => format!("{base} · Detalle: {detail}"),
        None => base.to_owned(),
    }
}

/// Set the Sentry user context after login or session restore.
///
/// Only the ID and email are attached; the token never is.
pub fn set_sentry_user(user: &candy_market_core::User) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: user.id.map(|id| id.to_string()),
            email: Some(user.email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::interpret_response;

    fn status_error(status: u16, body: &str) -> ApiError {
        interpret_response(status, None, body).unwrap_err()
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            ErrorKind::of(&ApiError::Transport("refused".into())),
            ErrorKind::Network
        );
        assert_eq!(ErrorKind::of(&status_error(401, "")), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::of(&status_error(403, "")), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::of(&status_error(409, "")), ErrorKind::Validation);
        assert_eq!(ErrorKind::of(&status_error(502, "")), ErrorKind::Server);
        assert_eq!(
            ErrorKind::of(&ApiError::Decode("bad".into())),
            ErrorKind::Decode
        );
    }

    #[test]
    fn test_generic_message_without_detail() {
        let err = status_error(500, "boom");
        assert_eq!(
            user_message("No se pudo crear la orden", &err),
            "No se pudo crear la orden"
        );
    }

    #[test]
    fn test_detail_is_appended() {
        let err = status_error(400, r#"{"detail":"Stock insuficiente"}"#);
        assert_eq!(
            user_message("No se pudo crear la orden", &err),
            "No se pudo crear la orden · Detalle: Stock insuficiente"
        );
    }

    #[test]
    fn test_auth_failures_override_generic_message() {
        let err = status_error(401, "");
        assert_eq!(user_message("No se pudo cargar panel admin", &err), SESSION_EXPIRED);

        let err = status_error(403, r#"{"detail":"Admin only"}"#);
        assert_eq!(
            user_message("No se pudo cargar panel admin", &err),
            "Acceso denegado: requiere rol ADMIN. · Detalle: Admin only"
        );
    }
}
