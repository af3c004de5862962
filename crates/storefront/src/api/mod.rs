//! API gateway: the single way out to the marketplace HTTP API.
//!
//! # Architecture
//!
//! - [`Gateway`] is the transport seam. [`HttpGateway`] implements it with
//!   `reqwest`; tests use `testing::FakeGateway`.
//! - A gateway call takes an [`ApiRequest`] (verb, path, optional JSON body,
//!   optional bearer token) and yields the parsed JSON body, or `None` when
//!   the response had no body.
//! - Every non-2xx response becomes [`ApiError::Status`], carrying the
//!   status, a human-readable message and the raw body.
//! - No retries, no caching.
//!
//! # Example
//!
//! ```rust,ignore
//! use candy_market_storefront::api::{self, ApiRequest, HttpGateway};
//!
//! let gateway = HttpGateway::new(&config)?;
//! let products: Vec<Product> = api::call(&gateway, ApiRequest::get("/products")).await?;
//! ```

mod http;

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpGateway;

/// Body text used when a failed response carries nothing useful.
const EMPTY_BODY_MESSAGE: &str = "sin cuerpo";

/// HTTP verbs used by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Uppercase verb name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound API call.
///
/// `Debug` is implemented manually to redact the bearer token.
#[derive(Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API origin, including any query string.
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<SecretString>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    /// A `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// A `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// A `POST` request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encode` if the body cannot be serialized.
    pub fn post(path: impl Into<String>, body: &impl Serialize) -> Result<Self, ApiError> {
        Ok(Self::new(Method::Post, path).with_body(encode(body)?))
    }

    /// A `PUT` request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encode` if the body cannot be serialized.
    pub fn put(path: impl Into<String>, body: &impl Serialize) -> Result<Self, ApiError> {
        Ok(Self::new(Method::Put, path).with_body(encode(body)?))
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a bearer token, if there is one.
    #[must_use]
    pub fn with_bearer(mut self, token: Option<&SecretString>) -> Self {
        self.bearer = token.cloned();
        self
    }

    /// The bearer token in clear text, for building the header.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer.as_ref().map(ExposeSecret::expose_secret)
    }
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("body", &self.body)
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Errors produced by a gateway call.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, timeout, TLS...).
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} - {message}")]
    Status {
        status: u16,
        /// `detail`/`message` from the body, else the status reason, else the raw text.
        message: String,
        /// `detail`/`message` from a structured body, if present.
        detail: Option<String>,
        /// Raw response body for diagnostics.
        body: String,
    },

    /// A 2xx body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// A request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// HTTP status, for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided detail text, for `Status` errors with a structured body.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Transport seam for API calls.
///
/// Implementations perform exactly one call per `send`: no retries, no
/// caching. The returned future must be `Send` so calls can run on spawned
/// tasks.
pub trait Gateway: Send + Sync {
    /// Perform the call and return the parsed body (`None` if empty).
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Option<Value>, ApiError>> + Send;
}

impl<G: Gateway> Gateway for std::sync::Arc<G> {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Option<Value>, ApiError>> + Send {
        (**self).send(request)
    }
}

/// Perform a call and decode the JSON body into `T`.
///
/// # Errors
///
/// Returns the gateway's error, or `ApiError::Decode` if the body does not
/// match `T`.
pub async fn call<T, G>(gateway: &G, request: ApiRequest) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    G: Gateway,
{
    let body = gateway.send(request).await?.unwrap_or(Value::Null);
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Perform a call whose response body is ignored (e.g. `204 No Content`).
///
/// # Errors
///
/// Returns the gateway's error.
pub async fn call_unit<G>(gateway: &G, request: ApiRequest) -> Result<(), ApiError>
where
    G: Gateway,
{
    gateway.send(request).await.map(|_| ())
}

fn encode(body: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// Interpret a completed HTTP exchange.
///
/// The body may be empty, plain text or malformed JSON; none of those are
/// errors by themselves. Non-JSON text is surfaced as a JSON string.
pub(crate) fn interpret_response(
    status: u16,
    reason: Option<&str>,
    text: &str,
) -> Result<Option<Value>, ApiError> {
    let data = if text.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned())))
    };

    if (200..300).contains(&status) {
        return Ok(data);
    }

    let detail = data.as_ref().and_then(structured_message);
    let message = detail
        .clone()
        .or_else(|| reason.filter(|r| !r.is_empty()).map(str::to_owned))
        .or_else(|| (!text.trim().is_empty()).then(|| text.to_owned()))
        .unwrap_or_else(|| EMPTY_BODY_MESSAGE.to_owned());

    Err(ApiError::Status {
        status,
        message,
        detail,
        body: text.to_owned(),
    })
}

/// Pull `detail` (preferred) or `message` out of a JSON error body.
///
/// String values are used verbatim; structured values (e.g. a validation
/// error list) are rendered as compact JSON.
fn structured_message(data: &Value) -> Option<String> {
    let object = data.as_object()?;
    ["detail", "message"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_with_json() {
        let body = interpret_response(200, Some("OK"), r#"[{"id":1}]"#).unwrap();
        assert_eq!(body, Some(json!([{ "id": 1 }])));
    }

    #[test]
    fn test_success_with_empty_body() {
        assert_eq!(interpret_response(204, Some("No Content"), "").unwrap(), None);
    }

    #[test]
    fn test_success_with_plain_text() {
        let body = interpret_response(200, Some("OK"), "pong").unwrap();
        assert_eq!(body, Some(Value::String("pong".to_string())));
    }

    #[test]
    fn test_error_uses_detail() {
        let err = interpret_response(
            401,
            Some("Unauthorized"),
            r#"{"detail":"Credenciales inválidas"}"#,
        )
        .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail(), Some("Credenciales inválidas"));
        assert_eq!(err.to_string(), "HTTP 401 - Credenciales inválidas");
    }

    #[test]
    fn test_error_falls_back_to_message_field() {
        let err = interpret_response(409, Some("Conflict"), r#"{"message":"duplicado"}"#)
            .unwrap_err();
        assert_eq!(err.detail(), Some("duplicado"));
    }

    #[test]
    fn test_error_with_structured_detail() {
        let err = interpret_response(
            422,
            Some("Unprocessable Entity"),
            r#"{"detail":[{"loc":["body","price"],"msg":"field required"}]}"#,
        )
        .unwrap_err();
        assert!(err.detail().unwrap().contains("field required"));
    }

    #[test]
    fn test_error_with_malformed_json_uses_reason() {
        let err = interpret_response(500, Some("Internal Server Error"), "{oops").unwrap_err();
        match err {
            ApiError::Status {
                message, detail, body, ..
            } => {
                assert_eq!(message, "Internal Server Error");
                assert_eq!(detail, None);
                assert_eq!(body, "{oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_without_reason_uses_text_then_placeholder() {
        let err = interpret_response(599, None, "gateway down").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 599 - gateway down");

        let err = interpret_response(599, None, "").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 599 - sin cuerpo");
    }

    #[test]
    fn test_request_debug_redacts_bearer() {
        let token = SecretString::from("very-secret-token");
        let request = ApiRequest::get("/orders/my").with_bearer(Some(&token));
        let output = format!("{request:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("very-secret-token"));
        assert_eq!(request.bearer_token(), Some("very-secret-token"));
    }

    #[test]
    fn test_post_encodes_body() {
        let request = ApiRequest::post("/orders", &json!({ "items": [] })).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(json!({ "items": [] })));
    }
}
