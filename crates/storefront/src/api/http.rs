//! `reqwest` implementation of the API gateway.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{ApiError, ApiRequest, Gateway, Method, interpret_response};
use crate::config::StorefrontConfig;

/// Maximum number of body characters written to the log.
const LOGGED_BODY_CHARS: usize = 500;

/// HTTP client for the marketplace API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

struct HttpGatewayInner {
    client: reqwest::Client,
    /// API origin without a trailing slash
    base: String,
}

impl HttpGateway {
    /// Create a gateway for the configured API origin.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(HttpGatewayInner {
                client,
                base: config.api_url.as_str().trim_end_matches('/').to_owned(),
            }),
        })
    }

    /// The API origin requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base
    }

    /// Resolve a request path against the API origin.
    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        Url::parse(&format!("{}{separator}{path}", self.inner.base))
            .map_err(|e| ApiError::Transport(format!("invalid request URL for {path}: {e}")))
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        let url = self.url_for(&request.path)?;

        let mut builder = match request.method {
            Method::Get => self.inner.client.get(url),
            Method::Post => self.inner.client.post(url),
            Method::Put => self.inner.client.put(url),
            Method::Delete => self.inner.client.delete(url),
        }
        .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = request.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        // Writes always carry a JSON object, even when the caller has none
        builder = match (request.method, request.body) {
            (Method::Post | Method::Put, body) => {
                builder.json(&body.unwrap_or_else(|| Value::Object(serde_json::Map::new())))
            }
            (_, Some(body)) => builder.json(&body),
            (_, None) => builder,
        };

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request did not complete");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        // An unreadable body is treated like an empty one
        let text = response.text().await.unwrap_or_default();

        let result = interpret_response(status.as_u16(), status.canonical_reason(), &text);
        match &result {
            Ok(_) => debug!(status = %status, "Request succeeded"),
            Err(_) => warn!(
                status = %status,
                body = %text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "API returned non-success status"
            ),
        }
        result
    }
}

impl Gateway for HttpGateway {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Option<Value>, ApiError>> + Send {
        self.execute(request)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway(origin: &str) -> HttpGateway {
        let config = StorefrontConfig::new(Url::parse(origin).unwrap());
        HttpGateway::new(&config).unwrap()
    }

    #[test]
    fn test_url_for_concatenates_origin_and_path() {
        let gw = gateway("http://localhost:8000/");
        assert_eq!(gw.base_url(), "http://localhost:8000");
        assert_eq!(
            gw.url_for("/products?sort_by=Relevancia").unwrap().as_str(),
            "http://localhost:8000/products?sort_by=Relevancia"
        );
    }

    #[test]
    fn test_url_for_keeps_origin_path_prefix() {
        let gw = gateway("https://shop.example/api");
        assert_eq!(
            gw.url_for("orders/my").unwrap().as_str(),
            "https://shop.example/api/orders/my"
        );
    }
}
