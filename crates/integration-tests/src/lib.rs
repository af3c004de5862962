//! Integration tests for Candy Market against a live backend.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a running API (default: http://localhost:8000)
//! export CANDY_API_URL=http://localhost:8000
//!
//! # Run the ignored live tests
//! cargo test -p candy-market-integration-tests -- --ignored
//! ```
//!
//! Admin tests additionally need `CANDY_ADMIN_EMAIL` and
//! `CANDY_ADMIN_PASSWORD` for an account with the `ADMIN` role; they are
//! skipped when those are unset.
//!
//! # Test Categories
//!
//! - `catalog` - Public catalog reads and filters
//! - `account` - Registration, login, session check and checkout
//! - `admin` - Admin overview and product lifecycle

use candy_market_storefront::config::DEFAULT_API_URL;
use candy_market_storefront::{HttpGateway, Session, StorefrontConfig};
use url::Url;

/// Password used for accounts created by the tests.
pub const TEST_PASSWORD: &str = "dulce-secreto-123";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("CANDY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// An HTTP gateway pointed at [`api_base_url`].
///
/// # Panics
///
/// Panics if `CANDY_API_URL` is not a valid URL.
#[must_use]
#[allow(clippy::expect_used)]
pub fn gateway() -> HttpGateway {
    let config =
        StorefrontConfig::new(Url::parse(&api_base_url()).expect("CANDY_API_URL is not a valid URL"));
    HttpGateway::new(&config).expect("Failed to create HTTP gateway")
}

/// A fresh session that is never written to disk.
#[must_use]
pub fn session() -> Session {
    Session::in_memory()
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("test-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// Admin credentials from the environment, if configured.
#[must_use]
pub fn admin_credentials() -> Option<(String, String)> {
    let email = std::env::var("CANDY_ADMIN_EMAIL").ok()?;
    let password = std::env::var("CANDY_ADMIN_PASSWORD").ok()?;
    Some((email, password))
}
