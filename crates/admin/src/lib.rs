//! Candy Market Admin library.
//!
//! Catalog management for administrators, built on the storefront gateway
//! and session.
//!
//! # Security
//!
//! Every call carries the session's bearer token and the server enforces
//! the `ADMIN` role. [`AdminPanel::is_available`] only decides whether to
//! offer the panel; it is not an access check.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod confirm;
pub mod error;
pub mod panel;
pub mod users;

pub use confirm::{AssumeYes, Confirm};
pub use error::AdminError;
pub use panel::AdminPanel;
pub use users::UserQuery;
