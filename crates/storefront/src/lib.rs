//! Candy Market Storefront library.
//!
//! The client-side state engine of the storefront: everything between user
//! input and the marketplace HTTP API, with no presentation.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`api`] - The gateway through which every API call goes
//! - [`session`] - Bearer credential and identity, persisted across restarts
//! - [`auth`] - Login, registration and identity checks
//! - [`catalog`] - Catalog view model and product reads
//! - [`search`] - Debounced catalog search
//! - [`orders`] - Cart checkout and order history
//! - [`error`] - User-facing error messages
//!
//! # Concurrency
//!
//! State is owned by the flow objects and mutated through `&mut self` in
//! call order. Network calls are awaited; only the debounced search spawns
//! tasks, and those never touch anything but the catalog state they publish.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orders;
pub mod search;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use api::{ApiError, ApiRequest, Gateway, HttpGateway, Method};
pub use config::StorefrontConfig;
pub use session::{FileSessionStorage, MemorySessionStorage, Session, SessionStorage};
