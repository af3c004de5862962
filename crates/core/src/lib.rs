//! Candy Market Core - Shared types and client-side state.
//!
//! This crate provides the domain types used across all Candy Market
//! components:
//! - `storefront` - Catalog browsing, session and order submission client
//! - `admin` - Catalog management for administrators
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients, no timers. The cart aggregate and the catalog query
//! builder live here so they can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, roles and statuses
//! - [`product`] - Catalog products and categories
//! - [`filter`] - Filter selection and canonical catalog query strings
//! - [`cart`] - The in-memory shopping cart aggregate
//! - [`order`] - Orders as recorded by the server and order requests
//! - [`user`] - Identity records and auth payloads
//! - [`admin`] - Admin overview payloads and product drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod cart;
pub mod filter;
pub mod order;
pub mod product;
pub mod types;
pub mod user;

pub use admin::{
    AdminCounts, AdminOverview, AdminProductBrief, AdminUserBrief, DraftError, ProductDraft,
};
pub use cart::{Cart, LineItem};
pub use filter::{CatalogQuery, FilterSelection, SortMode};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use product::{Category, NewProduct, Product, ProductUpdate};
pub use types::*;
pub use user::{Credentials, LoginResponse, User};
