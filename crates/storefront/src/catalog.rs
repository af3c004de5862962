//! Catalog view model and catalog reads.
//!
//! [`CatalogState`] is a flat request/response model: a fetch sets the
//! loading flag, a success replaces the product list, a failure records a
//! message and leaves the previous list in place.

use candy_market_core::{CatalogQuery, Product, ProductId};
use tracing::instrument;

use crate::api::{self, ApiError, ApiRequest, Gateway};
use crate::error::user_message;

/// Shown when the catalog cannot be loaded.
pub const CATALOG_FAILED: &str = "No se pudo cargar el catálogo";

/// Shown when a product lookup returns 404.
pub const PRODUCT_NOT_FOUND: &str = "Producto no encontrado";

/// Products from the latest successful fetch, plus fetch status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogState {
    /// A fetch has started.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A fetch returned products.
    pub fn finish_ok(&mut self, products: Vec<Product>) {
        self.products = products;
        self.loading = false;
    }

    /// A fetch failed. The stale list stays visible next to the message.
    pub fn finish_err(&mut self, err: &ApiError) {
        self.loading = false;
        self.error = Some(user_message(CATALOG_FAILED, err));
    }

    /// Look up a product in the current list.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Fetch the catalog for a query.
///
/// # Errors
///
/// Returns the gateway error unchanged.
#[instrument(skip(gateway), fields(path = %query.path()))]
pub async fn fetch_catalog<G: Gateway>(
    gateway: &G,
    query: &CatalogQuery,
) -> Result<Vec<Product>, ApiError> {
    api::call(gateway, ApiRequest::get(query.path())).await
}

/// Fetch a single product.
///
/// # Errors
///
/// Returns the gateway error unchanged; see [`product_error_message`].
#[instrument(skip(gateway))]
pub async fn fetch_product<G: Gateway>(gateway: &G, id: ProductId) -> Result<Product, ApiError> {
    api::call(gateway, ApiRequest::get(format!("/products/{id}"))).await
}

/// User-facing text for a failed product lookup.
#[must_use]
pub fn product_error_message(err: &ApiError) -> String {
    if err.status() == Some(404) {
        PRODUCT_NOT_FOUND.to_owned()
    } else {
        user_message(CATALOG_FAILED, err)
    }
}
