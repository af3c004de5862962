//! Order submission flow.
//!
//! [`OrderPanel`] is the customer panel: the products that can be added, the
//! cart, and the customer's order history. It is created with an empty cart;
//! the cart is cleared after a successful order and dropped with the panel.

use std::sync::Arc;

use candy_market_core::{Cart, Order, Product, ProductId};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{self, ApiError, ApiRequest, Gateway};
use crate::error::user_message;
use crate::session::Session;

/// Shown when the panel data cannot be loaded.
pub const LOAD_FAILED: &str = "No se pudo cargar tus datos";

/// Shown when an order is rejected.
pub const ORDER_FAILED: &str = "No se pudo crear la orden";

/// Order flow errors. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("El carrito está vacío")]
    EmptyCart,

    #[error("No has iniciado sesión")]
    NotAuthenticated,

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

/// Cart, purchasable products and order history for the logged-in customer.
pub struct OrderPanel<G: Gateway> {
    gateway: Arc<G>,
    cart: Cart,
    products: Vec<Product>,
    orders: Vec<Order>,
    error: Option<String>,
}

impl<G: Gateway> OrderPanel<G> {
    /// A panel with an empty cart. Call [`load`](Self::load) to fill it.
    pub const fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            cart: Cart::new(),
            products: Vec::new(),
            orders: Vec::new(),
            error: None,
        }
    }

    /// Fetch the product list and the customer's orders together.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotAuthenticated` without a session, or
    /// `OrderError::Api` if either call fails. Previously loaded data is
    /// kept on failure.
    #[instrument(skip_all)]
    pub async fn load(&mut self, session: &Session) -> Result<(), OrderError> {
        let token = session.token().ok_or(OrderError::NotAuthenticated)?;
        let gateway = self.gateway.as_ref();

        let products = api::call::<Vec<Product>, _>(gateway, ApiRequest::get("/products"));
        let orders = api::call::<Vec<Order>, _>(
            gateway,
            ApiRequest::get("/orders/my").with_bearer(Some(token)),
        );

        let result = tokio::try_join!(products, orders);
        match result {
            Ok((products, orders)) => {
                self.products = products;
                self.orders = orders;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Could not load customer panel");
                Err(self.fail(LOAD_FAILED, e))
            }
        }
    }

    /// Add one unit of a listed product to the cart.
    ///
    /// Returns `false` if the product is not in the loaded list.
    pub fn add_to_cart(&mut self, product_id: ProductId) -> bool {
        match self.products.iter().find(|p| p.id == product_id) {
            Some(product) => {
                self.cart.add(product);
                true
            }
            None => false,
        }
    }

    /// Add one unit of a product from elsewhere, e.g. the catalog search.
    pub fn add_product(&mut self, product: &Product) {
        self.cart.add(product);
    }

    pub fn increment(&mut self, product_id: ProductId) {
        self.cart.increment(product_id);
    }

    pub fn decrement(&mut self, product_id: ProductId) {
        self.cart.decrement(product_id);
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.cart.remove(product_id);
    }

    /// Whether "place order" is enabled.
    #[must_use]
    pub fn can_submit(&self, session: &Session) -> bool {
        !self.cart.is_empty() && session.is_authenticated()
    }

    /// Submit the cart as an order.
    ///
    /// Only product IDs and quantities are sent. On success the cart is
    /// cleared and the order history is fetched again. On failure the cart
    /// is left as it was; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` or `OrderError::NotAuthenticated`
    /// without making a call, or `OrderError::Api` if the server rejects
    /// the order.
    #[instrument(skip_all, fields(lines = self.cart.lines().len()))]
    pub async fn place_order(&mut self, session: &Session) -> Result<Order, OrderError> {
        let Some(new_order) = self.cart.to_order() else {
            let err = OrderError::EmptyCart;
            self.error = Some(err.to_string());
            return Err(err);
        };
        let token = session.token().ok_or(OrderError::NotAuthenticated)?;

        let request = ApiRequest::post("/orders", &new_order)
            .map_err(|e| self.fail(ORDER_FAILED, e))?
            .with_bearer(Some(token));

        let result = api::call::<Order, _>(self.gateway.as_ref(), request).await;
        let order = match result {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "Order rejected");
                return Err(self.fail(ORDER_FAILED, e));
            }
        };

        info!(order_id = %order.id, total = %order.total(), "Order placed");
        self.cart.clear();
        self.error = None;

        // The order exists either way; a failed refresh only shows its message
        if let Err(e) = self.load(session).await {
            warn!(error = %e, "Order history refresh failed");
        }
        Ok(order)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The last error message, cleared by the next successful load or order.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn fail(&mut self, generic: &str, source: ApiError) -> OrderError {
        let message = user_message(generic, &source);
        self.error = Some(message.clone());
        OrderError::Api { message, source }
    }
}
