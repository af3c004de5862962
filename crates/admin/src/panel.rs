//! The admin panel: overview, product management and user listing.

use std::sync::Arc;

use candy_market_core::{
    AdminOverview, AdminUserBrief, Product, ProductDraft, ProductId, ProductUpdate,
};
use candy_market_storefront::api::{self, ApiRequest, Gateway};
use candy_market_storefront::session::Session;
use tracing::{info, instrument, warn};

use crate::confirm::Confirm;
use crate::error::AdminError;
use crate::users::UserQuery;

const OVERVIEW_FAILED: &str = "No se pudo cargar panel admin";
const CREATE_FAILED: &str = "Error creando producto";
const UPDATE_FAILED: &str = "No se pudo actualizar el producto";
const DELETE_FAILED: &str = "No se pudo eliminar";
const USERS_FAILED: &str = "No se pudo cargar la lista de usuarios";

/// Prompt shown before deleting a product.
pub const DELETE_PROMPT: &str = "¿Eliminar este producto?";

/// Admin catalog management.
///
/// Holds the last overview and the last error message. Every write reloads
/// the overview on success.
pub struct AdminPanel<G: Gateway> {
    gateway: Arc<G>,
    overview: Option<AdminOverview>,
    error: Option<String>,
}

impl<G: Gateway> AdminPanel<G> {
    pub const fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            overview: None,
            error: None,
        }
    }

    /// Whether to offer the admin panel to this session.
    #[must_use]
    pub fn is_available(session: &Session) -> bool {
        session.is_admin()
    }

    /// Fetch products, latest users and counts in one call.
    ///
    /// On failure the previously loaded overview (if any) is kept.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotAuthenticated` without a session, or
    /// `AdminError::Api` (401 and 403 get their own message).
    #[instrument(skip_all)]
    pub async fn load(&mut self, session: &Session) -> Result<&AdminOverview, AdminError> {
        let token = session.token().ok_or(AdminError::NotAuthenticated)?;
        let request = ApiRequest::get("/admin/overview").with_bearer(Some(token));

        let result = api::call::<AdminOverview, _>(self.gateway.as_ref(), request).await;
        match result {
            Ok(overview) => {
                self.error = None;
                Ok(self.overview.insert(overview))
            }
            Err(e) => {
                warn!(error = %e, "Could not load admin overview");
                Err(self.fail(AdminError::api(OVERVIEW_FAILED, e)))
            }
        }
    }

    /// Validate the draft, create the product and reload the overview.
    ///
    /// The draft is reset after a successful create. Nothing is sent if the
    /// draft is invalid.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidDraft` before any call, or
    /// `AdminError::Api` with the server detail appended.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create_product(
        &mut self,
        session: &Session,
        draft: &mut ProductDraft,
    ) -> Result<Product, AdminError> {
        let token = session.token().ok_or(AdminError::NotAuthenticated)?;
        let new_product = draft
            .validate()
            .map_err(|e| self.fail(AdminError::InvalidDraft(e)))?;

        let request = ApiRequest::post("/products", &new_product)
            .map_err(|e| self.fail(AdminError::api(CREATE_FAILED, e)))?
            .with_bearer(Some(token));

        let result = api::call::<Product, _>(self.gateway.as_ref(), request).await;
        let product = result.map_err(|e| {
            warn!(error = %e, "Product creation rejected");
            self.fail(AdminError::api(CREATE_FAILED, e))
        })?;

        info!(product_id = %product.id, "Product created");
        *draft = ProductDraft::default();
        self.reload(session).await;
        Ok(product)
    }

    /// Apply a partial update to a product and reload the overview.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NothingToUpdate` for an empty update, or
    /// `AdminError::Api`.
    #[instrument(skip(self, session, update))]
    pub async fn update_product(
        &mut self,
        session: &Session,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, AdminError> {
        let token = session.token().ok_or(AdminError::NotAuthenticated)?;
        if update.is_empty() {
            return Err(self.fail(AdminError::NothingToUpdate));
        }

        let request = ApiRequest::put(format!("/products/{id}"), update)
            .map_err(|e| self.fail(AdminError::api(UPDATE_FAILED, e)))?
            .with_bearer(Some(token));

        let result = api::call::<Product, _>(self.gateway.as_ref(), request).await;
        let product = result.map_err(|e| {
            warn!(error = %e, "Product update rejected");
            self.fail(AdminError::api(UPDATE_FAILED, e))
        })?;

        info!("Product updated");
        self.reload(session).await;
        Ok(product)
    }

    /// Delete a product after explicit confirmation, then reload the overview.
    ///
    /// Returns `Ok(false)` without any call when confirmation is declined.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the server refuses.
    #[instrument(skip(self, session, confirm))]
    pub async fn delete_product(
        &mut self,
        session: &Session,
        id: ProductId,
        confirm: &impl Confirm,
    ) -> Result<bool, AdminError> {
        let token = session.token().ok_or(AdminError::NotAuthenticated)?;
        if !confirm.confirm(DELETE_PROMPT) {
            info!("Deletion cancelled");
            return Ok(false);
        }

        let request = ApiRequest::delete(format!("/products/{id}")).with_bearer(Some(token));
        let result = api::call_unit(self.gateway.as_ref(), request).await;
        result.map_err(|e| {
            warn!(error = %e, "Product deletion rejected");
            self.fail(AdminError::api(DELETE_FAILED, e))
        })?;

        info!("Product deleted");
        self.reload(session).await;
        Ok(true)
    }

    /// List users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the server refuses.
    #[instrument(skip(self, session))]
    pub async fn list_users(
        &mut self,
        session: &Session,
        query: &UserQuery,
    ) -> Result<Vec<AdminUserBrief>, AdminError> {
        let token = session.token().ok_or(AdminError::NotAuthenticated)?;
        let request = ApiRequest::get(query.path()).with_bearer(Some(token));

        let result = api::call::<Vec<AdminUserBrief>, _>(self.gateway.as_ref(), request).await;
        result.map_err(|e| self.fail(AdminError::api(USERS_FAILED, e)))
    }

    #[must_use]
    pub const fn overview(&self) -> Option<&AdminOverview> {
        self.overview.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Reload after a successful write. A failure only updates the message.
    async fn reload(&mut self, session: &Session) {
        if let Err(e) = self.load(session).await {
            warn!(error = %e, "Overview reload failed");
        }
    }

    fn fail(&mut self, err: AdminError) -> AdminError {
        self.error = Some(err.to_string());
        err
    }
}
