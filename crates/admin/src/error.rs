//! Admin error types.

use candy_market_core::DraftError;
use candy_market_storefront::ApiError;
use candy_market_storefront::error::user_message;
use thiserror::Error;

/// Admin flow errors. `Display` is the text shown to the administrator.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("No has iniciado sesión")]
    NotAuthenticated,

    /// The product form was rejected before any call was made.
    #[error("{0}")]
    InvalidDraft(#[from] DraftError),

    #[error("No hay cambios para guardar")]
    NothingToUpdate,

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl AdminError {
    pub(crate) fn api(generic: &str, source: ApiError) -> Self {
        Self::Api {
            message: user_message(generic, &source),
            source,
        }
    }

    /// HTTP status of the failed call, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { source, .. } => source.status(),
            _ => None,
        }
    }
}
