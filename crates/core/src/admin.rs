//! Admin payloads and product drafts.
//!
//! The overview endpoint aggregates the newest products, the newest users
//! and global counts into a single read. [`ProductDraft`] holds the raw text
//! of the create-product form and turns it into a [`NewProduct`] only when
//! every field is valid.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::product::{Category, NewProduct};
use crate::types::{Price, PriceError, ProductId, Role, UserId};

/// A user summary as listed in the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserBrief {
    pub id: UserId,
    /// Email, or username on older accounts.
    #[serde(alias = "username")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
}

/// A product summary as listed in the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProductBrief {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<NaiveDateTime>,
}

/// Global counts shown in the admin panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCounts {
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub products: u64,
}

/// Response of `GET /admin/overview`.
///
/// Older servers name the user list `users` instead of `latestUsers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOverview {
    #[serde(default)]
    pub products: Vec<AdminProductBrief>,
    #[serde(default, rename = "latestUsers", alias = "users")]
    pub latest_users: Vec<AdminUserBrief>,
    #[serde(default)]
    pub counts: AdminCounts,
}

/// Errors found while validating a [`ProductDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("El nombre es obligatorio")]
    MissingName,
    #[error("Precio inválido: {0}")]
    InvalidPrice(#[from] PriceError),
    #[error("Stock inválido: '{0}' no es un entero no negativo")]
    InvalidStock(String),
}

/// Raw create-product form input.
///
/// Blank price and stock fields mean zero; anything else must parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub image_url: String,
    pub category: Option<Category>,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
}

impl ProductDraft {
    /// Validate the draft and build the request body.
    ///
    /// # Errors
    ///
    /// Returns `DraftError` if the name is blank, the price is not a
    /// non-negative number, or the stock is not a non-negative integer.
    pub fn validate(&self) -> Result<NewProduct, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingName);
        }

        let price = if self.price.trim().is_empty() {
            Price::ZERO
        } else {
            Price::parse(&self.price)?
        };

        let stock_input = self.stock.trim();
        let stock = if stock_input.is_empty() {
            0
        } else {
            stock_input
                .parse::<u32>()
                .map_err(|_| DraftError::InvalidStock(stock_input.to_owned()))?
        };

        Ok(NewProduct {
            name: name.to_owned(),
            description: non_blank(&self.description),
            price,
            stock,
            image_url: non_blank(&self.image_url),
            category: self.category.clone().unwrap_or_default(),
            is_vegan: self.is_vegan,
            is_gluten_free: self.is_gluten_free,
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(name: &str, price: &str, stock: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: price.to_string(),
            stock: stock.to_string(),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_validate_ok() {
        let product = draft("  Trufa ", "1200.50", "7").validate().unwrap();
        assert_eq!(product.name, "Trufa");
        assert_eq!(product.price, Price::parse("1200.50").unwrap());
        assert_eq!(product.stock, 7);
        assert_eq!(product.category, Category::General);
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_blank_numbers_default_to_zero() {
        let product = draft("Trufa", "", " ").validate().unwrap();
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(draft("   ", "1", "1").validate(), Err(DraftError::MissingName));
    }

    #[test]
    fn test_non_numeric_input_rejected() {
        assert!(matches!(
            draft("Trufa", "mil", "1").validate(),
            Err(DraftError::InvalidPrice(PriceError::NotANumber(_)))
        ));
        assert!(matches!(
            draft("Trufa", "-3", "1").validate(),
            Err(DraftError::InvalidPrice(PriceError::Negative(_)))
        ));
        assert_eq!(
            draft("Trufa", "1", "2.5").validate(),
            Err(DraftError::InvalidStock("2.5".to_string()))
        );
        assert_eq!(
            draft("Trufa", "1", "-1").validate(),
            Err(DraftError::InvalidStock("-1".to_string()))
        );
    }

    #[test]
    fn test_overview_accepts_both_user_list_names() {
        let latest: AdminOverview = serde_json::from_value(json!({
            "counts": { "users": 3, "products": 1 },
            "latestUsers": [{ "id": 1, "email": "a@b.co", "role": "ADMIN" }],
            "products": [{ "id": 5, "name": "Trufa", "price": 1200.0, "stock": 4 }]
        }))
        .unwrap();
        assert_eq!(latest.latest_users.len(), 1);
        assert_eq!(latest.counts.users, 3);
        assert_eq!(latest.products[0].stock, Some(4));

        let legacy: AdminOverview = serde_json::from_value(json!({
            "users": [{ "id": 2, "username": "legacy" }]
        }))
        .unwrap();
        assert_eq!(legacy.latest_users[0].email, "legacy");
        assert_eq!(legacy.latest_users[0].role, Role::User);
        assert_eq!(legacy.counts, AdminCounts::default());
    }
}
