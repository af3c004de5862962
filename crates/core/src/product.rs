//! Catalog products.
//!
//! The catalog service owns products; the client only ever holds a
//! read-only copy from the most recent fetch.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Product category tag.
///
/// `General` is what the server assigns when a product is created without
/// a category. Unknown tags deserialize to [`Category::Other`] so a new
/// server-side category never breaks the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    General,
    Chocolates,
    Gomitas,
    Caramelos,
    Galletas,
    Confites,
    Colombianos,
    Bebidas,
    Other(String),
}

impl Category {
    /// Categories offered in the storefront filter, in display order.
    pub const FILTERABLE: [Self; 7] = [
        Self::Chocolates,
        Self::Gomitas,
        Self::Caramelos,
        Self::Galletas,
        Self::Confites,
        Self::Colombianos,
        Self::Bebidas,
    ];

    /// The wire name of this category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::General => "General",
            Self::Chocolates => "Chocolates",
            Self::Gomitas => "Gomitas",
            Self::Caramelos => "Caramelos",
            Self::Galletas => "Galletas",
            Self::Confites => "Confites",
            Self::Colombianos => "Colombianos",
            Self::Bebidas => "Bebidas",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "General" => Self::General,
            "Chocolates" => Self::Chocolates,
            "Gomitas" => Self::Gomitas,
            "Caramelos" => Self::Caramelos,
            "Galletas" => Self::Galletas,
            "Confites" => Self::Confites,
            "Colombianos" => Self::Colombianos,
            "Bebidas" => Self::Bebidas,
            _ => Self::Other(value),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Product {
    /// Description for display, falling back to a placeholder when absent.
    #[must_use]
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("Sin descripción")
    }

    /// Whether any units are left.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Body of `POST /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub stock: u32,
    pub image_url: Option<String>,
    pub category: Category,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
}

/// Body of `PUT /products/{id}`.
///
/// Only fields that are `Some` are sent; the server leaves the rest as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_gluten_free: Option<bool>,
}

impl ProductUpdate {
    /// Whether the update carries no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image_url.is_none()
            && self.category.is_none()
            && self.is_vegan.is_none()
            && self.is_gluten_free.is_none()
    }
}
