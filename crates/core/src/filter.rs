//! Catalog filter selection and canonical query strings.
//!
//! A [`CatalogQuery`] pairs the free-text search with a [`FilterSelection`]
//! and renders the `GET /products` query string. Only values that differ
//! from the defaults are serialized, so two selections that mean the same
//! thing always produce the same request.
//!
//! # Example
//!
//! ```
//! use candy_market_core::{CatalogQuery, Category, FilterSelection};
//!
//! let filters = FilterSelection::default()
//!     .with_category(Some(Category::Chocolates))
//!     .with_max_price(5000);
//! let query = CatalogQuery::new("", filters);
//!
//! assert_eq!(
//!     query.to_query_string(),
//!     "category=Chocolates&max_price=5000&sort_by=Relevancia"
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::product::Category;

/// Sort order offered by the catalog endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortMode {
    /// Newest products first.
    #[default]
    #[serde(rename = "Relevancia")]
    Relevance,
    #[serde(rename = "Precio: Menor a Mayor")]
    PriceAscending,
    #[serde(rename = "Precio: Mayor a Menor")]
    PriceDescending,
    #[serde(rename = "Nombre A-Z")]
    NameAscending,
    #[serde(rename = "Nombre Z-A")]
    NameDescending,
}

impl SortMode {
    /// All sort modes, in display order.
    pub const ALL: [Self; 5] = [
        Self::Relevance,
        Self::PriceAscending,
        Self::PriceDescending,
        Self::NameAscending,
        Self::NameDescending,
    ];

    /// The value sent as `sort_by`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "Relevancia",
            Self::PriceAscending => "Precio: Menor a Mayor",
            Self::PriceDescending => "Precio: Mayor a Menor",
            Self::NameAscending => "Nombre A-Z",
            Self::NameDescending => "Nombre Z-A",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;

    /// Accepts the wire labels as well as short aliases
    /// (`relevance`, `price-asc`, `price-desc`, `name-asc`, `name-desc`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().to_lowercase() == normalized)
            .or(match normalized.as_str() {
                "relevance" => Some(Self::Relevance),
                "price-asc" => Some(Self::PriceAscending),
                "price-desc" => Some(Self::PriceDescending),
                "name-asc" => Some(Self::NameAscending),
                "name-desc" => Some(Self::NameDescending),
                _ => None,
            })
            .ok_or_else(|| format!("invalid sort mode: {s}"))
    }
}

/// The user's current catalog filter selection.
///
/// Lives only in client memory. `category: None` is the "Todas" (all
/// categories) choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub category: Option<Category>,
    max_price: u32,
    pub vegan_only: bool,
    pub gluten_free: bool,
    pub sort: SortMode,
}

impl FilterSelection {
    /// Lower bound of the maximum-price slider.
    pub const MIN_PRICE: u32 = 3_800;
    /// Upper bound of the maximum-price slider, and its default.
    pub const MAX_PRICE: u32 = 15_000;
    /// Slider step.
    pub const PRICE_STEP: u32 = 100;
    /// Label of the "all categories" choice.
    pub const ALL_CATEGORIES: &'static str = "Todas";

    /// Current maximum price.
    #[must_use]
    pub const fn max_price(&self) -> u32 {
        self.max_price
    }

    /// Set the maximum price, clamped to the slider range and snapped down
    /// to the slider step.
    pub fn set_max_price(&mut self, value: u32) {
        let clamped = value.clamp(Self::MIN_PRICE, Self::MAX_PRICE);
        self.max_price = clamped - (clamped - Self::MIN_PRICE) % Self::PRICE_STEP;
    }

    /// Builder form of [`Self::set_max_price`].
    #[must_use]
    pub fn with_max_price(mut self, value: u32) -> Self {
        self.set_max_price(value);
        self
    }

    /// Builder form for the category.
    #[must_use]
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Builder form for the sort mode.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Parse a category choice as shown in the filter panel.
    ///
    /// "Todas" (case-insensitive) or an empty string selects all categories.
    #[must_use]
    pub fn parse_category(input: &str) -> Option<Category> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::ALL_CATEGORIES) {
            None
        } else {
            Some(Category::from(trimmed.to_string()))
        }
    }

    /// Whether every field is at its default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            category: None,
            max_price: Self::MAX_PRICE,
            vegan_only: false,
            gluten_free: false,
            sort: SortMode::default(),
        }
    }
}

/// Free-text search plus filters: everything needed to fetch the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CatalogQuery {
    text: String,
    pub filters: FilterSelection,
}

impl CatalogQuery {
    /// Create a query. Surrounding whitespace in the search text is dropped.
    #[must_use]
    pub fn new(text: &str, filters: FilterSelection) -> Self {
        Self {
            text: text.trim().to_string(),
            filters,
        }
    }

    /// The trimmed search text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the search text.
    pub fn set_text(&mut self, text: &str) {
        text.trim().clone_into(&mut self.text);
    }

    /// Query parameters in canonical order, omitting default values.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.text.is_empty() {
            params.push(("q", self.text.clone()));
        }
        if let Some(category) = &self.filters.category {
            params.push(("category", category.as_str().to_string()));
        }
        if self.filters.max_price != FilterSelection::MAX_PRICE {
            params.push(("max_price", self.filters.max_price.to_string()));
        }
        if self.filters.vegan_only {
            params.push(("vegan_only", "true".to_string()));
        }
        if self.filters.gluten_free {
            params.push(("gluten_free", "true".to_string()));
        }
        params.push(("sort_by", self.filters.sort.as_str().to_string()));
        params
    }

    /// URL-encoded query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.params() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    /// Request path for `GET /products`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/products?{}", self.to_query_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_only_sends_sort() {
        let query = CatalogQuery::default();
        assert_eq!(query.to_query_string(), "sort_by=Relevancia");
        assert_eq!(query.path(), "/products?sort_by=Relevancia");
    }

    #[test]
    fn test_category_and_max_price() {
        let filters = FilterSelection::default()
            .with_category(Some(Category::Chocolates))
            .with_max_price(5000);
        let qs = CatalogQuery::new("", filters).to_query_string();

        assert!(qs.contains("category=Chocolates&max_price=5000"));
        assert!(!qs.contains("q="));
        assert!(!qs.contains("vegan_only"));
        assert!(!qs.contains("gluten_free"));
    }

    #[test]
    fn test_all_fields_in_canonical_order() {
        let mut filters = FilterSelection::default()
            .with_category(Some(Category::Gomitas))
            .with_max_price(8000)
            .with_sort(SortMode::PriceAscending);
        filters.vegan_only = true;
        filters.gluten_free = true;

        let qs = CatalogQuery::new("  osito ", filters).to_query_string();
        assert_eq!(
            qs,
            "q=osito&category=Gomitas&max_price=8000&vegan_only=true&gluten_free=true\
             &sort_by=Precio%3A+Menor+a+Mayor"
        );
    }

    #[test]
    fn test_search_text_is_encoded() {
        let query = CatalogQuery::new("maní & sal", FilterSelection::default());
        assert_eq!(
            query.to_query_string(),
            "q=man%C3%AD+%26+sal&sort_by=Relevancia"
        );
    }

    #[test]
    fn test_whitespace_only_text_is_omitted() {
        let query = CatalogQuery::new("   ", FilterSelection::default());
        assert_eq!(query.text(), "");
        assert!(!query.to_query_string().contains("q="));
    }

    #[test]
    fn test_max_price_clamped_and_snapped() {
        let mut filters = FilterSelection::default();
        filters.set_max_price(100);
        assert_eq!(filters.max_price(), FilterSelection::MIN_PRICE);

        filters.set_max_price(99_999);
        assert_eq!(filters.max_price(), FilterSelection::MAX_PRICE);

        filters.set_max_price(5_050);
        assert_eq!(filters.max_price(), 5_000);
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(FilterSelection::parse_category("Todas"), None);
        assert_eq!(FilterSelection::parse_category(""), None);
        assert_eq!(
            FilterSelection::parse_category("Bebidas"),
            Some(Category::Bebidas)
        );
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("price-desc".parse::<SortMode>().unwrap(), SortMode::PriceDescending);
        assert_eq!("Nombre A-Z".parse::<SortMode>().unwrap(), SortMode::NameAscending);
        assert!("popular".parse::<SortMode>().is_err());
    }
}
