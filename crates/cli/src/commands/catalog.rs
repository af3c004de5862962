//! Catalog commands.

use std::error::Error;

use candy_market_core::{CatalogQuery, FilterSelection, ProductId, SortMode};
use candy_market_storefront::catalog::{self, CATALOG_FAILED, product_error_message};
use candy_market_storefront::error::user_message;
use clap::Args;

use super::{Context, output};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text search
    #[arg(long)]
    pub q: Option<String>,

    /// Category, or "Todas" for all
    #[arg(long)]
    pub category: Option<String>,

    /// Maximum price (3800 to 15000, step 100)
    #[arg(long)]
    pub max_price: Option<u32>,

    /// Only vegan products
    #[arg(long)]
    pub vegan: bool,

    /// Only gluten-free products
    #[arg(long)]
    pub gluten_free: bool,

    /// Sort order: relevance, price-asc, price-desc, name-asc, name-desc
    #[arg(long)]
    pub sort: Option<SortMode>,
}

impl SearchArgs {
    fn to_query(&self) -> CatalogQuery {
        let mut filters = FilterSelection::default()
            .with_category(
                self.category
                    .as_deref()
                    .and_then(FilterSelection::parse_category),
            )
            .with_sort(self.sort.unwrap_or_default());
        if let Some(max_price) = self.max_price {
            filters.set_max_price(max_price);
        }
        filters.vegan_only = self.vegan;
        filters.gluten_free = self.gluten_free;
        CatalogQuery::new(self.q.as_deref().unwrap_or_default(), filters)
    }
}

pub async fn search(ctx: &Context, args: &SearchArgs) -> Result<(), Box<dyn Error>> {
    let query = args.to_query();
    let products = catalog::fetch_catalog(ctx.gateway.as_ref(), &query)
        .await
        .map_err(|e| user_message(CATALOG_FAILED, &e))?;
    output::products(&products);
    Ok(())
}

pub async fn show(ctx: &Context, id: i64) -> Result<(), Box<dyn Error>> {
    let product = catalog::fetch_product(ctx.gateway.as_ref(), ProductId::new(id))
        .await
        .map_err(|e| product_error_message(&e))?;
    output::product_detail(&product);
    Ok(())
}
