//! Live catalog tests.
//!
//! These tests require the API running at `CANDY_API_URL` with at least one
//! product seeded.

use candy_market_core::{CatalogQuery, FilterSelection, ProductId, SortMode};
use candy_market_integration_tests::gateway;
use candy_market_storefront::ApiError;
use candy_market_storefront::catalog::{PRODUCT_NOT_FOUND, fetch_catalog, fetch_product, product_error_message};

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_default_catalog_lists_products() {
    let gateway = gateway();

    let products = fetch_catalog(&gateway, &CatalogQuery::default())
        .await
        .expect("Failed to fetch catalog");

    assert!(!products.is_empty(), "Seeded catalog should not be empty");
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_price_ascending_sort_is_respected() {
    let gateway = gateway();
    let filters = FilterSelection::default().with_sort(SortMode::PriceAscending);

    let products = fetch_catalog(&gateway, &CatalogQuery::new("", filters))
        .await
        .expect("Failed to fetch sorted catalog");

    assert!(
        products.windows(2).all(|pair| match pair {
            [a, b] => a.price <= b.price,
            _ => true,
        }),
        "Products should be ordered by price"
    );
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_max_price_filter_bounds_results() {
    let gateway = gateway();
    let filters = FilterSelection::default().with_max_price(5000);

    let products = fetch_catalog(&gateway, &CatalogQuery::new("", filters))
        .await
        .expect("Failed to fetch filtered catalog");

    let bound = candy_market_core::Price::from_units(5000);
    assert!(products.iter().all(|p| p.price <= bound));
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_product_detail_matches_listing() {
    let gateway = gateway();
    let listed = fetch_catalog(&gateway, &CatalogQuery::default())
        .await
        .expect("Failed to fetch catalog");
    let first = listed.first().expect("Seeded catalog should not be empty");

    let product = fetch_product(&gateway, first.id)
        .await
        .expect("Failed to fetch product");

    assert_eq!(product.id, first.id);
    assert_eq!(product.name, first.name);
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_missing_product_reports_not_found() {
    let gateway = gateway();

    let err: ApiError = fetch_product(&gateway, ProductId::new(i64::from(i32::MAX)))
        .await
        .expect_err("Product should not exist");

    assert_eq!(err.status(), Some(404));
    assert_eq!(product_error_message(&err), PRODUCT_NOT_FOUND);
}
