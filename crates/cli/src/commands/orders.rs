//! Order commands.

use std::error::Error;
use std::sync::Arc;

use candy_market_storefront::orders::OrderPanel;

use super::{Context, output, parse_item};

pub async fn list(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut panel = OrderPanel::new(Arc::clone(&ctx.gateway));
    panel.load(&ctx.session).await?;
    output::orders(panel.orders());
    Ok(())
}

/// Build a cart from `ID[:QTY]` items and submit it.
pub async fn place(ctx: &Context, items: &[String]) -> Result<(), Box<dyn Error>> {
    let items = items
        .iter()
        .map(|item| parse_item(item))
        .collect::<Result<Vec<_>, _>>()?;

    let mut panel = OrderPanel::new(Arc::clone(&ctx.gateway));
    panel.load(&ctx.session).await?;

    for (id, quantity) in items {
        if !panel.add_to_cart(id) {
            return Err(format!("El producto {id} no existe").into());
        }
        for _ in 1..quantity {
            panel.increment(id);
        }
    }

    output::cart(panel.cart());
    let order = panel.place_order(&ctx.session).await?;
    output::info("Pedido creado.");
    output::order_summary(&order);
    Ok(())
}
