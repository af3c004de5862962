//! Command implementations.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod output;
pub mod shop;

use std::sync::Arc;

use candy_market_core::ProductId;
use candy_market_storefront::{HttpGateway, Session, StorefrontConfig};

/// Everything a command needs: configuration, the API gateway and the
/// restored session.
pub struct Context {
    pub config: StorefrontConfig,
    pub gateway: Arc<HttpGateway>,
    pub session: Session,
}

/// Parse an `ID` or `ID:QTY` order item.
pub fn parse_item(input: &str) -> Result<(ProductId, u32), String> {
    let (id, quantity) = input.split_once(':').unwrap_or((input, "1"));
    let id = id
        .parse::<ProductId>()
        .map_err(|_| format!("ID de producto inválido: '{id}'"))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| format!("Cantidad inválida: '{quantity}'"))?;
    Ok((id, quantity))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("3").unwrap(), (ProductId::new(3), 1));
        assert_eq!(parse_item("3:4").unwrap(), (ProductId::new(3), 4));
        assert!(parse_item("x:1").is_err());
        assert!(parse_item("3:0").is_err());
        assert!(parse_item("3:-1").is_err());
    }
}
