//! Admin commands.

use std::error::Error;
use std::sync::Arc;

use candy_market_admin::{AdminPanel, AssumeYes, UserQuery};
use candy_market_core::{FilterSelection, ProductDraft, ProductId};
use clap::Args;

use super::{Context, output};

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Unit price; blank means 0
    #[arg(long, default_value = "")]
    pub price: String,

    /// Units in stock; blank means 0
    #[arg(long, default_value = "")]
    pub stock: String,

    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Defaults to "General" on the server
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub vegan: bool,

    #[arg(long)]
    pub gluten_free: bool,
}

impl From<CreateArgs> for ProductDraft {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            stock: args.stock,
            image_url: args.image_url,
            category: args
                .category
                .as_deref()
                .and_then(FilterSelection::parse_category),
            is_vegan: args.vegan,
            is_gluten_free: args.gluten_free,
        }
    }
}

pub async fn overview(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut panel = AdminPanel::new(Arc::clone(&ctx.gateway));
    let overview = panel.load(&ctx.session).await?;
    output::overview(overview);
    Ok(())
}

pub async fn users(
    ctx: &Context,
    q: Option<&str>,
    limit: u32,
    offset: u32,
) -> Result<(), Box<dyn Error>> {
    let query = UserQuery::default()
        .with_search(q.unwrap_or_default())
        .with_limit(limit)
        .with_offset(offset);
    let mut panel = AdminPanel::new(Arc::clone(&ctx.gateway));
    let users = panel.list_users(&ctx.session, &query).await?;
    output::users(&users);
    Ok(())
}

pub async fn create(ctx: &Context, args: CreateArgs) -> Result<(), Box<dyn Error>> {
    let mut draft = ProductDraft::from(args);
    let mut panel = AdminPanel::new(Arc::clone(&ctx.gateway));
    let product = panel.create_product(&ctx.session, &mut draft).await?;
    output::info("Producto creado.");
    output::product_detail(&product);
    Ok(())
}

/// Delete a product, asking on stdin unless `yes` is set.
pub async fn delete(ctx: &Context, id: i64, yes: bool) -> Result<(), Box<dyn Error>> {
    let id = ProductId::new(id);
    let mut panel = AdminPanel::new(Arc::clone(&ctx.gateway));

    let deleted = if yes {
        panel.delete_product(&ctx.session, id, &AssumeYes).await?
    } else {
        panel
            .delete_product(&ctx.session, id, &output::confirm)
            .await?
    };

    output::info(if deleted {
        "Producto eliminado."
    } else {
        "Cancelado."
    });
    Ok(())
}
