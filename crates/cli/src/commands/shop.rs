//! Interactive storefront.
//!
//! Search and filter edits go through the debounced [`SearchController`];
//! the catalog is reprinted whenever a fetch completes. Cart commands act on
//! the [`OrderPanel`] cart and `order` submits it.

use std::error::Error;
use std::sync::Arc;

use candy_market_core::{FilterSelection, ProductId, SortMode};
use candy_market_storefront::HttpGateway;
use candy_market_storefront::orders::OrderPanel;
use candy_market_storefront::search::SearchController;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{Context, output};

const HELP: &str = "\
Búsqueda:  search TEXT | category NAME|Todas | max N | vegan | gluten | sort MODE | now | list
Carrito:   add ID | inc ID | dec ID | rm ID | cart | order
Cuenta:    orders
Otros:     help | quit";

enum Flow {
    Continue,
    Quit,
}

pub async fn run(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut search = SearchController::new(Arc::clone(&ctx.gateway), ctx.config.search_debounce);
    let mut panel = OrderPanel::new(Arc::clone(&ctx.gateway));

    if ctx.session.is_authenticated()
        && let Err(e) = panel.load(&ctx.session).await
    {
        output::fail(&e.to_string());
    }

    let mut updates = search.subscribe();
    search.mount();
    output::info(HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if !state.loading {
                    output::catalog_state(&state);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if let Flow::Quit = handle(line.trim(), ctx, &mut search, &mut panel).await {
                    break;
                }
            }
        }
    }

    search.teardown();
    Ok(())
}

async fn handle(
    input: &str,
    ctx: &Context,
    search: &mut SearchController<HttpGateway>,
    panel: &mut OrderPanel<HttpGateway>,
) -> Flow {
    let (command, arg) = input.split_once(' ').unwrap_or((input, ""));
    let arg = arg.trim();

    match command {
        "" => {}
        "help" | "?" => output::info(HELP),
        "quit" | "exit" => return Flow::Quit,

        "search" => search.set_text(arg),
        "category" => {
            let category = FilterSelection::parse_category(arg);
            search.update_filters(|f| f.category = category);
        }
        "max" => match arg.parse::<u32>() {
            Ok(value) => {
                search.update_filters(|f| f.set_max_price(value));
                output::info(&format!(
                    "Precio máximo: {}",
                    search.query().filters.max_price()
                ));
            }
            Err(_) => output::fail("Uso: max N"),
        },
        "vegan" => search.update_filters(|f| f.vegan_only = !f.vegan_only),
        "gluten" => search.update_filters(|f| f.gluten_free = !f.gluten_free),
        "sort" => match arg.parse::<SortMode>() {
            Ok(sort) => search.update_filters(|f| f.sort = sort),
            Err(e) => output::fail(&e),
        },
        "now" => search.search_now(),
        "list" => output::catalog_state(&search.state()),

        "add" | "inc" | "dec" | "rm" => match arg.parse::<ProductId>() {
            Ok(id) => {
                cart_command(command, id, search, panel);
                output::cart(panel.cart());
            }
            Err(_) => output::fail(&format!("Uso: {command} ID")),
        },
        "cart" => output::cart(panel.cart()),
        "order" => match panel.place_order(&ctx.session).await {
            Ok(order) => {
                output::info("Pedido creado.");
                output::order_summary(&order);
            }
            Err(e) => output::fail(&e.to_string()),
        },
        "orders" => match panel.load(&ctx.session).await {
            Ok(()) => output::orders(panel.orders()),
            Err(e) => output::fail(&e.to_string()),
        },

        other => output::fail(&format!("Comando desconocido: {other}. Escribe 'help'.")),
    }
    Flow::Continue
}

fn cart_command(
    command: &str,
    id: ProductId,
    search: &SearchController<HttpGateway>,
    panel: &mut OrderPanel<HttpGateway>,
) {
    match command {
        "add" => {
            // Prefer the product as currently shown in the search results
            if let Some(product) = search.state().product(id) {
                panel.add_product(product);
            } else if !panel.add_to_cart(id) {
                output::fail(&format!("El producto {id} no está en el catálogo"));
            }
        }
        "inc" => panel.increment(id),
        "dec" => panel.decrement(id),
        _ => panel.remove(id),
    }
}
