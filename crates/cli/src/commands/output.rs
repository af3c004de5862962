//! Terminal output and prompts.
//!
//! All printing in the CLI goes through here.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{BufRead, Write};

use candy_market_core::{AdminOverview, AdminUserBrief, Cart, Order, Product, User};
use candy_market_storefront::catalog::CatalogState;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn info(message: &str) {
    println!("{message}");
}

pub fn fail(message: &str) {
    eprintln!("Error: {message}");
}

/// Print a prompt and read one line from stdin, without the newline.
pub fn prompt(label: &str) -> std::io::Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Ask a yes/no question; anything but "s"/"si"/"y"/"yes" is no.
pub fn confirm(question: &str) -> bool {
    prompt(&format!("{question} [s/N] ")).is_ok_and(|answer| {
        matches!(
            answer.trim().to_lowercase().as_str(),
            "s" | "si" | "sí" | "y" | "yes"
        )
    })
}

pub fn user(user: &User) {
    let id = user.id.map_or_else(|| "-".to_owned(), |id| id.to_string());
    println!("{} (id {id}, rol {})", user.email, user.role);
}

pub fn products(products: &[Product]) {
    if products.is_empty() {
        println!("Sin resultados.");
        return;
    }
    for product in products {
        let mut tags = Vec::new();
        if product.is_vegan {
            tags.push("vegano");
        }
        if product.is_gluten_free {
            tags.push("sin gluten");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        println!(
            "{:>5}  {:<32} {:>12}  stock {:>4}  {}{tags}",
            product.id.as_i64(),
            product.name,
            product.price.display(),
            product.stock,
            product.category,
        );
    }
}

pub fn product_detail(product: &Product) {
    println!("{} (#{})", product.name, product.id);
    println!("  {}", product.description_or_default());
    println!("  Precio:    {}", product.price);
    println!("  Stock:     {}", product.stock);
    println!("  Categoría: {}", product.category);
    println!("  Vegano:    {}", yes_no(product.is_vegan));
    println!("  Sin gluten: {}", yes_no(product.is_gluten_free));
    if let Some(url) = &product.image_url {
        println!("  Imagen:    {url}");
    }
}

pub fn catalog_state(state: &CatalogState) {
    if state.loading {
        println!("Cargando...");
        return;
    }
    if let Some(error) = &state.error {
        eprintln!("{error}");
    }
    products(&state.products);
}

pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        println!("El carrito está vacío.");
        return;
    }
    for line in cart.lines() {
        println!(
            "{:>5}  {:<32} {:>3} x {:>10} = {:>12}",
            line.product_id.as_i64(),
            line.name,
            line.quantity,
            line.unit_price.display(),
            line.subtotal().display(),
        );
    }
    println!("Total: {} ({} unidades)", cart.total(), cart.item_count());
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("Aún no tienes pedidos.");
        return;
    }
    for order in orders {
        order_summary(order);
    }
}

pub fn order_summary(order: &Order) {
    println!(
        "Pedido #{}  {}  {}  total {}",
        order.id,
        order.created_at.format(DATE_FORMAT),
        order.status,
        order.total()
    );
    for item in &order.items {
        println!(
            "    {:>3} x {:<32} {:>10}",
            item.quantity,
            item.product_name,
            item.unit_price.display()
        );
    }
}

pub fn overview(overview: &AdminOverview) {
    println!(
        "Usuarios: {}  Productos: {}",
        overview.counts.users, overview.counts.products
    );
    println!();
    println!("Productos recientes:");
    for product in &overview.products {
        let stock = product
            .stock
            .map_or_else(|| "-".to_owned(), |s| s.to_string());
        println!(
            "{:>5}  {:<32} {:>12}  stock {stock:>4}",
            product.id.as_i64(),
            product.name,
            product.price.display()
        );
    }
    println!();
    println!("Usuarios recientes:");
    users(&overview.latest_users);
}

pub fn users(users: &[AdminUserBrief]) {
    for user in users {
        let created = user
            .created_at
            .map_or_else(|| "-".to_owned(), |at| at.format(DATE_FORMAT).to_string());
        println!(
            "{:>5}  {:<40} {:<6} {created}",
            user.id.as_i64(),
            user.email,
            user.role.to_string()
        );
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "sí" } else { "no" }
}
