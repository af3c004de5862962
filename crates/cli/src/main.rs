//! Candy Market CLI - browse the catalog, manage a cart, place orders and
//! administer products from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept in CANDY_SESSION_PATH)
//! candy login -e ana@example.com
//!
//! # Search the catalog
//! candy products --q trufa --category Chocolates --max-price 5000 --sort price-asc
//!
//! # Place an order: two of product 3, one of product 7
//! candy orders place --item 3:2 --item 7
//!
//! # Interactive session with debounced search and a cart
//! candy shop
//!
//! # Admin
//! candy admin overview
//! candy admin delete 12
//! ```
//!
//! # Commands
//!
//! - `login`, `register`, `logout`, `whoami` - Session management
//! - `products`, `product` - Catalog reads
//! - `orders list`, `orders place` - Order history and checkout
//! - `admin` - Catalog management (requires the `ADMIN` role)
//! - `shop` - Interactive storefront

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use candy_market_storefront::{FileSessionStorage, HttpGateway, Session, StorefrontConfig};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "candy")]
#[command(author, version, about = "Candy Market storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        /// Password (prompted for if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Log in right after registering
        #[arg(long)]
        login: bool,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user, checked against the server
    Whoami,
    /// Search the catalog
    Products(commands::catalog::SearchArgs),
    /// Show one product
    Product {
        id: i64,
    },
    /// Order history and checkout
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Catalog management
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Interactive storefront session
    Shop,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Place an order
    Place {
        /// Product and quantity as `ID` or `ID:QTY` (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Counts, newest products and newest users
    Overview,
    /// List users
    Users {
        /// Filter by email
        #[arg(long)]
        q: Option<String>,

        #[arg(long, default_value_t = 20)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Create a product
    Create(commands::admin::CreateArgs),
    /// Delete a product
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Errors and warnings become Sentry events, info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            commands::output::fail(&format!("Configuración inválida: {e}"));
            std::process::exit(2);
        }
    };

    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "candy_market=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::debug!("Command failed: {e}");
        commands::output::fail(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = Arc::new(HttpGateway::new(&config)?);
    let session = Session::restore(FileSessionStorage::new(&config.session_path));
    let mut ctx = Context {
        config,
        gateway,
        session,
    };

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&mut ctx, &email, password).await?;
        }
        Commands::Register {
            email,
            password,
            login,
        } => commands::auth::register(&mut ctx, &email, &password, login).await?,
        Commands::Logout => commands::auth::logout(&mut ctx)?,
        Commands::Whoami => commands::auth::whoami(&mut ctx).await?,
        Commands::Products(args) => commands::catalog::search(&ctx, &args).await?,
        Commands::Product { id } => commands::catalog::show(&ctx, id).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&ctx).await?,
            OrdersAction::Place { items } => commands::orders::place(&ctx, &items).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Overview => commands::admin::overview(&ctx).await?,
            AdminAction::Users { q, limit, offset } => {
                commands::admin::users(&ctx, q.as_deref(), limit, offset).await?;
            }
            AdminAction::Create(args) => commands::admin::create(&ctx, args).await?,
            AdminAction::Delete { id, yes } => commands::admin::delete(&ctx, id, yes).await?,
        },
        Commands::Shop => commands::shop::run(&ctx).await?,
    }
    Ok(())
}
