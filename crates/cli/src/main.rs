//! Local Shop CLI - store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create a user in a file-backed store
//! shop-cli --data ./shop.json user create -n "Jane Doe" -e jane@test.com -p secret1
//!
//! # Add an address for user 1
//! shop-cli --data ./shop.json address add -u 1 --title Home --street "12 Elm Street" \
//!     --city Austin --state TX --zip 73301 --country US
//!
//! # Manage the catalog
//! shop-cli --data ./shop.json category create Toys
//! shop-cli --data ./shop.json product add -n "Wooden Train" --price 24.50 -c 6
//!
//! # Simple string hash
//! shop-cli hash hello
//! ```
//!
//! # Commands
//!
//! - `user` - Create, inspect, update and remove users; log in
//! - `address` - Manage a user's addresses
//! - `category` - Manage product categories
//! - `product` - Manage the product catalog
//! - `hash` - Print the simple hash of a string
//!
//! Without `--data` (or `SHOP_DATA_PATH`) the store lives in memory and is
//! discarded on exit.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use local_shop_core::{AddressId, CategoryId, CurrencyCode, ProductId, UserId};
use local_shop_storefront::{ShopState, StoreConfig};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Local Shop CLI tools")]
struct Cli {
    /// JSON file backing the store (overrides `SHOP_DATA_PATH`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage a user's addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Manage product categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage the product catalog
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Print the simple (non-cryptographic) hash of a string
    Hash {
        text: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new user
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// `admin` or `client`
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Show one user
    Show { id: UserId },
    /// List every user
    List,
    /// Update fields of a user
    Update {
        id: UserId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Remove a user (addresses are kept)
    Remove { id: UserId },
    /// Log in and persist the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum AddressAction {
    /// Add an address for a user
    Add {
        #[arg(short, long)]
        user: UserId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: String,
        #[arg(long)]
        country: String,
        /// `shipping`, `billing` or `both`
        #[arg(long = "type", default_value = "shipping")]
        address_type: String,
        /// Make this the user's default address
        #[arg(long)]
        default: bool,
    },
    /// List a user's addresses
    List {
        #[arg(short, long)]
        user: UserId,
    },
    /// Make an address the user's default
    Default {
        #[arg(short, long)]
        user: UserId,
        id: AddressId,
    },
    /// Remove an address
    Remove {
        #[arg(short, long)]
        user: UserId,
        id: AddressId,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List,
    /// Create a category
    Create { name: String },
    /// Rename a category
    Rename { id: CategoryId, name: String },
    /// Delete a category
    Delete { id: CategoryId },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value = "USD")]
        currency: CurrencyCode,
        #[arg(short, long)]
        category: Option<CategoryId>,
        #[arg(long, default_value_t = 0)]
        stock: u32,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List products, optionally filtered
    List {
        #[arg(short, long)]
        category: Option<CategoryId>,
        /// Case-insensitive text search over name and description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Remove a product
    Remove { id: ProductId },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "local_shop_storefront=info,local_shop_cli=info".into());

    // Machine-readable output for scripts, text otherwise
    let json = std::env::var("SHOP_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Hash { text } = &cli.command {
        commands::hash(text);
        return Ok(());
    }

    let mut config = StoreConfig::from_env()?;
    if let Some(path) = cli.data {
        config.data_path = Some(path);
    }
    let state = ShopState::new(config)?;

    match cli.command {
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
                role,
            } => commands::user::create(&state, name, email, password, role)?,
            UserAction::Show { id } => commands::user::show(&state, id)?,
            UserAction::List => commands::user::list(&state)?,
            UserAction::Update {
                id,
                name,
                email,
                password,
                role,
            } => commands::user::update(&state, id, name, email, password, role)?,
            UserAction::Remove { id } => commands::user::remove(&state, id)?,
            UserAction::Login { email, password } => {
                commands::user::login(&state, &email, &password).await?;
            }
        },
        Commands::Address { action } => match action {
            AddressAction::Add {
                user,
                title,
                street,
                city,
                state: region,
                zip,
                country,
                address_type,
                default,
            } => {
                let request = local_shop_storefront::models::CreateAddressRequest {
                    title,
                    street,
                    city,
                    state: region,
                    zip_code: zip,
                    country,
                    address_type,
                    is_default: default.then_some(true),
                };
                commands::address::add(&state, user, &request)?;
            }
            AddressAction::List { user } => commands::address::list(&state, user)?,
            AddressAction::Default { user, id } => {
                commands::address::set_default(&state, user, id)?;
            }
            AddressAction::Remove { user, id } => commands::address::remove(&state, user, id)?,
        },
        Commands::Category { action } => match action {
            CategoryAction::List => commands::category::list(&state)?,
            CategoryAction::Create { name } => commands::category::create(&state, &name)?,
            CategoryAction::Rename { id, name } => commands::category::rename(&state, id, &name)?,
            CategoryAction::Delete { id } => commands::category::delete(&state, id)?,
        },
        Commands::Product { action } => match action {
            ProductAction::Add {
                name,
                price,
                currency,
                category,
                stock,
                description,
            } => {
                let request = local_shop_storefront::models::CreateProductRequest {
                    name,
                    description,
                    price,
                    currency,
                    category_id: category,
                    stock,
                    image_url: None,
                };
                commands::product::add(&state, &request)?;
            }
            ProductAction::List { category, search } => {
                commands::product::list(&state, category, search.as_deref())?;
            }
            ProductAction::Remove { id } => commands::product::remove(&state, id)?,
        },
        Commands::Hash { .. } => {}
    }
    Ok(())
}
