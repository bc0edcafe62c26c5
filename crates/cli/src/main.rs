//! Recshop CLI - talk to the Recshop API from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! recshop products
//! recshop recommendations --user 3 --method hybrid --product-id 12
//!
//! # Cart
//! recshop cart add 12
//! recshop cart list
//!
//! # Account
//! recshop register --username ada --email ada@example.com --password secret
//! recshop login --email ada@example.com --password secret --print-cookie
//! recshop logout
//! ```
//!
//! `RECSHOP_API_URL` selects the API. `RECSHOP_API_COOKIE` (or `--cookie`)
//! replays a session cookie obtained from `login`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use recshop_core::{ProductId, RecommendationMethod, UserId};

mod commands;

use commands::{Connection, account, shop};

#[derive(Parser)]
#[command(name = "recshop")]
#[command(author, version, about = "Recshop CLI tools")]
struct Cli {
    /// Session cookie to send with each request
    #[arg(long, global = true, env = "RECSHOP_API_COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products,
    /// List recommendations for a user
    Recommendations {
        /// User to recommend for
        #[arg(short, long, default_value_t = 1)]
        user: i64,

        /// Scoring method (`hybrid` or `collaborative`)
        #[arg(short, long)]
        method: Option<RecommendationMethod>,

        /// Seed product for content-based scoring
        #[arg(short, long)]
        product_id: Option<i64>,
    },
    /// Check whether the API accepts the session
    Probe {
        /// User id to probe with
        #[arg(short, long, default_value_t = 1)]
        user: i64,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Log in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Show the session cookie for use as `RECSHOP_API_COOKIE`
        #[arg(long)]
        print_cookie: bool,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// End the API session
    Logout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product to add
        product_id: i64,
    },
    /// List the cart
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = match &cli.command {
        Commands::Recommendations { user, .. } | Commands::Probe { user } => UserId::new(*user),
        _ => UserId::new(1),
    };
    let conn = Connection::from_env(user_id, cli.cookie)?;

    match cli.command {
        Commands::Products => shop::products(&conn).await?,
        Commands::Recommendations {
            user,
            method,
            product_id,
        } => {
            shop::recommendations(
                &conn,
                UserId::new(user),
                method,
                product_id.map(ProductId::new),
            )
            .await?;
        }
        Commands::Probe { user } => shop::probe(&conn, UserId::new(user)).await?,
        Commands::Cart { action } => match action {
            CartAction::Add { product_id } => {
                shop::cart_add(&conn, ProductId::new(product_id)).await?;
            }
            CartAction::List => shop::cart_list(&conn).await?,
        },
        Commands::Login {
            email,
            password,
            print_cookie,
        } => account::login(&conn, email, password, print_cookie).await?,
        Commands::Register {
            username,
            email,
            password,
        } => account::register(&conn, username, email, password).await?,
        Commands::Logout => account::logout(&conn).await?,
    }
    Ok(())
}
