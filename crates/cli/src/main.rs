//! Category display CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cd-cli migrate
//!
//! # Create an admin account (prints its access token once)
//! cd-cli admin create -l ops -n "Ops Team" -r admin
//!
//! # Import the category catalog
//! cd-cli seed categories -f categories.yaml --clear
//!
//! # Print the rendered category display fragment
//! cd-cli render
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin accounts
//! - `seed categories` - Upsert product categories from YAML
//! - `render` - Render the category display fragment to stdout

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cd-cli")]
#[command(author, version, about = "Category display CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Print the rendered category display fragment
    Render,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login name
        #[arg(short, long)]
        login: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`super_admin`, `admin`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert product categories from a YAML file
    Categories {
        /// Path to the YAML file
        #[arg(short, long)]
        file: String,

        /// Delete every existing category first
        #[arg(long)]
        clear: bool,
    },
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
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { login, name, role } => {
                commands::admin::create_user(&login, &name, &role).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Categories { file, clear } => {
                commands::seed::categories(&file, clear).await?;
            }
        },
        Commands::Render => commands::render::run().await?,
    }
    Ok(())
}
