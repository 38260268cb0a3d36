//! Aiza Tasty CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply migrations and create the session table
//! aiza-cli migrate
//!
//! # Create a superuser for the dashboard
//! aiza-cli user create -u aiza -p 'a long password' --superuser
//!
//! # Load the sample catalog
//! aiza-cli seed
//! ```
//!
//! All commands read `DATABASE_URL` (a `.env` file is honoured).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CommandError;
use commands::user::Role;

#[derive(Parser)]
#[command(name = "aiza-cli")]
#[command(author, version, about = "Aiza Tasty CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage site accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Insert a sample catalog into an empty database
    Seed,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Password (at least 8 characters, not all digits)
        #[arg(short, long)]
        password: String,

        /// Allow the account into the admin dashboard
        #[arg(long)]
        staff: bool,

        /// Grant superuser rights (implies --staff)
        #[arg(long)]
        superuser: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let pool = commands::connect().await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
                staff,
                superuser,
            } => {
                commands::user::create(
                    &pool,
                    &username,
                    email.as_deref(),
                    &password,
                    Role { staff, superuser },
                )
                .await?;
            }
        },
        Commands::Seed => {
            let inserted = commands::seed::catalog(&pool).await?;
            tracing::info!(products = inserted, "Seed complete");
        }
    }
    Ok(())
}
