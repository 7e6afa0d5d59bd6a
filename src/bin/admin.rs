//! CLI administration tool for shortlink-tracker.
//!
//! Mints bearer tokens, toggles link status and inspects the database
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue a token for a user (24h by default)
//! cargo run --bin admin -- token issue --user 0192e8a4-0000-7000-8000-000000000001
//!
//! # Issue an admin token valid for one hour
//! cargo run --bin admin -- token issue --user <uuid> --admin --ttl-hours 1
//!
//! # Stop a link from redirecting, then restore it
//! cargo run --bin admin -- link suspend 0Ab3xYz
//! cargo run --bin admin -- link activate 0Ab3xYz
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `JWT_SECRET` (required for `token`): HS256 signing key shared with the server
//! - `DATABASE_URL` or `DB_*` (required for `link` and `db`)

use shortlink_tracker::application::services::AuthService;
use shortlink_tracker::config::{Config, mask_connection_string};
use shortlink_tracker::domain::entities::{LinkStatus, Role};
use shortlink_tracker::utils::code_generator::is_short_code;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use uuid::Uuid;

/// CLI tool for managing shortlink-tracker.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Mint bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Change link status
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a signed JWT for a user
    Issue {
        /// User id the token acts for
        #[arg(short, long)]
        user: Uuid,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,

        /// Validity in hours
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(i64).range(1..=8760))]
        ttl_hours: i64,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Stop a link from redirecting
    Suspend { code: String },

    /// Let a suspended link redirect again
    Activate { code: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { action } => handle_token_action(action)?,
        Commands::Link { action } => handle_link_action(action, &connect().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })
}

fn handle_token_action(action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Issue {
            user,
            admin,
            ttl_hours,
        } => issue_token(user, admin, ttl_hours),
    }
}

/// Signs a token with `JWT_SECRET` and prints it with a usage example.
fn issue_token(user: Uuid, admin: bool, ttl_hours: i64) -> Result<()> {
    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    if secret.trim().is_empty() {
        bail!("JWT_SECRET must not be empty");
    }

    let role = if admin { Role::Admin } else { Role::User };
    let token = AuthService::new(&secret)
        .issue(user, role, chrono::Duration::hours(ttl_hours))
        .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))?;

    println!("{}", "Token issued".bright_blue().bold());
    println!();
    println!("  User:    {}", user.to_string().cyan());
    println!(
        "  Role:    {}",
        match role {
            Role::Admin => "admin".red().bold(),
            Role::User => "user".green(),
        }
    );
    println!("  Expires: in {} hour(s)", ttl_hours.to_string().bright_white());
    println!();
    println!("{}", token.bright_yellow());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/v1/url",
        token.bright_yellow()
    );
    println!();

    Ok(())
}

async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let (code, status) = match action {
        LinkAction::Suspend { code } => (code, LinkStatus::Suspended),
        LinkAction::Activate { code } => (code, LinkStatus::Active),
    };

    if !is_short_code(&code) {
        bail!("'{}' is not a valid short code", code);
    }

    let updated = sqlx::query(
        "UPDATE short_links SET status = $1, updated_at = NOW() \
         WHERE short_code = $2 AND deleted_at IS NULL",
    )
    .bind(status.as_str())
    .bind(&code)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        bail!("No live link with code '{}'", code);
    }

    println!(
        "{} {} is now {}",
        "Link".bright_white(),
        code.cyan(),
        status.as_str().bold()
    );

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let links_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM short_links WHERE deleted_at IS NULL")
                    .fetch_one(pool)
                    .await?;

            let logs_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM click_logs WHERE deleted_at IS NULL")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Live links:      {}",
                links_count.to_string().bright_green().bold()
            );
            println!(
                "  Live click logs: {}",
                logs_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
