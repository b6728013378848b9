//! CLI administration tool for short-url.
//!
//! Provides commands for viewing statistics, inspecting links and purging
//! expired links without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Delete expired links (asks for confirmation unless -y)
//! cargo run --bin admin -- cleanup -y
//!
//! # List links created in a time window
//! cargo run --bin admin -- links --from 2026-01-01T00:00:00Z --limit 20
//!
//! # Show one link
//! cargo run --bin admin -- info aB3xY9
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use short_url::config::Config;
use short_url::domain::entities::{Link, LinkStatus};
use short_url::domain::repositories::LinkRepository;
use short_url::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing short-url.
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
    /// Show aggregate statistics
    Stats,

    /// Delete links whose expiry is in the past
    Cleanup {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List links created within a time range, newest first
    Links {
        /// Range start (RFC 3339), defaults to the Unix epoch
        #[arg(long)]
        from: Option<DateTime<Utc>>,

        /// Range end (RFC 3339), defaults to now
        #[arg(long)]
        to: Option<DateTime<Utc>>,

        #[arg(long, default_value_t = 50)]
        limit: i64,

        #[arg(long, default_value_t = 0)]
        offset: i64,
    },

    /// Show metadata for one short code
    Info {
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::Stats => handle_stats(&repo).await?,
        Commands::Cleanup { yes } => handle_cleanup(&repo, yes).await?,
        Commands::Links {
            from,
            to,
            limit,
            offset,
        } => handle_links(&repo, from, to, limit, offset).await?,
        Commands::Info { code } => handle_info(&repo, &code).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Displays aggregate counts, classified against the current time.
async fn handle_stats(repo: &PgLinkRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = repo
        .aggregate_stats(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Links:     {}",
        stats.total_links.to_string().bright_green().bold()
    );
    println!(
        "  Accesses:  {}",
        stats.total_accesses.to_string().bright_green().bold()
    );
    println!("  Active:    {}", stats.active_links.to_string().green());
    println!("  Expired:   {}", stats.expired_links.to_string().yellow());
    println!(
        "  Permanent: {}",
        stats.permanent_links().to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Purges expired links after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes`
/// - Shows how many links are expired before asking
async fn handle_cleanup(repo: &PgLinkRepository, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Cleanup expired links".bright_blue().bold());
    println!();

    let stats = repo
        .aggregate_stats(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if stats.expired_links == 0 {
        println!("{}", "✨ Nothing to clean up".green());
        return Ok(());
    }

    println!(
        "  Expired links: {}",
        stats.expired_links.to_string().yellow().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete expired links: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Deleted".green().bold(),
        format!("{deleted} link(s)").bright_white()
    );
    println!();

    Ok(())
}

/// Lists links in a creation-time window.
async fn handle_links(
    repo: &PgLinkRepository,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    limit: i64,
    offset: i64,
) -> Result<()> {
    let from = from.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let to = to.unwrap_or_else(Utc::now);

    if from > to {
        anyhow::bail!("--from must not be after --to");
    }
    if limit <= 0 || offset < 0 {
        anyhow::bail!("--limit must be positive and --offset non-negative");
    }

    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links = repo
        .list_by_time_range(from, to, limit, offset)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links in range".yellow());
        println!();
        return Ok(());
    }

    let now = Utc::now();
    for link in &links {
        let status = match link.status_at(now) {
            LinkStatus::Active => "ACTIVE".green(),
            LinkStatus::Expired => "EXPIRED".red(),
        };

        println!(
            "  {:<20} {:<17} {:>8} {:<8} {}",
            link.code.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.access_count,
            status,
            link.target_url
        );
    }

    println!();
    println!(
        "  Shown: {}",
        links.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Prints full metadata for a single code.
async fn handle_info(repo: &PgLinkRepository, code: &str) -> Result<()> {
    let link = repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short link not found")?;

    print_link(&link);
    Ok(())
}

fn print_link(link: &Link) {
    println!("{}", "ℹ️  Link".bright_blue().bold());
    println!();
    println!("  Code:     {}", link.code.cyan());
    println!("  Target:   {}", link.target_url);
    println!("  Accesses: {}", link.access_count.to_string().bright_white());
    println!(
        "  Created:  {}",
        link.created_at.to_rfc3339().bright_black()
    );
    match (link.expires_at, link.status_at(Utc::now())) {
        (Some(expires_at), LinkStatus::Expired) => {
            println!("  Expires:  {} {}", expires_at.to_rfc3339(), "(expired)".red())
        }
        (Some(expires_at), LinkStatus::Active) => {
            println!("  Expires:  {}", expires_at.to_rfc3339())
        }
        (None, _) => println!("  Expires:  {}", "never".bright_black()),
    }
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
