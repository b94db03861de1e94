//! CLI administration tool for link-shortcut.
//!
//! Manages stored links and checks the database without going through the
//! HTTP API. Uses the same configuration and [`LinkManager`] as the server,
//! so hashing settings must match the running service.
//!
//! # Usage
//!
//! ```bash
//! # Count and list links
//! cargo run --bin admin -- links count
//! cargo run --bin admin -- links list --skip 10 --take 20
//!
//! # Add a link
//! cargo run --bin admin -- links add example.com --name "Example"
//!
//! # Resolve a hash prefix (records an access)
//! cargo run --bin admin -- links show roF3S
//!
//! # Delete a link
//! cargo run --bin admin -- links delete-hash roF3S
//! cargo run --bin admin -- links delete-url example.com --yes
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`link_shortcut::config`]. `STORAGE` must be
//! `postgres`.

use link_shortcut::application::services::LinkManager;
use link_shortcut::config::{self, Config, StorageBackend};
use link_shortcut::domain::entities::LinkRecord;
use link_shortcut::domain::repositories::LinkRepository;
use link_shortcut::infrastructure::persistence::PgLinkRepository;
use link_shortcut::server::connect_database;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use futures::StreamExt;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortcut.
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
    /// Manage stored links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// Show the number of stored links
    Count,

    /// List links in creation order
    List {
        /// Number of links to skip
        #[arg(short, long, default_value_t = 0)]
        skip: i64,

        /// Number of links to show (negative for all)
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        take: i64,
    },

    /// Add a link and print its short hash
    Add {
        url: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Resolve a hash prefix and record an access
    Show { hash: String },

    /// Delete the link matching a hash prefix
    DeleteHash {
        hash: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete the link stored for a URL
    DeleteUrl {
        url: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage != StorageBackend::Postgres {
        bail!("The admin tool requires STORAGE=postgres");
    }

    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &config, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_links_action(action: LinksAction, config: &Config, pool: &PgPool) -> Result<()> {
    let repository: Arc<dyn LinkRepository> =
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let manager = LinkManager::new(repository, config.link_manager.clone());

    match action {
        LinksAction::Count => {
            let count = manager.get_count().await?;
            println!("  Links: {}", count.to_string().bright_green().bold());
        }
        LinksAction::List { skip, take } => list_links(&manager, skip, take).await?,
        LinksAction::Add {
            url,
            name,
            description,
        } => {
            let hash = manager.add(&url, name, description).await?;
            println!("{}", "✅ Link stored".green().bold());
            println!("  Hash: {}", hash.bright_yellow().bold());
        }
        LinksAction::Show { hash } => match manager.get(&hash).await? {
            Some(record) => print_record(&manager, &record),
            None => println!("{}", "  No link matches this hash".yellow()),
        },
        LinksAction::DeleteHash { hash, yes } => {
            let Some(record) = manager.find_by_hash(&hash).await? else {
                println!("{}", "  No link matches this hash".yellow());
                return Ok(());
            };
            print_record(&manager, &record);

            if !yes && !confirm_delete()? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            report_deleted(manager.delete_by_hash(&hash).await?);
        }
        LinksAction::DeleteUrl { url, yes } => {
            let Some(record) = manager.find_by_url(&url).await? else {
                println!("{}", "  No link stored for this URL".yellow());
                return Ok(());
            };
            print_record(&manager, &record);

            if !yes && !confirm_delete()? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            report_deleted(manager.delete_by_url(&url).await?);
        }
    }

    Ok(())
}

/// Streams links page by page and prints them as a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Hash     URL                                      Name
///   ────────────────────────────────────────────────────────────────────
///   roF3S    http://example.com                       Example
/// ```
async fn list_links(manager: &LinkManager, skip: i64, take: i64) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    println!(
        "  {:<8} {:<40} {:<20}",
        "Hash".bright_white().bold(),
        "URL".bright_white().bold(),
        "Name".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    let mut shown = 0usize;
    let mut links = manager.get_all(skip, take);
    while let Some(record) = links.next().await {
        let record = record?;
        println!(
            "  {:<8} {:<40} {}",
            manager.short_hash(&record.hash).bright_yellow(),
            record.url.cyan(),
            record.name.as_deref().unwrap_or("").bright_black()
        );
        shown += 1;
    }

    println!();
    println!("  Shown: {}", shown.to_string().bright_white().bold());
    println!();

    Ok(())
}

fn print_record(manager: &LinkManager, record: &LinkRecord) {
    println!(
        "  Hash:        {}",
        manager.short_hash(&record.hash).bright_yellow().bold()
    );
    println!("  Full hash:   {}", record.hash.bright_black());
    println!("  URL:         {}", record.url.cyan());
    if let Some(name) = &record.name {
        println!("  Name:        {}", name);
    }
    if let Some(description) = &record.description {
        println!("  Description: {}", description);
    }
    println!();
}

fn confirm_delete() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Delete this link?")
        .default(false)
        .interact()?)
}

fn report_deleted(deleted: Option<LinkRecord>) {
    match deleted {
        Some(record) => println!("{} {}", "✅ Deleted".green().bold(), record.url),
        None => println!("{}", "⚠️  Link was already gone".yellow()),
    }
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Links:      {}", links.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
