//! CLI inspection tool for wprest.
//!
//! Runs the same aggregation pipeline as the HTTP server directly against
//! the database and prints the resulting JSON, which is handy when checking
//! a WordPress schema or a permalink/prefix configuration.
//!
//! # Usage
//!
//! ```bash
//! # A single post, with embedded authors, media, terms and comments
//! cargo run --bin inspect -- post 1 --embed
//!
//! # A single page in the embed projection
//! cargo run --bin inspect -- page 2 --context embed
//!
//! # The first page of posts matching a search
//! cargo run --bin inspect -- posts --search hello --per-page 5
//!
//! # Check database connection
//! cargo run --bin inspect -- db check
//! ```
//!
//! # Environment Variables
//!
//! The same as the server (`DATABASE_URL` or `DB_*`, `TABLE_PREFIX`,
//! `API_HOST`, `SITE_URL`, ...).

use wprest::application::services::ContentService;
use wprest::config::{self, ApiConfig};
use wprest::domain::entities::{
    ContentKind, Context, GetItemRequest, ListFilter, ListRequest,
};
use wprest::server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::MySqlPool;

/// CLI tool for inspecting wprest output.
#[derive(Parser)]
#[command(name = "inspect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Print a single post
    Post(ItemArgs),

    /// Print a single page
    Page(ItemArgs),

    /// Print a page of posts
    Posts(ListArgs),

    /// Print a page of pages
    Pages(ListArgs),

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(clap::Args)]
struct ItemArgs {
    /// Post or page ID
    id: u64,

    /// Embed related resources
    #[arg(short, long)]
    embed: bool,

    /// Projection: `view` or `embed`
    #[arg(short, long, default_value = "view")]
    context: String,

    /// Password for protected content
    #[arg(short, long)]
    password: Option<String>,
}

#[derive(clap::Args)]
struct ListArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    page: u64,

    /// Items per page (1-100)
    #[arg(long, default_value_t = 10)]
    per_page: u64,

    /// Search term
    #[arg(short, long)]
    search: Option<String>,

    /// Embed related resources
    #[arg(short, long)]
    embed: bool,

    /// Print only ids and titles
    #[arg(short, long)]
    brief: bool,
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
    let pool = server::connect(&config).await?;
    let api_config = config.api_config();

    match cli.command {
        Commands::Post(args) => print_item(&pool, &api_config, args, ContentKind::Post).await?,
        Commands::Page(args) => print_item(&pool, &api_config, args, ContentKind::Page).await?,
        Commands::Posts(args) => print_list(&pool, &api_config, args, ContentKind::Post).await?,
        Commands::Pages(args) => print_list(&pool, &api_config, args, ContentKind::Page).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &api_config).await?,
    }

    Ok(())
}

fn service(pool: &MySqlPool) -> ContentService {
    server::build_service(pool.clone())
}

/// Prints one assembled item as pretty JSON.
async fn print_item(
    pool: &MySqlPool,
    cfg: &ApiConfig,
    args: ItemArgs,
    kind: ContentKind,
) -> Result<()> {
    let request = GetItemRequest {
        id: args.id,
        kind,
        embed: args.embed,
        context: args.context.parse::<Context>()?,
        password: args.password,
    };

    match service(pool).get_item(cfg, &request).await {
        Ok(item) => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Err(e) => {
            println!(
                "{} {} {}: {}",
                "❌".red(),
                kind.to_string().cyan(),
                args.id.to_string().bright_white().bold(),
                e.to_string().red()
            );
        }
    }

    Ok(())
}

/// Prints a collection, either as JSON or as an id/title table.
async fn print_list(
    pool: &MySqlPool,
    cfg: &ApiConfig,
    args: ListArgs,
    kind: ContentKind,
) -> Result<()> {
    let filter = ListFilter {
        page: args.page.max(1),
        per_page: args.per_page.clamp(1, 100),
        search: args.search,
        ..ListFilter::for_kind(kind)
    };

    let request = ListRequest {
        filter,
        embed: args.embed,
        context: Context::View,
    };

    let items = service(pool).list(cfg, request).await?;

    if !args.brief {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("{}", "  Nothing found".yellow());
        return Ok(());
    }

    println!(
        "  {:<8} {:<40} {}",
        "ID".bright_white().bold(),
        "Title".bright_white().bold(),
        "Link".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for item in &items {
        let base = item.base();
        println!(
            "  {:<8} {:<40} {}",
            base.id.to_string().bright_black(),
            base.title.rendered.cyan(),
            base.link.bright_black()
        );
    }

    println!();
    println!("  Total: {}", items.len().to_string().bright_white().bold());

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &MySqlPool, cfg: &ApiConfig) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            service(pool).ping().await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT VERSION()")
                .fetch_one(pool)
                .await?;

            let posts: i64 = sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM {} WHERE post_type = 'post' AND post_status = 'publish'",
                cfg.table("posts")
            ))
            .fetch_one(pool)
            .await?;

            let pages: i64 = sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM {} WHERE post_type = 'page' AND post_status = 'publish'",
                cfg.table("posts")
            ))
            .fetch_one(pool)
            .await?;

            println!("  MySQL:           {}", version.bright_white());
            println!("  Table prefix:    {}", cfg.table_prefix.bright_white());
            println!("  Published posts: {}", posts.to_string().bright_green().bold());
            println!("  Published pages: {}", pages.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
