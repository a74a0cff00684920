//! CLI administration tool for snip.
//!
//! Talks to the configured mapping store directly, without going through the
//! HTTP API. Reads the same environment variables as the server.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin snip-admin -- shorten https://example.com
//!
//! # Look up a code
//! cargo run --bin snip-admin -- resolve 8xTq3bYp2Kd
//!
//! # Check store connection
//! cargo run --bin snip-admin -- store check
//! ```
//!
//! Failures are printed as the same JSON error body the HTTP API returns and
//! the process exits with status 1.

use snip::config::{self, Config, StoreBackend, mask_connection_string};
use snip::error::AppError;
use snip::server::{build_repository, build_shortener};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::json;

/// CLI tool for managing snip.
#[derive(Parser)]
#[command(name = "snip-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Shorten {
        /// Absolute http(s) URL
        url: String,
    },

    /// Show the mapping for a short code
    Resolve {
        /// Short code
        code: String,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// Store diagnostic subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Check store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    if config.store_backend == StoreBackend::Memory {
        println!(
            "{}",
            "⚠️  STORE_BACKEND=memory: nothing is shared with a running server".yellow()
        );
    }

    let outcome = match cli.command {
        Commands::Shorten { url } => shorten(&config, &url).await,
        Commands::Resolve { code } => resolve(&config, &code).await,
        Commands::Store {
            action: StoreAction::Check,
        } => store_check(&config).await,
    };

    if let Err(e) = outcome {
        let app_error = match e.downcast::<AppError>() {
            Ok(app_error) => app_error,
            Err(other) => AppError::internal(other.to_string(), json!({})),
        };
        print_error(&app_error);
        std::process::exit(1);
    }

    Ok(())
}

/// Creates a short link and prints the API response body.
async fn shorten(config: &Config, url: &str) -> Result<()> {
    let shortener = build_shortener(config).await?;

    let link = shortener.shorten(url).await?;

    println!("{}", "✅ Short link created".green().bold());
    println!();
    println!("  Code:  {}", link.code.bright_yellow().bold());
    println!("  Short: {}", link.short_url.cyan());
    println!("  Long:  {}", link.long_url.bright_white());
    println!();

    Ok(())
}

/// Prints the stored mapping for a code.
async fn resolve(config: &Config, code: &str) -> Result<()> {
    let shortener = build_shortener(config).await?;

    let mapping = shortener.get_mapping(code).await?;

    println!("{}", "🔍 Mapping".bright_blue().bold());
    println!();
    println!("  Code:    {}", mapping.code.bright_yellow());
    println!("  Short:   {}", shortener.short_url(&mapping.code).cyan());
    println!("  Target:  {}", mapping.target_url.bright_white());
    println!(
        "  Created: {}",
        mapping
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string())
            .bright_black()
    );
    println!();

    Ok(())
}

/// Connects to the store and runs its health check.
async fn store_check(config: &Config) -> Result<()> {
    println!("{}", "🔍 Checking store connection...".bright_blue());

    match config.store_backend {
        StoreBackend::Redis => println!("  Redis: {}", mask_connection_string(&config.redis_url)),
        StoreBackend::Memory => println!("  Backend: memory"),
    }

    let repository = build_repository(config).await?;

    if !repository.health_check().await {
        return Err(AppError::store_unavailable(
            "Store health check failed",
            json!({ "backend": repository.backend_name() }),
        )
        .into());
    }

    println!(
        "{}",
        format!("✅ Store connection OK ({})", repository.backend_name())
            .green()
            .bold()
    );

    Ok(())
}

fn print_error(error: &AppError) {
    let body = json!({ "error": error.to_error_info() });
    eprintln!("{}", "❌ Command failed".red().bold());
    eprintln!("{}", body);
}
