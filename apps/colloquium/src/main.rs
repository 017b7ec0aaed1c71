//! # Colloquium
//!
//! Reading-group automation: one subcommand per scheduled job, plus the
//! schedule page.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  apps/colloquium (THE BINARY)                │
//! │                                                              │
//! │  ┌───────────┐   ┌─────────────┐   ┌──────────────────────┐  │
//! │  │   CLI     │──▶│    Jobs     │──▶│  Clients (reqwest)   │  │
//! │  │  (clap)   │   │             │   │ sheets/dir/cite/mail │  │
//! │  └─────┬─────┘   └──────┬──────┘   └──────────────────────┘  │
//! │        │  ┌─────────────┤                                    │
//! │        ▼  ▼             ▼                                    │
//! │  ┌───────────┐   ┌─────────────────┐                         │
//! │  │ Schedule  │──▶│ colloquium-core │                         │
//! │  │  (axum)   │   │   (THE LOGIC)   │                         │
//! │  └───────────┘   └─────────────────┘                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Scheduled jobs
//! colloquium rsvp-count
//! colloquium business-purpose
//! colloquium remind --lead-days 8
//!
//! # Try a job without sending anything
//! colloquium --dry-run --now 2024-05-13T09:00:00 remind
//!
//! # Schedule page
//! colloquium schedule -o index.html
//! colloquium serve --port 8080
//! ```

use clap::Parser;
use colloquium::cli::{self, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // COLLOQUIUM_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("COLLOQUIUM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "colloquium=debug,colloquium_core=debug,tower_http=debug"
    } else {
        "colloquium=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Job and page output goes to stdout; only the server prints a banner.
    if !cli.quiet && matches!(cli.command, Some(Commands::Serve { .. })) {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
   ___      _ _                _
  / __|___ | | |___  __ _ _  _(_)_  _ _ __
 | (__/ _ \| | / _ \/ _` | || | | || | '  \
  \___\___/|_|_\___/\__, |\_,_|_|\_,_|_|_|_|
                       |_|
  Reading Group Automation v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
