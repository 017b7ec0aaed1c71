//! # Colloquium CLI Module
//!
//! ## Available Commands
//!
//! - `rsvp-count` - Email the organizers the RSVP summary for the next meeting
//! - `business-purpose` - Email the reimbursement draft for the last meeting
//! - `remind` - Send the reminder for the meeting N days out, once
//! - `next-meeting` - Print the next-meeting notice
//! - `schedule` - Render the schedule page to a file
//! - `serve` - Serve the schedule page over HTTP
//! - `cite` - Resolve a paper link to a citation line
//! - `status` - Summarize the registry and reminder log

mod commands;

use crate::config::AppConfig;
use crate::error::AppError;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use colloquium_core::{ScheduleFilter, SortOrder};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Colloquium - reading-group automation
///
/// Scheduled jobs for RSVP summaries, reminders and reimbursement drafts,
/// plus the schedule page.
#[derive(Parser, Debug)]
#[command(name = "colloquium")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML config (default: colloquium.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the registry path
    #[arg(short = 'R', long, global = true)]
    pub registry: Option<PathBuf>,

    /// Override the site config path
    #[arg(long, global = true)]
    pub site_config: Option<PathBuf>,

    /// Pretend the local time is this (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, global = true, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    /// Log emails instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Email the organizers the RSVP summary for the next upcoming meeting
    RsvpCount,

    /// Email the reimbursement business purpose for the most recent meeting
    BusinessPurpose,

    /// Send the reminder for the meeting N days out (once per meeting)
    Remind {
        /// Days between the reminder and the meeting
        #[arg(short, long)]
        lead_days: Option<i64>,

        /// Reminder log path
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Print the next-meeting notice
    NextMeeting,

    /// Render the schedule page
    Schedule {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Which meetings to show (future, past, all)
        #[arg(short, long, default_value = "future")]
        filter: ScheduleFilter,

        /// Date order (asc, desc)
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },

    /// Serve the schedule page over HTTP
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Resolve a paper link to a citation line
    Cite {
        /// Paper URL (arXiv or DOI)
        url: String,
    },

    /// Summarize the registry and reminder log
    Status,
}

/// Parse `--now`. A bare date means midnight.
pub fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

    if let Some(dt) = FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("Invalid time '{}': expected YYYY-MM-DD[THH:MM:SS]", s))
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.registry {
        config.registry.path = path;
    }
    if let Some(path) = cli.site_config {
        config.registry.site_config = path;
    }

    let run = RunOptions {
        now: cli
            .now
            .unwrap_or_else(|| chrono::Local::now().naive_local()),
        fixed_now: cli.now.is_some(),
        dry_run: cli.dry_run,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::RsvpCount) => cmd_rsvp_count(&config, &run).await,
        Some(Commands::BusinessPurpose) => cmd_business_purpose(&config, &run).await,
        Some(Commands::Remind { lead_days, log }) => {
            if let Some(days) = lead_days {
                config.reminder.lead_days = days;
            }
            if let Some(path) = log {
                config.reminder.log_path = path;
            }
            cmd_remind(&config, &run).await
        }
        Some(Commands::NextMeeting) => cmd_next_meeting(&config, &run),
        Some(Commands::Schedule {
            output,
            filter,
            order,
        }) => cmd_schedule(&config, &run, output.as_deref(), filter, order),
        Some(Commands::Serve { host, port }) => cmd_serve(&config, &run, &host, port).await,
        Some(Commands::Cite { url }) => cmd_cite(&config, &run, &url).await,
        Some(Commands::Status) | None => cmd_status(&config, &run),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_accepts_date_and_datetime() {
        let midnight = parse_now("2024-05-13").expect("date");
        assert_eq!(midnight.to_string(), "2024-05-13 00:00:00");

        let morning = parse_now("2024-05-13T09:30:00").expect("datetime");
        assert_eq!(morning.to_string(), "2024-05-13 09:30:00");

        assert!(parse_now("May 13").is_err());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "colloquium",
            "remind",
            "--lead-days",
            "3",
            "--dry-run",
            "--now",
            "2024-05-18",
        ])
        .expect("parse");

        assert!(cli.dry_run);
        assert!(cli.now.is_some());
        assert!(matches!(
            cli.command,
            Some(Commands::Remind {
                lead_days: Some(3),
                ..
            })
        ));
    }

    #[test]
    fn schedule_rejects_unknown_filter() {
        let result = Cli::try_parse_from(["colloquium", "schedule", "--filter", "someday"]);
        assert!(result.is_err());
    }

    #[test]
    fn schedule_defaults() {
        let cli = Cli::try_parse_from(["colloquium", "schedule"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Schedule {
                filter: ScheduleFilter::Future,
                order: SortOrder::Ascending,
                output: None,
            })
        ));
    }
}
