//! # CLI Command Implementations

use crate::api::{self, AppState};
use crate::clients::{
    CitationClient, CitationSource, DirectoryClient, DryRunMailer, HttpMailer, MailTransport,
    NameDirectory, NoDirectory, NoSpreadsheet, RsvpSource, SheetsClient,
};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::jobs::{self, JobContext, JobOutcome, Services};
use crate::loader::{load_registry, load_reminder_log, load_site_config};
use chrono::NaiveDateTime;
use colloquium_core::{
    CitationTarget, Link, PageOptions, Reference, Registry, ScheduleFilter, SiteConfig, SortOrder,
    next_meeting_notice, schedule,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timeout for every outgoing HTTP request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Options shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub now: NaiveDateTime,
    /// Whether `now` came from `--now` rather than the clock.
    pub fixed_now: bool,
    pub dry_run: bool,
    pub json_mode: bool,
}

// =============================================================================
// SHARED SETUP
// =============================================================================

/// Validate output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, AppError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        AppError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let filename = path
        .file_name()
        .ok_or_else(|| AppError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn http_client() -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .user_agent(concat!("colloquium/", env!("CARGO_PKG_VERSION")))
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| AppError::Config(format!("HTTP client: {}", e)))
}

fn load_documents(config: &AppConfig) -> Result<(Registry, SiteConfig), AppError> {
    let registry = load_registry(&config.registry.path)?;
    let site = load_site_config(&config.registry.site_config)?;
    Ok((registry, site))
}

fn citation_client(config: &AppConfig, http: &reqwest::Client) -> CitationClient {
    CitationClient::new(
        http.clone(),
        config.citation.arxiv_url.clone(),
        config.citation.doi_url.clone(),
    )
}

/// The live collaborators, built from configuration.
struct LiveServices {
    rsvps: Box<dyn RsvpSource>,
    directory: Box<dyn NameDirectory>,
    citations: Option<CitationClient>,
    mailer: Box<dyn MailTransport>,
}

impl LiveServices {
    fn from_config(config: &AppConfig, dry_run: bool) -> Result<Self, AppError> {
        let http = http_client()?;

        let rsvps: Box<dyn RsvpSource> = match &config.spreadsheet.spreadsheet_id {
            Some(id) => Box::new(SheetsClient::new(
                http.clone(),
                config.spreadsheet.base_url.clone(),
                id.clone(),
                config.spreadsheet.range.clone(),
                config.spreadsheet.token.clone(),
            )),
            None => Box::new(NoSpreadsheet),
        };

        let directory: Box<dyn NameDirectory> = match &config.directory.base_url {
            Some(url) => Box::new(DirectoryClient::new(
                http.clone(),
                url.clone(),
                config.directory.token.clone(),
                config.directory.lookup_delay_ms,
            )),
            None => Box::new(NoDirectory),
        };

        let citations = config
            .citation
            .enabled
            .then(|| citation_client(config, &http));

        let mailer: Box<dyn MailTransport> = if dry_run {
            Box::new(DryRunMailer)
        } else {
            if config.mail.token.is_none() {
                tracing::warn!("No mail token configured (COLLOQUIUM_MAIL_TOKEN)");
            }
            Box::new(HttpMailer::new(
                http,
                config.mail.endpoint.clone(),
                config.mail.from.clone(),
                config.mail.token.clone(),
            ))
        };

        Ok(Self {
            rsvps,
            directory,
            citations,
            mailer,
        })
    }

    fn services(&self) -> Services<'_> {
        Services {
            rsvps: self.rsvps.as_ref(),
            directory: self.directory.as_ref(),
            citations: self
                .citations
                .as_ref()
                .map(|c| c as &dyn CitationSource),
            mailer: self.mailer.as_ref(),
        }
    }
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn report(outcome: &JobOutcome, json_mode: bool) {
    if json_mode {
        print_json(&serde_json::to_value(outcome).unwrap_or_default());
        return;
    }
    match outcome {
        JobOutcome::Sent {
            date,
            subject,
            attendees,
        } => println!("Sent \"{}\" for {} ({} attendees)", subject, date, attendees),
        JobOutcome::Skipped { reason } => println!("Skipped: {}", reason),
    }
}

// =============================================================================
// JOB COMMANDS
// =============================================================================

fn job_context<'a>(
    config: &'a AppConfig,
    registry: &'a Registry,
    site: &'a SiteConfig,
    run: &RunOptions,
) -> JobContext<'a> {
    JobContext {
        config,
        registry,
        site,
        now: run.now,
    }
}

/// Email the organizers the RSVP summary for the next upcoming meeting.
pub async fn cmd_rsvp_count(config: &AppConfig, run: &RunOptions) -> Result<(), AppError> {
    let (registry, site) = load_documents(config)?;
    let live = LiveServices::from_config(config, run.dry_run)?;

    let ctx = job_context(config, &registry, &site, run);
    let outcome = jobs::rsvp_count::run(ctx, live.services()).await?;
    report(&outcome, run.json_mode);
    Ok(())
}

/// Email the reimbursement draft for the most recent past meeting.
pub async fn cmd_business_purpose(config: &AppConfig, run: &RunOptions) -> Result<(), AppError> {
    let (registry, site) = load_documents(config)?;
    let live = LiveServices::from_config(config, run.dry_run)?;

    let ctx = job_context(config, &registry, &site, run);
    let outcome = jobs::business_purpose::run(ctx, live.services()).await?;
    report(&outcome, run.json_mode);
    Ok(())
}

/// Send the reminder for the meeting `lead_days` out, at most once.
pub async fn cmd_remind(config: &AppConfig, run: &RunOptions) -> Result<(), AppError> {
    let (registry, site) = load_documents(config)?;
    let live = LiveServices::from_config(config, run.dry_run)?;

    let ctx = job_context(config, &registry, &site, run);
    let outcome = jobs::reminder::run(ctx, live.services()).await?;
    report(&outcome, run.json_mode);
    Ok(())
}

// =============================================================================
// PAGE COMMANDS
// =============================================================================

/// Print the next-meeting notice.
pub fn cmd_next_meeting(config: &AppConfig, run: &RunOptions) -> Result<(), AppError> {
    let (registry, site) = load_documents(config)?;
    let notice = next_meeting_notice(&registry, run.now, &site);

    if run.json_mode {
        print_json(&serde_json::json!({ "notice": notice }));
    } else {
        println!("{}", notice);
    }
    Ok(())
}

/// Render the schedule page to `output`, or stdout.
pub fn cmd_schedule(
    config: &AppConfig,
    run: &RunOptions,
    output: Option<&Path>,
    filter: ScheduleFilter,
    order: SortOrder,
) -> Result<(), AppError> {
    let (registry, site) = load_documents(config)?;
    let notice = next_meeting_notice(&registry, run.now, &site);
    let options = PageOptions {
        title: &config.page_title,
        filter,
        order,
        today: run.now.date(),
        notice: &notice,
    };
    let page = schedule::render_page(&registry, &site, &options);

    match output {
        Some(path) => {
            let path = validate_output_path(path)?;
            std::fs::write(&path, page)
                .map_err(|e| AppError::Io(format!("Cannot write '{}': {}", path.display(), e)))?;
            tracing::info!("Schedule written to {}", path.display());
        }
        None => print!("{}", page),
    }
    Ok(())
}

/// Serve the schedule page until Ctrl+C.
pub async fn cmd_serve(
    config: &AppConfig,
    run: &RunOptions,
    host: &str,
    port: u16,
) -> Result<(), AppError> {
    let (registry, site) = load_documents(config)?;
    let meeting_count = registry.len();

    let state = AppState::new(registry, site, &config.page_title)
        .with_fixed_now(run.fixed_now.then_some(run.now));

    println!("Colloquium Schedule Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Registry: {} ({} meetings)", config.registry.path.display(), meeting_count);
    println!();
    println!("Endpoints:");
    println!("  GET /                   - Schedule page (?filter=future|past|all&order=asc|desc)");
    println!("  GET /presentations.json - Meeting registry");
    println!("  GET /config.json        - Site config");
    println!("  GET /next-meeting       - Next-meeting notice");
    println!("  GET /health             - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, state).await
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Resolve one paper link the way the reminder job does.
pub async fn cmd_cite(config: &AppConfig, run: &RunOptions, url: &str) -> Result<(), AppError> {
    let link = Link::new(url, url);
    let identifier = match CitationTarget::from_url(url) {
        Some(CitationTarget::Arxiv(id)) => Some(format!("arXiv:{}", id)),
        Some(CitationTarget::Doi(doi)) => Some(format!("doi:{}", doi)),
        None => {
            tracing::warn!("No arXiv identifier or DOI in {}", url);
            None
        }
    };

    let client = citation_client(config, &http_client()?);
    let source: &dyn CitationSource = &client;
    let line = jobs::resolve_references(std::slice::from_ref(&link), Some(source))
        .await
        .into_iter()
        .next()
        .unwrap_or_else(|| Reference::unresolved(link))
        .citation
        .format_line();

    if run.json_mode {
        print_json(&serde_json::json!({
            "url": url,
            "identifier": identifier,
            "citation": line,
        }));
    } else {
        println!("{}", line);
    }
    Ok(())
}

/// Summarize the registry and the reminder log.
pub fn cmd_status(config: &AppConfig, run: &RunOptions) -> Result<(), AppError> {
    let registry = load_registry(&config.registry.path)?;
    let log = load_reminder_log(&config.reminder.log_path)?;

    let undated = registry.len() - registry.dated().count();
    let next = registry.next_upcoming(run.now.date());
    let last = registry.most_recent_past(run.now);
    let pending = log.pending_reminder(&registry, run.now, config.reminder.lead_days);

    if run.json_mode {
        print_json(&serde_json::json!({
            "registry": config.registry.path.to_string_lossy(),
            "meetings": registry.len(),
            "undated": undated,
            "next_upcoming": next.map(|m| m.canonical_date()),
            "most_recent_past": last.map(|m| m.canonical_date()),
            "reminders_sent": log.len(),
            "reminder_due": pending.map(|m| m.canonical_date()),
        }));
        return Ok(());
    }

    let describe = |m: Option<&colloquium_core::Meeting>| {
        m.map(|m| format!("{} - {} ({})", m.canonical_date(), m.title, m.presenter))
            .unwrap_or_else(|| "none".to_string())
    };

    println!("Colloquium Status");
    println!("=================");
    println!("Registry:       {}", config.registry.path.display());
    println!("Meetings:       {} ({} without a usable date)", registry.len(), undated);
    println!("Next upcoming:  {}", describe(next));
    println!("Most recent:    {}", describe(last));
    println!("Reminders sent: {}", log.len());
    println!("Reminder due:   {}", describe(pending));

    Ok(())
}
