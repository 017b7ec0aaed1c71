//! Reminder for the meeting `lead_days` out, sent at most once per meeting.
//!
//! The reminder log is loaded first and saved only after a successful send,
//! so a failed send is retried by the next scheduled run and a successful
//! one is never repeated. A dry run leaves the log untouched.

use super::{JobContext, JobOutcome, Services, deliver, resolve_references};
use crate::error::AppError;
use crate::loader::{load_reminder_log, save_reminder_log};
use colloquium_core::compose;

pub async fn run(ctx: JobContext<'_>, services: Services<'_>) -> Result<JobOutcome, AppError> {
    let config = ctx.config;
    let log_path = &config.reminder.log_path;
    let mut log = load_reminder_log(log_path)?;

    let Some(meeting) = log.pending_reminder(ctx.registry, ctx.now, config.reminder.lead_days)
    else {
        return Ok(JobOutcome::skipped(format!(
            "no unreminded meeting {} days out",
            config.reminder.lead_days
        )));
    };
    tracing::info!("Sending reminder for '{}' on {}", meeting.title, meeting.date);

    let references = resolve_references(&meeting.links, services.citations).await;
    let email = compose::reminder(
        &config.templates,
        &config.group_name,
        ctx.site,
        meeting,
        &references,
        config.reminder.rsvp_form_url.as_deref(),
        config.mail.mailing_list.clone(),
    );
    deliver(services.mailer, &email).await?;

    if services.mailer.delivers() {
        log.record(&meeting.date, ctx.now);
        save_reminder_log(log_path, &log)?;
        tracing::info!("Recorded reminder for {} in {}", meeting.date, log_path.display());
    } else {
        tracing::info!("Dry run: reminder log left unchanged");
    }

    Ok(JobOutcome::Sent {
        date: meeting.canonical_date(),
        subject: email.subject,
        attendees: 0,
    })
}
