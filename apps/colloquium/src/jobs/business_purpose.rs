//! Reimbursement "business purpose" draft for the most recent past meeting.

use super::{JobContext, JobOutcome, Services, deliver, resolve_attendees, rsvp_entries};
use crate::error::AppError;
use colloquium_core::compose;

pub async fn run(ctx: JobContext<'_>, services: Services<'_>) -> Result<JobOutcome, AppError> {
    let Some(meeting) = ctx.registry.most_recent_past(ctx.now) else {
        return Ok(JobOutcome::skipped("no past meeting"));
    };
    tracing::info!("Drafting business purpose for '{}' on {}", meeting.title, meeting.date);

    let config = ctx.config;
    let entries = rsvp_entries(services.rsvps, &config.spreadsheet.headers, &meeting.date).await;
    let attendees = resolve_attendees(&entries, services.directory).await;

    let email = compose::business_purpose(
        &config.templates,
        &config.group_name,
        meeting,
        &attendees,
        config.mail.finance.clone(),
    );
    deliver(services.mailer, &email).await?;

    Ok(JobOutcome::Sent {
        date: meeting.canonical_date(),
        subject: email.subject,
        attendees: attendees.len(),
    })
}
