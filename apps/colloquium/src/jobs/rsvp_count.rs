//! RSVP summary for the next upcoming meeting, sent to the organizers.

use super::{JobContext, JobOutcome, Services, deliver, resolve_attendees, rsvp_entries};
use crate::error::AppError;
use colloquium_core::{compose, rsvp};

pub async fn run(ctx: JobContext<'_>, services: Services<'_>) -> Result<JobOutcome, AppError> {
    let Some(meeting) = ctx.registry.next_upcoming(ctx.now.date()) else {
        return Ok(JobOutcome::skipped("no upcoming meeting"));
    };
    tracing::info!("Counting RSVPs for '{}' on {}", meeting.title, meeting.date);

    let config = ctx.config;
    let entries = rsvp_entries(services.rsvps, &config.spreadsheet.headers, &meeting.date).await;
    let attendees = resolve_attendees(&entries, services.directory).await;

    let email = compose::rsvp_summary(
        &config.templates,
        &config.group_name,
        meeting,
        &attendees,
        &rsvp::dietary_notes(&entries),
        config.mail.organizers.clone(),
    );
    deliver(services.mailer, &email).await?;

    Ok(JobOutcome::Sent {
        date: meeting.canonical_date(),
        subject: email.subject,
        attendees: attendees.len(),
    })
}
