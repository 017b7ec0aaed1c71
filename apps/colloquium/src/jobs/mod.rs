//! # Jobs
//!
//! One parameterized job per scheduled entry point. Each job selects a
//! meeting, gathers what it needs from the collaborators, composes one email
//! and sends it.
//!
//! ## Failure policy
//!
//! Spreadsheet, directory and citation failures are logged with
//! `tracing::warn!` and replaced with fallbacks. Only the final send (and
//! loading the documents a run depends on) fails the job. Nothing is retried.

pub mod business_purpose;
pub mod reminder;
pub mod rsvp_count;

use crate::clients::{CitationSource, MailTransport, NameDirectory, RsvpSource};
use crate::config::AppConfig;
use crate::error::AppError;
use chrono::NaiveDateTime;
use colloquium_core::{
    Attendee, CitationTarget, Email, Link, Reference, Registry, RsvpEntry, RsvpHeaders, RsvpTable,
    SiteConfig, name_from_email,
};
use serde::Serialize;

// =============================================================================
// CONTEXT
// =============================================================================

/// Everything a job reads. "now" is injected so selection is reproducible.
#[derive(Clone, Copy)]
pub struct JobContext<'a> {
    pub config: &'a AppConfig,
    pub registry: &'a Registry,
    pub site: &'a SiteConfig,
    pub now: NaiveDateTime,
}

/// The collaborators a job talks to.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub rsvps: &'a dyn RsvpSource,
    pub directory: &'a dyn NameDirectory,
    /// `None` when citation lookup is disabled.
    pub citations: Option<&'a dyn CitationSource>,
    pub mailer: &'a dyn MailTransport,
}

/// What a job run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    Sent {
        date: String,
        subject: String,
        attendees: usize,
    },
    Skipped {
        reason: String,
    },
}

impl JobOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::info!("Nothing to do: {}", reason);
        Self::Skipped { reason }
    }
}

/// Send the composed email; a failure here fails the job.
async fn deliver(mailer: &dyn MailTransport, email: &Email) -> Result<(), AppError> {
    mailer.send(email).await.map_err(|e| {
        tracing::error!("Send failed for '{}': {}", email.subject, e);
        AppError::Send(e)
    })
}

// =============================================================================
// SHARED STEPS
// =============================================================================

/// RSVP entries for `date`. Any spreadsheet failure yields an empty list.
pub async fn rsvp_entries(
    source: &dyn RsvpSource,
    headers: &RsvpHeaders,
    date: &str,
) -> Vec<RsvpEntry> {
    let rows = match source.fetch_rows().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("Spreadsheet read failed, assuming no RSVPs: {}", e);
            return Vec::new();
        }
    };

    match RsvpTable::from_rows(&rows, headers) {
        Ok(table) => {
            let entries = table.attendees_for(date);
            tracing::info!(
                "{} RSVPs for {} ({} rows read)",
                entries.len(),
                date,
                table.len()
            );
            entries
        }
        Err(e) => {
            tracing::warn!("Spreadsheet unusable, assuming no RSVPs: {}", e);
            Vec::new()
        }
    }
}

/// Give every entry a display name: the spreadsheet's name column, else the
/// directory, else the email's local part. Lookups run one at a time.
pub async fn resolve_attendees(
    entries: &[RsvpEntry],
    directory: &dyn NameDirectory,
) -> Vec<Attendee> {
    let mut attendees = Vec::with_capacity(entries.len());

    for entry in entries {
        let name = match entry.name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => name.trim().to_string(),
            None => match directory.lookup_name(&entry.email).await {
                Ok(Some(name)) => name,
                Ok(None) => {
                    tracing::debug!("No directory entry for {}", entry.email);
                    name_from_email(&entry.email)
                }
                Err(e) => {
                    tracing::warn!("Directory lookup failed for {}: {}", entry.email, e);
                    name_from_email(&entry.email)
                }
            },
        };
        attendees.push(Attendee::new(entry.email.clone(), name));
    }

    attendees
}

/// Pair each link with a citation. Links without an identifier, disabled
/// lookup and provider failures all fall back to the link text.
pub async fn resolve_references(
    links: &[Link],
    citations: Option<&dyn CitationSource>,
) -> Vec<Reference> {
    let mut references = Vec::with_capacity(links.len());

    for link in links {
        let target = CitationTarget::from_url(&link.url);
        let reference = match (citations, target) {
            (Some(source), Some(target)) => match source.lookup(&target).await {
                Ok(citation) => Reference {
                    link: link.clone(),
                    citation,
                },
                Err(e) => {
                    tracing::warn!("Citation lookup failed for {}: {}", link.url, e);
                    Reference::unresolved(link.clone())
                }
            },
            _ => Reference::unresolved(link.clone()),
        };
        references.push(reference);
    }

    references
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ClientError, NoDirectory};
    use async_trait::async_trait;
    use colloquium_core::Citation;

    struct FailingSheet;

    #[async_trait]
    impl RsvpSource for FailingSheet {
        async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, ClientError> {
            Err(ClientError::RateLimited)
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl NameDirectory for FailingDirectory {
        async fn lookup_name(&self, _email: &str) -> Result<Option<String>, ClientError> {
            Err(ClientError::Status(500, "boom".to_string()))
        }
    }

    struct FixedCitation;

    #[async_trait]
    impl CitationSource for FixedCitation {
        async fn lookup(&self, _target: &CitationTarget) -> Result<Citation, ClientError> {
            Ok(Citation::from_title("Resolved"))
        }
    }

    fn entry(email: &str, name: Option<&str>) -> RsvpEntry {
        RsvpEntry {
            email: email.to_string(),
            name: name.map(str::to_string),
            dietary: None,
        }
    }

    #[tokio::test]
    async fn spreadsheet_failure_means_no_rsvps() {
        let entries = rsvp_entries(&FailingSheet, &RsvpHeaders::default(), "2024-05-21").await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn name_column_wins_then_local_part() {
        let entries = [
            entry("ada@example.edu", Some("Ada Lovelace")),
            entry("grace@example.edu", Some("  ")),
        ];
        let attendees = resolve_attendees(&entries, &FailingDirectory).await;
        assert_eq!(attendees[0].name, "Ada Lovelace");
        assert_eq!(attendees[1].name, "grace");
    }

    #[tokio::test]
    async fn missing_directory_entry_uses_local_part() {
        let attendees = resolve_attendees(&[entry("alan@example.edu", None)], &NoDirectory).await;
        assert_eq!(attendees, [Attendee::new("alan@example.edu", "alan")]);
    }

    #[tokio::test]
    async fn references_fall_back_to_link_text() {
        let links = [
            Link::new("Paper", "https://arxiv.org/abs/2310.13018"),
            Link::new("Slides", "https://example.edu/slides"),
        ];

        let disabled = resolve_references(&links, None).await;
        assert_eq!(disabled[0].citation.title, "Paper");

        let source: &dyn CitationSource = &FixedCitation;
        let enabled = resolve_references(&links, Some(source)).await;
        assert_eq!(enabled[0].citation.title, "Resolved");
        assert_eq!(enabled[1].citation.title, "Slides");
    }
}
