//! # Core Type Definitions
//!
//! This module contains the data model shared by every entry point:
//! - Registry records (`Meeting`, `Link`)
//! - Site configuration consumed by the schedule page and notices (`SiteConfig`)
//! - Per-run attendee data (`Attendee`)
//! - Error types (`CoreError`)
//!
//! Registry records are authored by hand and are read-only at runtime.
//! Nothing in this crate mutates them.

use crate::dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// REGISTRY RECORDS
// =============================================================================

/// A link attached to a meeting (usually a paper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Display text, e.g. "Paper 1: Machine Theory of Mind".
    pub text: String,
    /// Target URL.
    pub url: String,
}

impl Link {
    /// Create a new link.
    #[must_use]
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// One scheduled talk in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub title: String,
    pub presenter: String,
    /// Calendar day as written in the registry, normally `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Meeting {
    /// Create a meeting with no summary and no links.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        presenter: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            presenter: presenter.into(),
            date: date.into(),
            summary: String::new(),
            links: Vec::new(),
        }
    }

    /// Set the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Append a link.
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// The meeting day, if the date string can be normalized into one.
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        dates::parse_day(&self.date)
    }

    /// The canonical `YYYY-MM-DD` form of the date (or the raw value when it
    /// cannot be normalized).
    #[must_use]
    pub fn canonical_date(&self) -> String {
        dates::normalize_date(&self.date)
    }
}

// =============================================================================
// SITE CONFIG
// =============================================================================

/// Site-wide meeting logistics, read from `config.json`.
///
/// Every field is optional; consumers fall back to fixed defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// e.g. "Tuesdays"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_day: Option<String>,
    /// e.g. "3-4pm"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_time: Option<String>,
    /// e.g. "PT"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_location: Option<String>,
    /// e.g. "15:00:00-07:00"
    #[serde(default, rename = "startTimeISO", skip_serializing_if = "Option::is_none")]
    pub start_time_iso: Option<String>,
}

impl SiteConfig {
    /// Parse site config from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::InvalidSiteConfig(e.to_string()))
    }

    /// The ` at 3pm PT` style suffix used in notices and reminders.
    ///
    /// Takes the start of `meeting_time` (the part before `-`).
    #[must_use]
    pub fn time_suffix(&self) -> String {
        match &self.meeting_time {
            Some(time) => {
                let start = time.split('-').next().unwrap_or(time).trim();
                let zone = self.time_zone.as_deref().unwrap_or_default();
                format!(" at {} {}", start, zone).trim_end().to_string()
            }
            None => crate::primitives::DEFAULT_TIME_SUFFIX.to_string(),
        }
    }

    /// "Tuesdays, 3-4pm" when both parts are configured.
    #[must_use]
    pub fn schedule_line(&self) -> Option<String> {
        match (&self.meeting_day, &self.meeting_time) {
            (Some(day), Some(time)) => Some(format!("{}, {}", day, time)),
            _ => None,
        }
    }
}

// =============================================================================
// ATTENDEES
// =============================================================================

/// An attendee of a single meeting instance. Computed per run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub name: String,
}

impl Attendee {
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the core logic.
///
/// Date handling never fails (unparseable input passes through), so
/// these are all about malformed input documents.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The registry document is not an array of meeting records.
    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    /// The site config document is malformed.
    #[error("Invalid site config: {0}")]
    InvalidSiteConfig(String),

    /// The spreadsheet has no header row.
    #[error("Spreadsheet has no header row")]
    EmptyTable,

    /// A required spreadsheet column was not found by header text.
    #[error("Missing spreadsheet column: {0:?}")]
    MissingColumn(String),

    /// The reminder log is not a JSON object of date -> timestamp.
    #[error("Invalid reminder log: {0}")]
    InvalidReminderLog(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_deserializes_without_optional_fields() {
        let json = r#"{"title":"Number Cognition","presenter":"Bendix Kemmann","date":"2025-02-11"}"#;
        let meeting: Meeting = serde_json::from_str(json).expect("parse");
        assert!(meeting.summary.is_empty());
        assert!(meeting.links.is_empty());
        assert_eq!(meeting.day(), NaiveDate::from_ymd_opt(2025, 2, 11));
    }

    #[test]
    fn meeting_day_accepts_slash_dates() {
        let meeting = Meeting::new("t", "p", "5/21/2024");
        assert_eq!(meeting.canonical_date(), "2024-05-21");
        assert_eq!(meeting.day(), NaiveDate::from_ymd_opt(2024, 5, 21));
    }

    #[test]
    fn meeting_day_none_for_garbage() {
        let meeting = Meeting::new("t", "p", "TBD");
        assert_eq!(meeting.day(), None);
        assert_eq!(meeting.canonical_date(), "TBD");
    }

    #[test]
    fn site_config_camel_case_fields() {
        let json = r#"{"meetingDay":"Tuesdays","meetingTime":"3-4pm","timeZone":"PT","meetingLocation":"Room 101","startTimeISO":"15:00:00-07:00"}"#;
        let config = SiteConfig::from_json(json.as_bytes()).expect("parse");
        assert_eq!(config.meeting_location.as_deref(), Some("Room 101"));
        assert_eq!(config.start_time_iso.as_deref(), Some("15:00:00-07:00"));
        assert_eq!(config.schedule_line().as_deref(), Some("Tuesdays, 3-4pm"));
    }

    #[test]
    fn time_suffix_uses_start_of_range() {
        let config = SiteConfig {
            meeting_time: Some("2-3pm".to_string()),
            time_zone: Some("ET".to_string()),
            ..SiteConfig::default()
        };
        assert_eq!(config.time_suffix(), " at 2 ET");
    }

    #[test]
    fn time_suffix_default() {
        assert_eq!(SiteConfig::default().time_suffix(), " at 3pm PT");
    }

    #[test]
    fn site_config_rejects_non_object() {
        assert!(matches!(
            SiteConfig::from_json(b"[1,2]"),
            Err(CoreError::InvalidSiteConfig(_))
        ));
    }
}
