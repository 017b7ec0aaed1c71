//! # Reminder Log
//!
//! Persistent record of which meeting dates already received a reminder.
//! It is what makes the reminder job "send once" across repeated scheduled
//! runs on the same day.
//!
//! Format: a JSON object mapping canonical meeting date to the local
//! timestamp of the send, e.g. `{"2024-05-21": "2024-05-13T09:00:00"}`.
//!
//! File I/O lives in the binary; this module only defines the format and
//! the selection rule.

use crate::dates;
use crate::primitives::TIMESTAMP_FORMAT;
use crate::{CoreError, Meeting, Registry};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Meeting date -> timestamp of the last reminder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderLog {
    entries: BTreeMap<String, String>,
}

impl ReminderLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a log document. An empty (or whitespace-only) document is an
    /// empty log.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }
        serde_json::from_slice(bytes).map_err(|e| CoreError::InvalidReminderLog(e.to_string()))
    }

    /// Serialize the log for writing back to disk.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    /// Whether a reminder for `date` (any accepted format) was already sent.
    #[must_use]
    pub fn has_sent(&self, date: &str) -> bool {
        self.entries.contains_key(&dates::normalize_date(date))
    }

    /// Timestamp of the reminder for `date`, if any.
    #[must_use]
    pub fn last_sent(&self, date: &str) -> Option<&str> {
        self.entries
            .get(&dates::normalize_date(date))
            .map(String::as_str)
    }

    /// Record a send for `date` at `at`. Overwrites an earlier entry.
    pub fn record(&mut self, date: &str, at: NaiveDateTime) {
        self.entries.insert(
            dates::normalize_date(date),
            at.format(TIMESTAMP_FORMAT).to_string(),
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The meeting exactly `lead_days` after `now`'s day that has not been
    /// reminded yet.
    #[must_use]
    pub fn pending_reminder<'a>(
        &self,
        registry: &'a Registry,
        now: NaiveDateTime,
        lead_days: i64,
    ) -> Option<&'a Meeting> {
        registry
            .days_from(now.date(), lead_days)
            .filter(|meeting| !self.has_sent(&meeting.date))
    }
}

// =============================================================================
// TESTS
// =============================================================================
