//! # Meeting Registry
//!
//! The authoritative list of scheduled talks, loaded once per run from
//! `presentations.json` and passed explicitly to every consumer.
//!
//! ## Selection
//!
//! All selectors take "now" (or "today") from the caller:
//! - most recent past: latest date whose end of day (23:59:59) is `<= now`
//! - next upcoming: earliest date `>= today`
//! - `days_from`: date equal to `today + N` exactly, no tolerance window
//!
//! Records whose date cannot be parsed are skipped by every selector.
//! One meeting per date is expected; ties are resolved arbitrarily.

use crate::dates;
use crate::primitives::MAX_REGISTRY_MEETINGS;
use crate::{CoreError, Meeting};
use chrono::{NaiveDate, NaiveDateTime};

/// The meeting registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    meetings: Vec<Meeting>,
}

impl Registry {
    /// Create a registry from meetings, keeping authoring order.
    #[must_use]
    pub fn new(meetings: Vec<Meeting>) -> Self {
        Self { meetings }
    }

    /// Parse a registry document (a JSON array of meeting records).
    pub fn from_json(bytes: &[u8]) -> Result<Self, CoreError> {
        let meetings: Vec<Meeting> =
            serde_json::from_slice(bytes).map_err(|e| CoreError::InvalidRegistry(e.to_string()))?;

        if meetings.len() > MAX_REGISTRY_MEETINGS {
            return Err(CoreError::InvalidRegistry(format!(
                "Meeting count {} exceeds maximum {}",
                meetings.len(),
                MAX_REGISTRY_MEETINGS
            )));
        }

        Ok(Self::new(meetings))
    }

    /// Serialize back to the registry document format.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.meetings)
            .map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    /// All meetings in authoring order.
    #[must_use]
    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    /// Meetings paired with their parsed day; unparseable dates are dropped.
    pub fn dated(&self) -> impl Iterator<Item = (NaiveDate, &Meeting)> {
        self.meetings.iter().filter_map(|m| m.day().map(|d| (d, m)))
    }

    /// The latest meeting that is fully over at `now`.
    #[must_use]
    pub fn most_recent_past(&self, now: NaiveDateTime) -> Option<&Meeting> {
        self.dated()
            .filter(|(day, _)| dates::end_of_day(*day).is_some_and(|end| end <= now))
            .max_by_key(|(day, _)| *day)
            .map(|(_, m)| m)
    }

    /// The earliest meeting on or after `today`.
    #[must_use]
    pub fn next_upcoming(&self, today: NaiveDate) -> Option<&Meeting> {
        self.dated()
            .filter(|(day, _)| *day >= today)
            .min_by_key(|(day, _)| *day)
            .map(|(_, m)| m)
    }

    /// The earliest meeting strictly after `day`.
    #[must_use]
    pub fn following(&self, day: NaiveDate) -> Option<&Meeting> {
        self.dated()
            .filter(|(d, _)| *d > day)
            .min_by_key(|(d, _)| *d)
            .map(|(_, m)| m)
    }

    /// The meeting held on `day`.
    #[must_use]
    pub fn on_date(&self, day: NaiveDate) -> Option<&Meeting> {
        self.dated().find(|(d, _)| *d == day).map(|(_, m)| m)
    }

    /// The meeting exactly `days` days after `today`.
    #[must_use]
    pub fn days_from(&self, today: NaiveDate, days: i64) -> Option<&Meeting> {
        dates::offset_days(today, days).and_then(|target| self.on_date(target))
    }

    /// Look up a meeting by a date string in any accepted format.
    #[must_use]
    pub fn find_by_date(&self, date: &str) -> Option<&Meeting> {
        self.meetings.iter().find(|m| dates::same_day(&m.date, date))
    }
}

impl From<Vec<Meeting>> for Registry {
    fn from(meetings: Vec<Meeting>) -> Self {
        Self::new(meetings)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        day(y, m, d).and_hms_opt(h, min, 0).expect("valid time")
    }

    fn sample() -> Registry {
        Registry::new(vec![
            Meeting::new("Library learning", "Sean Anderson", "2024-05-21"),
            Meeting::new("Learning dynamics", "Satchel Grant", "2024-04-30"),
            Meeting::new("Language and/or Thought", "Daniel Wurgaft", "6/4/2024"),
            Meeting::new("TBD", "Nastasia Klevak", "TBD"),
        ])
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            Registry::from_json(br#"{"title":"x"}"#),
            Err(CoreError::InvalidRegistry(_))
        ));
    }

    #[test]
    fn most_recent_past_excludes_today_until_end_of_day() {
        let registry = sample();
        let during = registry.most_recent_past(at(2024, 5, 21, 15, 0));
        assert_eq!(during.map(|m| m.title.as_str()), Some("Learning dynamics"));

        let after = registry.most_recent_past(day(2024, 5, 21).and_hms_opt(23, 59, 59).expect("t"));
        assert_eq!(after.map(|m| m.title.as_str()), Some("Library learning"));
    }

    #[test]
    fn next_upcoming_includes_today() {
        let registry = sample();
        let next = registry.next_upcoming(day(2024, 5, 21));
        assert_eq!(next.map(|m| m.title.as_str()), Some("Library learning"));

        let next = registry.next_upcoming(day(2024, 5, 22));
        assert_eq!(next.map(|m| m.title.as_str()), Some("Language and/or Thought"));

        assert!(registry.next_upcoming(day(2024, 6, 5)).is_none());
    }

    #[test]
    fn days_from_is_exact() {
        let registry = sample();
        assert_eq!(
            registry.days_from(day(2024, 5, 13), 8).map(|m| m.presenter.as_str()),
            Some("Sean Anderson")
        );
        assert!(registry.days_from(day(2024, 5, 12), 8).is_none());
        assert!(registry.days_from(day(2024, 5, 14), 8).is_none());
    }

    #[test]
    fn unparseable_dates_are_skipped() {
        let registry = Registry::new(vec![Meeting::new("TBD", "someone", "TBD")]);
        assert!(registry.next_upcoming(day(2000, 1, 1)).is_none());
        assert!(registry.most_recent_past(at(2100, 1, 1, 0, 0)).is_none());
    }

    #[test]
    fn find_by_date_accepts_spreadsheet_format() {
        let registry = sample();
        let found = registry.find_by_date("05/21/2024");
        assert_eq!(found.map(|m| m.title.as_str()), Some("Library learning"));
    }

    #[test]
    fn json_round_trip_keeps_order() {
        let registry = sample();
        let json = registry.to_json().expect("serialize");
        let parsed = Registry::from_json(json.as_bytes()).expect("parse");
        assert_eq!(parsed, registry);
    }
}
