//! # RSVP Table
//!
//! Read-only view of the RSVP spreadsheet. The first row is the header row;
//! columns are located by exact header text. The email and RSVP-date columns
//! are required, the name and dietary columns are optional.
//!
//! A respondent's name comes from the single name column when one is
//! configured and filled in, else from the first-name and surname columns
//! joined with a space.

use crate::dates;
use crate::primitives::{
    DEFAULT_DIETARY_HEADER, DEFAULT_EMAIL_HEADER, DEFAULT_FIRST_NAME_HEADER,
    DEFAULT_RSVP_DATE_HEADER, DEFAULT_SURNAME_HEADER,
};
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Header texts identifying the RSVP columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsvpHeaders {
    pub email: String,
    pub rsvp_date: String,
    /// Full-name column, if the form asks for one.
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub dietary: Option<String>,
}

impl Default for RsvpHeaders {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL_HEADER.to_string(),
            rsvp_date: DEFAULT_RSVP_DATE_HEADER.to_string(),
            name: None,
            first_name: Some(DEFAULT_FIRST_NAME_HEADER.to_string()),
            surname: Some(DEFAULT_SURNAME_HEADER.to_string()),
            dietary: Some(DEFAULT_DIETARY_HEADER.to_string()),
        }
    }
}

/// One attendee's RSVP for a specific meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpEntry {
    pub email: String,
    pub name: Option<String>,
    pub dietary: Option<String>,
}

#[derive(Debug, Clone)]
struct RsvpRow {
    email: String,
    rsvp_date: String,
    name: Option<String>,
    dietary: Option<String>,
}

/// Parsed RSVP rows.
#[derive(Debug, Clone, Default)]
pub struct RsvpTable {
    rows: Vec<RsvpRow>,
}

/// Column positions resolved from the header row.
struct Columns {
    email: usize,
    rsvp_date: usize,
    name: Option<usize>,
    first_name: Option<usize>,
    surname: Option<usize>,
    dietary: Option<usize>,
}

impl Columns {
    fn resolve(header: &[String], headers: &RsvpHeaders) -> Result<Self, CoreError> {
        let find = |text: &str| header.iter().position(|h| h == text);

        let email = find(headers.email.as_str())
            .ok_or_else(|| CoreError::MissingColumn(headers.email.clone()))?;
        let rsvp_date = find(headers.rsvp_date.as_str())
            .ok_or_else(|| CoreError::MissingColumn(headers.rsvp_date.clone()))?;

        Ok(Self {
            email,
            rsvp_date,
            name: headers.name.as_deref().and_then(find),
            first_name: headers.first_name.as_deref().and_then(find),
            surname: headers.surname.as_deref().and_then(find),
            dietary: headers.dietary.as_deref().and_then(find),
        })
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|c| c.trim()).unwrap_or_default()
}

fn optional_cell(row: &[String], index: Option<usize>) -> Option<String> {
    index
        .map(|i| cell(row, i))
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// The name column if filled in, else "First Surname" from whichever parts
/// are present.
fn respondent_name(row: &[String], columns: &Columns) -> Option<String> {
    if let Some(name) = optional_cell(row, columns.name) {
        return Some(name);
    }
    match (
        optional_cell(row, columns.first_name),
        optional_cell(row, columns.surname),
    ) {
        (Some(first), Some(surname)) => Some(format!("{} {}", first, surname)),
        (first, surname) => first.or(surname),
    }
}

impl RsvpTable {
    /// Build the table from raw spreadsheet rows (header row first).
    ///
    /// Rows shorter than the header are padded with empty cells.
    pub fn from_rows(rows: &[Vec<String>], headers: &RsvpHeaders) -> Result<Self, CoreError> {
        let (header, body) = rows.split_first().ok_or(CoreError::EmptyTable)?;
        let columns = Columns::resolve(header, headers)?;

        let rows = body
            .iter()
            .map(|row| RsvpRow {
                email: cell(row, columns.email).to_string(),
                rsvp_date: cell(row, columns.rsvp_date).to_string(),
                name: respondent_name(row, &columns),
                dietary: optional_cell(row, columns.dietary),
            })
            .collect();

        Ok(Self { rows })
    }

    /// Number of data rows (including blanks and duplicates).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// RSVPs for the meeting on `date`, one per email.
    ///
    /// Emails are compared case-insensitively; the first row wins and
    /// spreadsheet order is preserved. Rows without an email are skipped.
    #[must_use]
    pub fn attendees_for(&self, date: &str) -> Vec<RsvpEntry> {
        let target = dates::normalize_date(date);
        let mut seen = BTreeSet::new();

        self.rows
            .iter()
            .filter(|row| !row.email.is_empty())
            .filter(|row| dates::normalize_date(&row.rsvp_date) == target)
            .filter(|row| seen.insert(row.email.to_lowercase()))
            .map(|row| RsvpEntry {
                email: row.email.clone(),
                name: row.name.clone(),
                dietary: row.dietary.clone(),
            })
            .collect()
    }
}

/// Dietary notes from a set of RSVPs, without blanks.
#[must_use]
pub fn dietary_notes(entries: &[RsvpEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|e| {
            let who = e.name.as_deref().unwrap_or(&e.email);
            e.dietary.as_ref().map(|d| format!("{}: {}", who, d))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
