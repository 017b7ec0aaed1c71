//! # colloquium-core
//!
//! The logic behind the reading-group automation - THE LOGIC.
//!
//! This crate owns everything that does not touch the network:
//! - `types`: registry records, site config, attendees, errors
//! - `dates`: date normalization across registry and spreadsheet formats
//! - `registry`: meeting selection relative to an injected "now"
//! - `rsvp`: RSVP spreadsheet parsing
//! - `reminder_log`: the send-once record for reminders
//! - `citation`: identifier extraction and citation formatting
//! - `compose`: templated email composition
//! - `schedule` / `notice`: the schedule page and next-meeting notice
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no clock: callers pass "now" in
//! - No file I/O: the binary reads and writes files, this crate parses and
//!   serializes documents
//! - Date handling never fails; unparseable input passes through unchanged

// =============================================================================
// MODULES
// =============================================================================

pub mod citation;
pub mod compose;
pub mod dates;
pub mod names;
pub mod notice;
pub mod primitives;
pub mod registry;
pub mod reminder_log;
pub mod rsvp;
pub mod schedule;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{Attendee, CoreError, Link, Meeting, SiteConfig};

// =============================================================================
// RE-EXPORTS: Logic
// =============================================================================

pub use citation::{Author, Citation, CitationTarget, Reference};
pub use compose::{Email, Recipients, Templates};
pub use dates::{normalize_date, same_day};
pub use names::{format_names_list, name_from_email};
pub use notice::next_meeting_notice;
pub use registry::Registry;
pub use reminder_log::ReminderLog;
pub use rsvp::{RsvpEntry, RsvpHeaders, RsvpTable};
pub use schedule::{PageOptions, ScheduleFilter, SortOrder};
