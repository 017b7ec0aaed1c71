//! # Primitives
//!
//! Fixed constants shared by the core and the binary.
//!
//! Header texts are the external contract with the RSVP form: columns are
//! located by exact match, so renaming a form question breaks the lookup.

/// Canonical calendar-day format.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of timestamps written to the reminder log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Header of the email column in the RSVP spreadsheet.
pub const DEFAULT_EMAIL_HEADER: &str = "Email Address";

/// Header of the RSVP-date question in the RSVP spreadsheet.
pub const DEFAULT_RSVP_DATE_HEADER: &str = "You are RSVP'ing for our meeting on:";

/// Header of the first-name question in the RSVP spreadsheet.
pub const DEFAULT_FIRST_NAME_HEADER: &str = "First name:";

/// Header of the surname question in the RSVP spreadsheet.
pub const DEFAULT_SURNAME_HEADER: &str = "Surname:";

/// Header of the dietary-restrictions question in the RSVP spreadsheet.
pub const DEFAULT_DIETARY_HEADER: &str = "report dietary restrictions here:";

/// How many days ahead of a meeting the reminder goes out.
pub const DEFAULT_REMINDER_LEAD_DAYS: i64 = 8;

/// Fixed pause between directory lookups, in milliseconds.
pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 1000;

/// Used in notices when the site config has no meeting time.
pub const DEFAULT_TIME_SUFFIX: &str = " at 3pm PT";

/// Notice text when nothing is scheduled.
pub const NO_MEETING_NOTICE: &str = "TBD";

/// Maximum size of the registry file (4 MB).
pub const MAX_REGISTRY_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Maximum number of meetings accepted in a registry.
pub const MAX_REGISTRY_MEETINGS: usize = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_header_matches_form_export() {
        assert_eq!(DEFAULT_EMAIL_HEADER, "Email Address");
    }

    #[test]
    fn reminder_goes_out_eight_days_ahead() {
        assert_eq!(DEFAULT_REMINDER_LEAD_DAYS, 8);
    }
}
