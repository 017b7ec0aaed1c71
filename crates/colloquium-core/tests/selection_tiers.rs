//! # Selection Tier Tests
//!
//! End-to-end checks of the behaviour every entry point relies on.
//!
//! ## Tiers
//! - T0: Date equality across source formats
//! - T1: Attendee name formatting
//! - T2: Meeting selection
//! - T3: Reminder idempotence

use chrono::{NaiveDate, NaiveDateTime};
use colloquium_core::{Meeting, Registry, ReminderLog};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, 0, 0))
        .expect("valid timestamp")
}

// =============================================================================
// TIER T0: DATE EQUALITY
// =============================================================================

mod t0_date_equality {
    use colloquium_core::normalize_date;

    /// T0.1: Registry and spreadsheet spellings of the same day agree.
    #[test]
    fn four_digit_spellings_agree() {
        for input in ["2024-05-21", "5/21/2024", "05/21/2024"] {
            assert_eq!(normalize_date(input), "2024-05-21", "input {input}");
        }
    }

    /// T0.2: The two-digit year is kept as written (documented behaviour).
    #[test]
    fn two_digit_year_is_kept() {
        assert_eq!(normalize_date("5/21/24"), "24-05-21");
    }

    /// T0.3: Unparseable input is returned unchanged.
    #[test]
    fn unparseable_unchanged() {
        assert_eq!(normalize_date("next Tuesday"), "next Tuesday");
    }
}

// =============================================================================
// TIER T1: NAMES
// =============================================================================

mod t1_names {
    use colloquium_core::format_names_list;

    #[test]
    fn names_list() {
        let none: [&str; 0] = [];
        assert_eq!(format_names_list(&none), "");
        assert_eq!(format_names_list(&["A"]), "A");
        assert_eq!(format_names_list(&["A", "B"]), "A and B");
        assert_eq!(format_names_list(&["A", "B", "C"]), "A, B, and C");
    }
}

// =============================================================================
// TIER T2: MEETING SELECTION
// =============================================================================

mod t2_selection {
    use super::*;

    fn registry() -> Registry {
        Registry::new(vec![
            Meeting::new("Past", "P", "2024-01-01"),
            Meeting::new("Future", "F", "2030-01-01"),
        ])
    }

    /// T2.1: Most recent past meeting between a past and a future record.
    #[test]
    fn most_recent_past_between() {
        let registry = registry();
        let found = registry.most_recent_past(at(2025, 6, 1, 12));
        assert_eq!(found.map(|m| m.date.as_str()), Some("2024-01-01"));
    }

    /// T2.2: Next upcoming from the same "now".
    #[test]
    fn next_upcoming_between() {
        let registry = registry();
        let found = registry.next_upcoming(at(2025, 6, 1, 12).date());
        assert_eq!(found.map(|m| m.date.as_str()), Some("2030-01-01"));
    }

    /// T2.3: Nothing is past before the first meeting has ended.
    #[test]
    fn nothing_past_yet() {
        let registry = registry();
        assert!(registry.most_recent_past(at(2024, 1, 1, 23)).is_none());
    }
}

// =============================================================================
// TIER T3: REMINDER IDEMPOTENCE
// =============================================================================

mod t3_reminder_idempotence {
    use super::*;

    /// T3.1: A meeting 8 days out is selected once, then never again.
    #[test]
    fn eight_days_out_selected_once() {
        let now = at(2024, 5, 13, 9);
        let registry = Registry::new(vec![Meeting::new("Library learning", "Sean", "2024-05-21")]);
        let mut log = ReminderLog::new();

        let first = log.pending_reminder(&registry, now, 8).map(|m| m.date.clone());
        assert_eq!(first.as_deref(), Some("2024-05-21"));

        if let Some(date) = first {
            log.record(&date, now);
        }
        let reloaded = ReminderLog::from_json(log.to_json().expect("serialize").as_bytes())
            .expect("parse");

        assert!(reloaded.pending_reminder(&registry, now, 8).is_none());
    }
}
