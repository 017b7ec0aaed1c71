//! Next-meeting notice shown at the top of the schedule page.

use crate::primitives::NO_MEETING_NOTICE;
use crate::{Registry, SiteConfig, dates};
use chrono::NaiveDateTime;

/// One sentence describing when the group meets next.
///
/// - a meeting today: "Our next meeting is today at 3pm PT." (plus the
///   following meeting when there is one)
/// - otherwise the next dated meeting: "Our next meeting is on Tuesday, May 21."
/// - nothing scheduled: "TBD"
#[must_use]
pub fn next_meeting_notice(registry: &Registry, now: NaiveDateTime, site: &SiteConfig) -> String {
    let today = now.date();
    let time = site.time_suffix();
    let following = registry
        .following(today)
        .and_then(|m| m.day())
        .map(dates::weekday_month_day);

    if registry.on_date(today).is_some() {
        return match following {
            Some(next) => format!(
                "Our next meeting is today{}, and the following one will be on {}.",
                time, next
            ),
            None => format!("Our next meeting is today{}.", time),
        };
    }

    match following {
        Some(next) => format!("Our next meeting is on {}.", next),
        None => NO_MEETING_NOTICE.to_string(),
    }
}
