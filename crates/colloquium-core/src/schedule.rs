//! # Schedule Page
//!
//! Renders the registry as the HTML schedule table with filter and sort
//! controls. Controls are plain query-string links (`?filter=past&order=desc`)
//! so the page works as a static file and behind the `serve` command alike.
//!
//! - `future` (default): meetings strictly after today
//! - `past`: meetings strictly before today
//! - `all`: everything, including records whose date does not parse

use crate::{Meeting, Registry, SiteConfig, dates};
use chrono::NaiveDate;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which meetings the table shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleFilter {
    #[default]
    Future,
    Past,
    All,
}

impl ScheduleFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::Past => "past",
            Self::All => "all",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Future => "Upcoming",
            Self::Past => "Past",
            Self::All => "All",
        }
    }

    fn admits(self, day: Option<NaiveDate>, today: NaiveDate) -> bool {
        match (self, day) {
            (Self::All, _) => true,
            (Self::Future, Some(d)) => d > today,
            (Self::Past, Some(d)) => d < today,
            (_, None) => false,
        }
    }
}

impl fmt::Display for ScheduleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "future" | "upcoming" => Ok(Self::Future),
            "past" => Ok(Self::Past),
            "all" => Ok(Self::All),
            other => Err(format!("Unknown filter: {}", other)),
        }
    }
}

/// Date order of the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// The opposite order (what the sort button switches to).
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn icon(self) -> &'static str {
        match self {
            Self::Ascending => "⬆️",
            Self::Descending => "⬇️",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Meetings passing `filter`, ordered by date.
///
/// Records without a parseable date come last in either order. The sort is
/// stable, so same-day and undated records keep registry order.
#[must_use]
pub fn select(
    registry: &Registry,
    filter: ScheduleFilter,
    order: SortOrder,
    today: NaiveDate,
) -> Vec<&Meeting> {
    let mut rows: Vec<(Option<NaiveDate>, &Meeting)> = registry
        .meetings()
        .iter()
        .map(|m| (m.day(), m))
        .filter(|(day, _)| filter.admits(*day, today))
        .collect();

    rows.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => a.cmp(b),
            SortOrder::Descending => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    rows.into_iter().map(|(_, m)| m).collect()
}

/// "Tuesday, <strong>May 21</strong>, 2024"; escaped raw text otherwise.
#[must_use]
pub fn format_schedule_date(date: &str) -> String {
    match dates::parse_day(date) {
        Some(day) => format!(
            "{}, <strong>{}</strong>, {}",
            day.format("%A"),
            day.format("%B %-d"),
            day.format("%Y")
        ),
        None => escape(date).into_owned(),
    }
}

fn links_html(meeting: &Meeting) -> String {
    meeting
        .links
        .iter()
        .map(|link| {
            format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                escape(link.url.as_str()),
                escape(link.text.as_str())
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Table body rows for `meetings`.
#[must_use]
pub fn render_rows(meetings: &[&Meeting]) -> String {
    let mut html = String::new();
    for meeting in meetings {
        html.push_str(&format!(
            "<tr>\n  <td>{}</td>\n  <td>{}</td>\n  <td>{}</td>\n  <td>{}</td>\n  <td>{}</td>\n</tr>\n",
            format_schedule_date(&meeting.date),
            escape(meeting.presenter.as_str()),
            escape(meeting.title.as_str()),
            escape(meeting.summary.as_str()),
            links_html(meeting)
        ));
    }
    html
}

fn controls_html(filter: ScheduleFilter, order: SortOrder) -> String {
    let filters = [ScheduleFilter::Future, ScheduleFilter::Past, ScheduleFilter::All]
        .iter()
        .map(|f| {
            let class = if *f == filter { " class=\"active\"" } else { "" };
            format!(
                "<a href=\"?filter={}&amp;order={}\"{}>{}</a>",
                f,
                order,
                class,
                f.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ");

    format!(
        "<nav class=\"controls\">\n  {}\n  <a href=\"?filter={}&amp;order={}\" id=\"sortIcon\">Date {}</a>\n</nav>\n",
        filters,
        filter,
        order.toggled(),
        order.icon()
    )
}

/// Inputs of a full schedule page.
#[derive(Debug, Clone, Copy)]
pub struct PageOptions<'a> {
    pub title: &'a str,
    pub filter: ScheduleFilter,
    pub order: SortOrder,
    pub today: NaiveDate,
    /// Next-meeting notice shown above the table.
    pub notice: &'a str,
}

/// A complete, self-contained HTML page.
#[must_use]
pub fn render_page(registry: &Registry, site: &SiteConfig, options: &PageOptions<'_>) -> String {
    let rows = select(registry, options.filter, options.order, options.today);
    let title = escape(options.title);

    let mut logistics = String::new();
    if let Some(line) = site.schedule_line() {
        logistics.push_str(&format!("<p id=\"meeting-time\">{}</p>\n", escape(line.as_str())));
    }
    if let Some(location) = &site.meeting_location {
        logistics.push_str(&format!(
            "<p id=\"meeting-location\">{}</p>\n",
            escape(location.as_str())
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<p id=\"next-meeting-notice\">{notice}</p>\n{logistics}{controls}<table>\n<thead>\n<tr><th>Date</th><th>Presenter</th><th>Title</th><th>Summary</th><th>Links</th></tr>\n</thead>\n<tbody id=\"presentations\">\n{rows}</tbody>\n</table>\n</body>\n</html>\n",
        title = title,
        notice = escape(options.notice),
        logistics = logistics,
        controls = controls_html(options.filter, options.order),
        rows = render_rows(&rows),
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Link;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("date")
    }

    fn registry() -> Registry {
        Registry::new(vec![
            Meeting::new("Library learning", "Sean Anderson", "2024-05-21"),
            Meeting::new("Social Reasoning", "Erik Brockbank", "2024-06-25"),
            Meeting::new("Language and/or Thought", "Daniel Wurgaft", "2024-06-04")
                .with_link(Link::new("Paper 1: Dissociating", "https://example.org/a?x=1&y=2")),
            Meeting::new("Today", "Someone", "2024-06-01"),
            Meeting::new("TBD", "Nastasia Klevak", "TBD"),
        ])
    }

    fn titles(meetings: &[&Meeting]) -> Vec<String> {
        meetings.iter().map(|m| m.title.clone()).collect()
    }

    #[test]
    fn future_excludes_today_and_sorts_ascending() {
        let registry = registry();
        let rows = select(&registry, ScheduleFilter::Future, SortOrder::Ascending, today());
        assert_eq!(titles(&rows), vec!["Language and/or Thought", "Social Reasoning"]);
    }

    #[test]
    fn past_excludes_today() {
        let registry = registry();
        let rows = select(&registry, ScheduleFilter::Past, SortOrder::Descending, today());
        assert_eq!(titles(&rows), vec!["Library learning"]);
    }

    #[test]
    fn all_descending_puts_undated_last() {
        let registry = registry();
        let rows = select(&registry, ScheduleFilter::All, SortOrder::Descending, today());
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].title, "Social Reasoning");
        assert_eq!(rows[4].title, "TBD");
    }

    #[test]
    fn all_ascending_puts_undated_last() {
        let registry = registry();
        let rows = select(&registry, ScheduleFilter::All, SortOrder::Ascending, today());
        assert_eq!(
            titles(&rows),
            vec![
                "Library learning",
                "Today",
                "Language and/or Thought",
                "Social Reasoning",
                "TBD"
            ]
        );
    }

    #[test]
    fn parse_filter_and_order() {
        assert_eq!("PAST".parse::<ScheduleFilter>(), Ok(ScheduleFilter::Past));
        assert_eq!("upcoming".parse::<ScheduleFilter>(), Ok(ScheduleFilter::Future));
        assert!("soon".parse::<ScheduleFilter>().is_err());
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Descending));
        assert_eq!(SortOrder::Descending.toggled(), SortOrder::Ascending);
    }

    #[test]
    fn schedule_date_cell() {
        assert_eq!(
            format_schedule_date("2024-05-21"),
            "Tuesday, <strong>May 21</strong>, 2024"
        );
        assert_eq!(format_schedule_date("<TBD>"), "&lt;TBD&gt;");
    }

    #[test]
    fn rows_escape_links() {
        let registry = registry();
        let rows = select(&registry, ScheduleFilter::All, SortOrder::Ascending, today());
        let html = render_rows(&rows);
        assert!(html.contains(
            "<a href=\"https://example.org/a?x=1&amp;y=2\" target=\"_blank\">Paper 1: Dissociating</a>"
        ));
        assert!(html.contains("Language and/or Thought"));
    }

    #[test]
    fn page_has_controls_and_notice() {
        let registry = registry();
        let site = SiteConfig {
            meeting_day: Some("Tuesdays".to_string()),
            meeting_time: Some("3-4pm".to_string()),
            ..SiteConfig::default()
        };
        let page = render_page(
            &registry,
            &site,
            &PageOptions {
                title: "Reading Group",
                filter: ScheduleFilter::Future,
                order: SortOrder::Ascending,
                today: today(),
                notice: "Our next meeting is today at 3 PT.",
            },
        );
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<p id=\"next-meeting-notice\">Our next meeting is today at 3 PT.</p>"));
        assert!(page.contains("<p id=\"meeting-time\">Tuesdays, 3-4pm</p>"));
        assert!(page.contains("href=\"?filter=past&amp;order=asc\""));
        assert!(page.contains("href=\"?filter=future&amp;order=desc\" id=\"sortIcon\""));
        assert!(!page.contains("Library learning"));
    }
}
