//! # Email Composition
//!
//! Every automation entry point ends by sending one email. Subjects and
//! bodies come from [`Templates`], which are injected configuration with
//! built-in defaults, so a deployment can reword them without new code.
//!
//! ## Placeholders
//!
//! Templates use `{name}` placeholders. Unknown placeholders are left as-is.
//!
//! | Placeholder | Value |
//! |---|---|
//! | `{group}` | reading-group name |
//! | `{title}`, `{presenter}` | meeting fields |
//! | `{date}` | canonical `YYYY-MM-DD` |
//! | `{long_date}` | "Tuesday, May 21, 2024" |
//! | `{count}`, `{names}` | attendee count and formatted list |
//! | `{dietary}` | dietary notes, one per line (RSVP summary only) |
//! | `{summary}` | meeting summary; business purpose falls back to `fallback_summary` |
//! | `{time}`, `{location}`, `{readings}`, `{rsvp_link}` | reminder only |
//!
//! Values substituted into the HTML reminder are escaped first.

use crate::citation::Reference;
use crate::names::format_names_list;
use crate::{Attendee, Meeting, SiteConfig, dates};
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const RSVP_SUBJECT: &str = "RSVPs for {title} ({date})";
const RSVP_BODY: &str = "{count} people have RSVPed for \"{title}\", presented by {presenter} on {long_date}.\n\
\n\
Attendees: {names}\n\
\n\
Dietary notes:\n\
{dietary}\n";

const BUSINESS_SUBJECT: &str = "Business purpose: {group} on {date}";
const BUSINESS_BODY: &str = "Business purpose: {group} reading group meeting on {long_date}. \
{presenter} presented \"{title}\" and led the discussion.\n\
\n\
The meeting's academic purpose was to discuss recent research, specifically focusing on {summary}.\n\
\n\
Attendees ({count}): {names}.\n";

const REMINDER_SUBJECT: &str = "Reminder: {title} on {long_date}";
const REMINDER_BODY: &str = "<p>Hi all,</p>\n\
<p>This is a reminder that {presenter} will present <strong>{title}</strong> \
at the {group} reading group on {long_date}{time}{location}.</p>\n\
{summary}{readings}{rsvp_link}<p>See you there!</p>\n";

const FALLBACK_SUMMARY: &str =
    "topics related to cognitive modeling and computational approaches to understanding the mind";

const NO_DIETARY_NOTES: &str = "None reported";

// =============================================================================
// RECIPIENTS & EMAIL
// =============================================================================

/// Email recipients. Parsed from a comma-joined string or built from a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients(Vec<String>);

impl Recipients {
    /// Split a comma-joined list, dropping blanks.
    #[must_use]
    pub fn parse(joined: &str) -> Self {
        Self::from_list(joined.split(','))
    }

    /// Build from a list, trimming and dropping blanks.
    #[must_use]
    pub fn from_list<I, S>(list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            list.into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// "a@x.edu, b@x.edu"
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

/// A fully composed email, ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: Recipients,
    pub subject: String,
    pub body: String,
    pub html: bool,
}

// =============================================================================
// TEMPLATES
// =============================================================================

/// Subject and body templates for each job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    pub rsvp_subject: String,
    pub rsvp_body: String,
    pub business_subject: String,
    pub business_body: String,
    pub reminder_subject: String,
    pub reminder_body: String,
    /// `{summary}` in the business purpose when the meeting has none.
    pub fallback_summary: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            rsvp_subject: RSVP_SUBJECT.to_string(),
            rsvp_body: RSVP_BODY.to_string(),
            business_subject: BUSINESS_SUBJECT.to_string(),
            business_body: BUSINESS_BODY.to_string(),
            reminder_subject: REMINDER_SUBJECT.to_string(),
            reminder_body: REMINDER_BODY.to_string(),
            fallback_summary: FALLBACK_SUMMARY.to_string(),
        }
    }
}

/// Replace `{key}` placeholders with values from `vars`.
#[must_use]
pub fn render_template(template: &str, vars: &BTreeMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn meeting_vars<'a>(group: &str, meeting: &Meeting) -> BTreeMap<&'a str, String> {
    let mut vars = BTreeMap::new();
    vars.insert("group", group.to_string());
    vars.insert("title", meeting.title.clone());
    vars.insert("presenter", meeting.presenter.clone());
    vars.insert("date", meeting.canonical_date());
    vars.insert("long_date", dates::long_date_or_raw(&meeting.date));
    vars
}

fn attendee_names(attendees: &[Attendee]) -> String {
    let names: Vec<&str> = attendees.iter().map(|a| a.name.as_str()).collect();
    format_names_list(&names)
}

// =============================================================================
// COMPOSERS
// =============================================================================

/// The RSVP summary sent to organizers before a meeting.
#[must_use]
pub fn rsvp_summary(
    templates: &Templates,
    group: &str,
    meeting: &Meeting,
    attendees: &[Attendee],
    dietary: &[String],
    to: Recipients,
) -> Email {
    let mut vars = meeting_vars(group, meeting);
    vars.insert("count", attendees.len().to_string());
    vars.insert("names", attendee_names(attendees));
    vars.insert(
        "dietary",
        if dietary.is_empty() {
            NO_DIETARY_NOTES.to_string()
        } else {
            dietary.join("\n")
        },
    );

    Email {
        to,
        subject: render_template(&templates.rsvp_subject, &vars),
        body: render_template(&templates.rsvp_body, &vars),
        html: false,
    }
}

/// The reimbursement "business purpose" statement for a past meeting.
#[must_use]
pub fn business_purpose(
    templates: &Templates,
    group: &str,
    meeting: &Meeting,
    attendees: &[Attendee],
    to: Recipients,
) -> Email {
    let mut vars = meeting_vars(group, meeting);
    vars.insert("count", attendees.len().to_string());
    vars.insert("names", attendee_names(attendees));
    let summary = meeting.summary.trim().trim_end_matches('.');
    vars.insert(
        "summary",
        if summary.is_empty() {
            templates.fallback_summary.clone()
        } else {
            summary.to_string()
        },
    );

    Email {
        to,
        subject: render_template(&templates.business_subject, &vars),
        body: render_template(&templates.business_body, &vars),
        html: false,
    }
}

/// The HTML reminder sent ahead of a meeting. `rsvp_form_url` adds a
/// "please fill out this form" paragraph.
#[must_use]
pub fn reminder(
    templates: &Templates,
    group: &str,
    site: &SiteConfig,
    meeting: &Meeting,
    references: &[Reference],
    rsvp_form_url: Option<&str>,
    to: Recipients,
) -> Email {
    let subject_vars = meeting_vars(group, meeting);

    let mut vars: BTreeMap<&str, String> = subject_vars
        .iter()
        .map(|(k, v)| (*k, escape(v.as_str()).into_owned()))
        .collect();
    vars.insert("time", escape(site.time_suffix().as_str()).into_owned());
    vars.insert(
        "location",
        site.meeting_location
            .as_deref()
            .map(|l| format!(" in {}", escape(l)))
            .unwrap_or_default(),
    );
    vars.insert("summary", summary_html(&meeting.summary));
    vars.insert("readings", readings_html(references));
    vars.insert("rsvp_link", rsvp_link_html(rsvp_form_url));

    Email {
        to,
        subject: render_template(&templates.reminder_subject, &subject_vars),
        body: render_template(&templates.reminder_body, &vars),
        html: true,
    }
}

fn summary_html(summary: &str) -> String {
    let summary = summary.trim();
    if summary.is_empty() || summary.eq_ignore_ascii_case("tbd") {
        return String::new();
    }
    format!("<p>{}</p>\n", escape(summary))
}

fn rsvp_link_html(url: Option<&str>) -> String {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => format!(
            "<p>Please fill out <a href=\"{}\">this form</a> if you plan to attend.</p>\n",
            escape(url)
        ),
        None => String::new(),
    }
}

fn readings_html(references: &[Reference]) -> String {
    if references.is_empty() {
        return String::new();
    }

    let mut html = String::from("<p>Readings:</p>\n<ul>\n");
    for reference in references {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape(reference.link.url.as_str()),
            escape(reference.citation.format_line().as_str())
        ));
    }
    html.push_str("</ul>\n");
    html
}

// =============================================================================
// TESTS
// =============================================================================
