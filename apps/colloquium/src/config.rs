//! # Configuration
//!
//! Settings come from an optional TOML file (default `colloquium.toml`)
//! layered over built-in defaults. Credentials are read from the environment
//! and override anything in the file:
//!
//! - `COLLOQUIUM_SHEETS_TOKEN`: spreadsheet API bearer token
//! - `COLLOQUIUM_DIRECTORY_TOKEN`: directory API bearer token
//! - `COLLOQUIUM_MAIL_TOKEN`: mail provider bearer token
//!
//! ```toml
//! group_name = "CompCogSci"
//!
//! [registry]
//! path = "presentations.json"
//!
//! [spreadsheet]
//! spreadsheet_id = "1AbC..."
//! range = "Form Responses 1"
//!
//! [spreadsheet.headers]
//! rsvp_date = "You are RSVP'ing for our meeting on:"
//!
//! [mail]
//! from = "Reading Group <readinggroup@example.edu>"
//! organizers = "ada@example.edu, grace@example.edu"
//! finance = ["finance@example.edu"]
//! mailing_list = "readinggroup-list@example.edu"
//!
//! [reminder]
//! rsvp_form_url = "https://forms.example.edu/rsvp"
//! ```
//!
//! An empty recipient list sends to the `from` address.

use crate::error::AppError;
use colloquium_core::primitives::{DEFAULT_LOOKUP_DELAY_MS, DEFAULT_REMINDER_LEAD_DAYS};
use colloquium_core::{Recipients, RsvpHeaders, Templates};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "colloquium.toml";

pub const SHEETS_TOKEN_ENV: &str = "COLLOQUIUM_SHEETS_TOKEN";
pub const DIRECTORY_TOKEN_ENV: &str = "COLLOQUIUM_DIRECTORY_TOKEN";
pub const MAIL_TOKEN_ENV: &str = "COLLOQUIUM_MAIL_TOKEN";

// =============================================================================
// SECTIONS
// =============================================================================

/// Where the registry-side documents live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub path: PathBuf,
    pub site_config: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("presentations.json"),
            site_config: PathBuf::from("config.json"),
        }
    }
}

/// RSVP spreadsheet access.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpreadsheetConfig {
    pub base_url: String,
    pub spreadsheet_id: Option<String>,
    pub range: String,
    pub token: Option<String>,
    pub headers: RsvpHeaders,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sheets.googleapis.com".to_string(),
            spreadsheet_id: None,
            range: "Form Responses 1".to_string(),
            token: None,
            headers: RsvpHeaders::default(),
        }
    }
}

/// Directory lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Lookups are skipped (email local part used) when unset.
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub lookup_delay_ms: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            lookup_delay_ms: DEFAULT_LOOKUP_DELAY_MS,
        }
    }
}

/// Citation metadata providers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CitationConfig {
    pub enabled: bool,
    pub arxiv_url: String,
    pub doi_url: String,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            arxiv_url: "https://export.arxiv.org/api/query".to_string(),
            doi_url: "https://doi.org".to_string(),
        }
    }
}

/// Mail provider and recipient lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub endpoint: String,
    pub from: String,
    pub token: Option<String>,
    /// RSVP summaries.
    #[serde(deserialize_with = "recipients")]
    pub organizers: Recipients,
    /// Business-purpose drafts.
    #[serde(deserialize_with = "recipients")]
    pub finance: Recipients,
    /// Reminders.
    #[serde(deserialize_with = "recipients")]
    pub mailing_list: Recipients,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://gmail.googleapis.com/gmail/v1/users/me/messages/send".to_string(),
            from: String::new(),
            token: None,
            organizers: Recipients::default(),
            finance: Recipients::default(),
            mailing_list: Recipients::default(),
        }
    }
}

/// Reminder job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub lead_days: i64,
    pub log_path: PathBuf,
    /// RSVP form linked from the reminder, if any.
    pub rsvp_form_url: Option<String>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            lead_days: DEFAULT_REMINDER_LEAD_DAYS,
            log_path: PathBuf::from("reminder_log.json"),
            rsvp_form_url: None,
        }
    }
}

/// Accept either `"a@x, b@x"` or `["a@x", "b@x"]`.
fn recipients<'de, D>(deserializer: D) -> Result<Recipients, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Spec {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Spec::deserialize(deserializer)? {
        Spec::Joined(joined) => Recipients::parse(&joined),
        Spec::List(list) => Recipients::from_list(list),
    })
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Complete configuration for every command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub group_name: String,
    pub page_title: String,
    pub registry: RegistryConfig,
    pub spreadsheet: SpreadsheetConfig,
    pub directory: DirectoryConfig,
    pub citation: CitationConfig,
    pub mail: MailConfig,
    pub reminder: ReminderConfig,
    pub templates: Templates,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            group_name: "Reading Group".to_string(),
            page_title: "Reading Group Schedule".to_string(),
            registry: RegistryConfig::default(),
            spreadsheet: SpreadsheetConfig::default(),
            directory: DirectoryConfig::default(),
            citation: CitationConfig::default(),
            mail: MailConfig::default(),
            reminder: ReminderConfig::default(),
            templates: Templates::default(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `colloquium.toml` in the
    /// working directory is used if present, else the built-in defaults.
    /// Environment credentials are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let config = match path {
            Some(path) => Self::from_toml(&read_config(path)?)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_toml(&read_config(default_path)?)?
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply credentials from `lookup` (normally the process environment).
    /// Empty values are ignored.
    #[must_use]
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(token) = lookup(SHEETS_TOKEN_ENV) {
            self.spreadsheet.token = Some(token);
        }
        if let Some(token) = lookup(DIRECTORY_TOKEN_ENV) {
            self.directory.token = Some(token);
        }
        if let Some(token) = lookup(MAIL_TOKEN_ENV) {
            self.mail.token = Some(token);
        }
        self
    }
}

fn read_config(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("Cannot read {}: {}", path.display(), e)))
}

// =============================================================================
// TESTS
// =============================================================================
