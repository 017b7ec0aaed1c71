//! # External Collaborators
//!
//! Every network service a job talks to sits behind a small async trait so
//! jobs can run against in-memory fakes in tests.
//!
//! - [`RsvpSource`]: the RSVP spreadsheet ([`SheetsClient`])
//! - [`NameDirectory`]: email to display name ([`DirectoryClient`])
//! - [`CitationSource`]: paper metadata ([`CitationClient`])
//! - [`MailTransport`]: outgoing email ([`HttpMailer`], [`DryRunMailer`])

mod citation;
mod directory;
mod mail;
mod sheets;

pub use citation::CitationClient;
pub use directory::DirectoryClient;
pub use mail::{DryRunMailer, HttpMailer, build_rfc2822};
pub use sheets::SheetsClient;

use async_trait::async_trait;
use colloquium_core::{Citation, CitationTarget, Email};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cannot reach the service.
    #[error("Cannot connect to {0}")]
    ConnectionFailed(String),

    /// 401/403: invalid or missing credentials.
    #[error("Unauthorized: invalid or missing credentials")]
    Unauthorized,

    /// 429 Too Many Requests.
    #[error("Rate limited: too many requests")]
    RateLimited,

    /// Any other non-success status.
    #[error("HTTP error ({0}): {1}")]
    Status(u16, String),

    /// The response body could not be interpreted.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The client lacks a required setting (endpoint, id, recipients).
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

/// Map a response status onto [`ClientError`], passing successes through.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ClientError::Unauthorized);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ClientError::RateLimited);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Status(status.as_u16(), body));
    }
    Ok(resp)
}

/// Send a request, mapping transport failures to [`ClientError::ConnectionFailed`].
pub(crate) async fn send(
    req: reqwest::RequestBuilder,
    target: &str,
) -> Result<reqwest::Response, ClientError> {
    req.send()
        .await
        .map_err(|e| ClientError::ConnectionFailed(format!("{target}: {e}")))
}

// =============================================================================
// TRAITS
// =============================================================================

/// Source of raw RSVP rows, header row first.
#[async_trait]
pub trait RsvpSource: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, ClientError>;
}

/// Directory lookup. `Ok(None)` when the person is unknown.
#[async_trait]
pub trait NameDirectory: Send + Sync {
    async fn lookup_name(&self, email: &str) -> Result<Option<String>, ClientError>;
}

/// Bibliographic metadata provider.
#[async_trait]
pub trait CitationSource: Send + Sync {
    async fn lookup(&self, target: &CitationTarget) -> Result<Citation, ClientError>;
}

/// Outgoing mail.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), ClientError>;

    /// Whether a successful `send` actually delivered the message.
    fn delivers(&self) -> bool {
        true
    }
}

/// Spreadsheet used when no spreadsheet id is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpreadsheet;

#[async_trait]
impl RsvpSource for NoSpreadsheet {
    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, ClientError> {
        Err(ClientError::NotConfigured("spreadsheet.spreadsheet_id".to_string()))
    }
}

/// Directory used when no service is configured: every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

#[async_trait]
impl NameDirectory for NoDirectory {
    async fn lookup_name(&self, _email: &str) -> Result<Option<String>, ClientError> {
        Ok(None)
    }
}
