//! Mail transports.
//!
//! [`HttpMailer`] posts a base64url-encoded RFC 2822 message as
//! `{"raw": "..."}` to the provider's send endpoint. [`DryRunMailer`] only logs.

use super::{ClientError, MailTransport, check_status, send};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use colloquium_core::Email;
use serde::Serialize;

#[derive(Serialize)]
struct RawMessage {
    raw: String,
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

/// Header values are single-line; CR and LF become spaces.
fn header_value(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Address part of `Name <addr>`, or the whole value trimmed.
fn sender_address(from: &str) -> &str {
    match (from.find('<'), from.rfind('>')) {
        (Some(start), Some(end)) if start < end => from[start + 1..end].trim(),
        _ => from.trim(),
    }
}

/// Render `email` as an RFC 2822 message with CRLF line endings.
#[must_use]
pub fn build_rfc2822(from: &str, email: &Email) -> String {
    render(from, &email.to.joined(), email)
}

fn render(from: &str, to: &str, email: &Email) -> String {
    let content_type = if email.html { "text/html" } else { "text/plain" };

    let mut message = String::new();
    if !from.is_empty() {
        message.push_str(&format!("From: {}\r\n", header_value(from)));
    }
    message.push_str(&format!("To: {}\r\n", header_value(to)));
    message.push_str(&format!(
        "Subject: {}\r\n",
        encode_header(&header_value(&email.subject))
    ));
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str(&format!("Content-Type: {content_type}; charset=\"UTF-8\"\r\n"));
    message.push_str("Content-Transfer-Encoding: 8bit\r\n");
    message.push_str("\r\n");
    for line in email.body.lines() {
        message.push_str(line);
        message.push_str("\r\n");
    }
    message
}

// =============================================================================
// HTTP MAILER
// =============================================================================

#[derive(Clone)]
pub struct HttpMailer {
    http: reqwest::Client,
    endpoint: String,
    from: String,
    token: Option<String>,
}

impl HttpMailer {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        from: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            from: from.into(),
            token,
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), ClientError> {
        let to = if email.to.is_empty() {
            let sender = sender_address(&self.from);
            if sender.is_empty() {
                return Err(ClientError::NotConfigured("no recipients".to_string()));
            }
            tracing::warn!("No recipients configured, sending to {}", sender);
            sender.to_string()
        } else {
            email.to.joined()
        };

        let body = RawMessage {
            raw: URL_SAFE.encode(render(&self.from, &to, email)),
        };
        let mut req = self.http.post(&self.endpoint).json(&body);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        check_status(send(req, &self.endpoint).await?).await?;
        tracing::info!(
            to = %to,
            subject = %email.subject,
            "Email sent"
        );
        Ok(())
    }
}

// =============================================================================
// DRY RUN
// =============================================================================

/// Logs the message instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunMailer;

#[async_trait]
impl MailTransport for DryRunMailer {
    async fn send(&self, email: &Email) -> Result<(), ClientError> {
        tracing::info!(
            to = %email.to.joined(),
            subject = %email.subject,
            html = email.html,
            "Dry run: email not sent"
        );
        tracing::debug!("{}", email.body);
        Ok(())
    }

    fn delivers(&self) -> bool {
        false
    }
}

// =============================================================================
// TESTS
// =============================================================================
