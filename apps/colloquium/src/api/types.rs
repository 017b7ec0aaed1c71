//! # API Request/Response Types

use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub meetings: usize,
}

impl HealthResponse {
    #[must_use]
    pub fn ok(meetings: usize) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            meetings,
        }
    }
}

// =============================================================================
// PAGE QUERY
// =============================================================================

/// `GET /?filter=past&order=desc`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

// =============================================================================
// NEXT MEETING
// =============================================================================

/// `GET /next-meeting`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextMeetingResponse {
    pub notice: String,
    /// Canonical date of the next upcoming meeting, if any.
    pub date: Option<String>,
    pub title: Option<String>,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}
