//! # Application Errors
//!
//! Everything that can abort a run. Sub-step failures (spreadsheet,
//! directory, citation) never surface here: jobs log them and fall back.

use crate::clients::ClientError;
use colloquium_core::CoreError;
use thiserror::Error;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum AppError {
    /// A registry, site config or reminder log document is malformed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The configuration file is unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// An external service failed where no fallback exists.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The final email could not be sent.
    #[error("Failed to send email: {0}")]
    Send(ClientError),

    /// A command-line argument could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
