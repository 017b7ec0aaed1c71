//! # Colloquium
//!
//! The reading-group automation binary, as a library so integration tests
//! can drive the jobs, clients and schedule server directly.
//!
//! - `cli`: clap commands, one per scheduled job
//! - `config`: TOML configuration with environment credentials
//! - `loader`: registry, site config and reminder log files
//! - `clients`: spreadsheet, directory, citation and mail services
//! - `jobs`: RSVP summary, business purpose, reminder
//! - `api`: the schedule page server

pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod jobs;
pub mod loader;

pub use config::AppConfig;
pub use error::AppError;
