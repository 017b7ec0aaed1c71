//! # Document Loading
//!
//! Explicit loading functions for the registry, the site config and the
//! reminder log. Nothing is cached globally: callers pass the results on.

use crate::error::AppError;
use colloquium_core::primitives::MAX_REGISTRY_FILE_SIZE;
use colloquium_core::{Registry, ReminderLog, SiteConfig};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        AppError::Io(format!("Cannot read metadata of '{}': {}", path.display(), e))
    })?;

    if metadata.len() > max_size {
        return Err(AppError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve `path` and make sure it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AppError> {
    let canonical = path.canonicalize().map_err(|e| {
        AppError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(AppError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn read_document(path: &Path) -> Result<Vec<u8>, AppError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, MAX_REGISTRY_FILE_SIZE)?;
    std::fs::read(&path).map_err(|e| AppError::Io(format!("Cannot read '{}': {}", path.display(), e)))
}

// =============================================================================
// REGISTRY & SITE CONFIG
// =============================================================================

/// Load the meeting registry. A missing or malformed registry is fatal.
pub fn load_registry(path: &Path) -> Result<Registry, AppError> {
    let registry = Registry::from_json(&read_document(path)?)?;
    tracing::debug!("Loaded {} meetings from {}", registry.len(), path.display());
    Ok(registry)
}

/// Load the site config. A missing file yields the defaults; a malformed one
/// is fatal.
pub fn load_site_config(path: &Path) -> Result<SiteConfig, AppError> {
    if !path.exists() {
        tracing::warn!("Site config {} not found, using defaults", path.display());
        return Ok(SiteConfig::default());
    }
    Ok(SiteConfig::from_json(&read_document(path)?)?)
}

// =============================================================================
// REMINDER LOG
// =============================================================================

/// Load the reminder log. A missing file is an empty log; a malformed one is
/// fatal, since sending without it could repeat reminders.
pub fn load_reminder_log(path: &Path) -> Result<ReminderLog, AppError> {
    if !path.exists() {
        tracing::info!("No reminder log at {}, starting empty", path.display());
        return Ok(ReminderLog::new());
    }
    Ok(ReminderLog::from_json(&read_document(path)?)?)
}

/// Persist the reminder log: write a sibling temp file, then rename over the
/// target so a crash never leaves a truncated log.
pub fn save_reminder_log(path: &Path, log: &ReminderLog) -> Result<(), AppError> {
    let json = log.to_json()?;

    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::Io(format!("'{}' has no file name", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let io_err = |e: std::io::Error| AppError::Io(format!("Cannot write '{}': {}", tmp_path.display(), e));
    let mut file = std::fs::File::create(&tmp_path).map_err(io_err)?;
    file.write_all(json.as_bytes()).map_err(io_err)?;
    file.write_all(b"\n").map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    std::fs::rename(&tmp_path, path)
        .map_err(|e| AppError::Io(format!("Cannot replace '{}': {}", path.display(), e)))
}

// =============================================================================
// TESTS
// =============================================================================
