use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use super::sanitize::sanitize_catalog;
use crate::models::Singer;

/// Parse exported catalog JSON. Everything goes through the sanitizer; text
/// that is not JSON at all yields an empty catalog.
pub fn import_catalog(text: &str) -> Vec<Singer> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => sanitize_catalog(&value),
        Err(e) => {
            warn!(error = %e, "catalog import is not valid JSON, starting empty");
            Vec::new()
        }
    }
}

pub fn export_catalog(catalog: &[Singer]) -> Result<String> {
    serde_json::to_string_pretty(catalog).context("Failed to serialize catalog")
}

/// Load the catalog file; a file that does not exist yet is an empty catalog
pub fn load_catalog_file(path: &Path) -> Result<Vec<Singer>> {
    if !path.exists() {
        info!(path = %path.display(), "no catalog file yet, starting empty");
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file '{}'", path.display()))?;
    Ok(import_catalog(&content))
}

pub fn save_catalog_file(path: &Path, catalog: &[Singer]) -> Result<()> {
    let content = export_catalog(catalog)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write catalog file '{}'", path.display()))
}

/// File name for a dated backup, e.g. `discography-backup-2024-03-01.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("discography-backup-{}.json", date.format("%Y-%m-%d"))
}
