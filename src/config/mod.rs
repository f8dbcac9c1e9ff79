//! Configuration module for RSearch
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "RSEARCH_SETTINGS_PATH";

/// Load settings from `path` (defaults when `None`), then overlay
/// environment variables
pub fn load_from(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    settings.merge_env();
    Ok(settings)
}

/// Find a settings file, checking the environment variable first
pub fn settings_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("rsearch/settings.yml"));
    }

    candidates.into_iter().find(|p| p.exists())
}
