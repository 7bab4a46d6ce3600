//! Shared config directory for CallFlowHQ tools
//!
//! Settings and credentials live as JSON files under
//! `~/.config/callflowhq/`. [`init`] creates the directory at startup; the
//! remaining helpers read, write and remove individual files.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "callflowhq";

/// Create the config directory if needed and return its path
pub fn init() -> Result<PathBuf> {
    let dir = config_dir().ok_or_else(no_config_dir)?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

/// `~/.config/callflowhq/` (platform equivalent elsewhere)
pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(APP_DIR))
}

/// Path of `filename` inside the config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    Some(config_dir()?.join(filename))
}

pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|path| path.is_file())
}

/// Read `filename` from the config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    load_json_file(&config_path(filename).ok_or_else(no_config_dir)?)
}

pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Write `value` as pretty JSON, creating parent directories.
///
/// The file is written next to its destination and renamed into place, so a
/// reader never sees a half-written token or settings file.
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_vec_pretty(value)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json).with_context(|| format!("Failed to write {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("Failed to move {} into place", path.display()))
}

/// Delete a file if present; a missing file is not an error
pub fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            Err(e).with_context(|| format!("Failed to remove {}", path.display()))
        }
        _ => Ok(()),
    }
}

fn no_config_dir() -> anyhow::Error {
    anyhow!("Could not determine config directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        base_url: String,
        retries: u32,
    }

    fn sample() -> Sample {
        Sample {
            base_url: "https://api.example.com".to_string(),
            retries: 1,
        }
    }

    #[test]
    fn test_paths_live_under_app_dir() {
        if let Some(path) = config_path("dashboard.json") {
            assert!(path.ends_with("callflowhq/dashboard.json"));
            assert_eq!(path.parent(), config_dir().as_deref());
        }
    }

    #[test]
    fn test_save_creates_parents_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");

        save_json_file(&path, &sample()).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(load_json_file::<Sample>(&path).unwrap(), sample());
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_json_file::<Sample>(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.json"));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let err = load_json_file::<Sample>(&broken).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_remove_file_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api-token.json");
        remove_file(&path).unwrap();

        save_json_file(&path, &sample()).unwrap();
        remove_file(&path).unwrap();
        assert!(!path.exists());
    }
}
