//! Optional TOML configuration.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{BoardError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Storage document path
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// tracing filter directive, e.g. "info" or "taskboard=debug"
    #[serde(default)]
    pub log_level: Option<String>,
    /// Where the TUI writes its log
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskboard")
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("taskboard").join("config.toml"))
}

impl Config {
    /// Missing file yields defaults; a present but invalid file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(BoardError::config(format!("{}: {e}", path.display())));
            }
        };
        toml::from_str(&content).map_err(|e| BoardError::config(format!("{}: {e}", path.display())))
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| app_data_dir().join("storage.json"))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| app_data_dir().join("taskboard.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level(), "warn");
        assert!(config.data_file().ends_with("storage.json"));
    }

    #[test]
    fn test_parses_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data_file = \"/tmp/board.json\"\nlog_level = \"debug\"\n",
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_file(), PathBuf::from("/tmp/board.json"));
        assert_eq!(config.log_level(), "debug");
        assert!(config.log_file().ends_with("taskboard.log"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_file = [").unwrap();
        assert!(matches!(Config::load(&path), Err(BoardError::Config(_))));
    }
}
