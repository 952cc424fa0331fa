//! Runtime configuration loaded from `~/.config/docbridge/config.toml`.
//!
//! Precedence, lowest to highest: built-in defaults, the config file,
//! `DOCBRIDGE_*` environment variables, command-line flags (applied by the
//! binary).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default converter timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Converter and workspace settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Explicit converter binary. When set, no other location is tried.
    pub soffice_path: Option<PathBuf>,
    /// Extra install locations, searched before the built-in list.
    pub search_paths: Vec<PathBuf>,
    /// Root directory for per-job scratch directories.
    pub workspace_dir: PathBuf,
    /// Upper bound on a single converter run.
    pub timeout_secs: u64,
    /// Run each conversion with its own LibreOffice user profile.
    pub isolate_profile: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            soffice_path: None,
            search_paths: Vec::new(),
            workspace_dir: std::env::temp_dir().join("docbridge"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            isolate_profile: true,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(&config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Apply `DOCBRIDGE_SOFFICE`, `DOCBRIDGE_WORKSPACE` and
    /// `DOCBRIDGE_TIMEOUT_SECS`. Unparseable timeouts are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("DOCBRIDGE_SOFFICE").filter(|v| !v.is_empty()) {
            self.soffice_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = var("DOCBRIDGE_WORKSPACE").filter(|v| !v.is_empty()) {
            self.workspace_dir = PathBuf::from(dir);
        }
        if let Some(secs) = var("DOCBRIDGE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = secs;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Return the path to the config file.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docbridge")
        .join("config.toml")
}
