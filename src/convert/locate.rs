//! Converter detection
//!
//! Finds an installed LibreOffice `soffice` binary. Resolved once at startup
//! and handed to [`Converter`](super::Converter); nothing here is cached
//! process-wide.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::Config;

/// Known install locations, in search order.
#[cfg(not(target_os = "windows"))]
const KNOWN_LOCATIONS: &[&str] = &[
    "/usr/bin/libreoffice",
    "/usr/bin/soffice",
    "/usr/local/bin/libreoffice",
    "/usr/local/bin/soffice",
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
];

#[cfg(target_os = "windows")]
const KNOWN_LOCATIONS: &[&str] = &[
    r"C:\Program Files\LibreOffice\program\soffice.exe",
    r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
];

/// Binary names tried on `PATH` after the known locations.
const PATH_NAMES: &[&str] = &["soffice", "libreoffice"];

/// Scans candidate locations for the office converter.
#[derive(Debug, Clone)]
pub struct ConverterLocator {
    /// Configured binary; authoritative when set.
    explicit: Option<PathBuf>,
    candidates: Vec<PathBuf>,
    search_path_env: bool,
}

impl Default for ConverterLocator {
    fn default() -> Self {
        Self {
            explicit: None,
            candidates: KNOWN_LOCATIONS.iter().map(PathBuf::from).collect(),
            search_path_env: true,
        }
    }
}

impl ConverterLocator {
    /// Locator over the built-in install locations plus `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator honouring `soffice_path` and `search_paths` from config.
    pub fn from_config(config: &Config) -> Self {
        let mut locator = Self::new().with_search_paths(config.search_paths.clone());
        if let Some(path) = &config.soffice_path {
            locator = locator.with_explicit_path(path);
        }
        locator
    }

    /// Use exactly this binary.
    #[must_use]
    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Prepend extra locations ahead of the built-in list.
    #[must_use]
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        let builtin = std::mem::take(&mut self.candidates);
        self.candidates = paths;
        self.candidates.extend(builtin);
        self
    }

    /// Replace the candidate list entirely.
    #[must_use]
    pub fn with_candidates(mut self, paths: Vec<PathBuf>) -> Self {
        self.candidates = paths;
        self
    }

    /// Enable or disable the `PATH` fallback.
    #[must_use]
    pub fn with_path_lookup(mut self, enabled: bool) -> Self {
        self.search_path_env = enabled;
        self
    }

    /// Return the first existing converter binary.
    ///
    /// # Errors
    ///
    /// [`ConvertError::ConverterNotFound`] listing every location tried.
    pub fn locate(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            if path.is_file() {
                debug!("Using configured converter {}", path.display());
                return Ok(path.clone());
            }
            return Err(ConvertError::ConverterNotFound {
                searched: vec![path.clone()],
            });
        }

        if let Some(found) = self.candidates.iter().find(|p| p.is_file()) {
            debug!("Found converter at {}", found.display());
            return Ok(found.clone());
        }

        if self.search_path_env {
            for name in PATH_NAMES {
                if let Ok(found) = which::which(name) {
                    debug!("Found converter on PATH: {}", found.display());
                    return Ok(found);
                }
            }
        }

        let mut searched = self.candidates.clone();
        if self.search_path_env {
            searched.extend(PATH_NAMES.iter().map(|n| PathBuf::from(format!("$PATH/{n}"))));
        }
        Err(ConvertError::ConverterNotFound { searched })
    }
}
