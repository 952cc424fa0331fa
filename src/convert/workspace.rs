//! Scratch workspace for conversion artifacts.
//!
//! Every conversion runs inside its own `<root>/<uuid>/` directory. A
//! [`ScratchJob`] owns that directory: artifacts are tracked as they are
//! created and removed when the job is dropped, whichever way the
//! conversion ended.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ConvertError, Result};

/// Root directory shared by all jobs.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the root directory (and its parents) exist. Idempotent.
    pub async fn create_scratch_dir(&self) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ConvertError::workspace(&self.root, e))?;
        Ok(self.root.clone())
    }

    /// Create a job-private directory under the root.
    pub async fn begin_job(&self) -> Result<ScratchJob> {
        self.create_scratch_dir().await?;

        let id = Uuid::new_v4();
        let dir = self.root.join(id.to_string());
        tokio::fs::create_dir(&dir)
            .await
            .map_err(|e| ConvertError::workspace(&dir, e))?;
        debug!("Created scratch dir {}", dir.display());

        Ok(ScratchJob {
            id,
            dir,
            artifacts: Vec::new(),
        })
    }
}

/// One job's scratch directory. Cleans up on drop.
#[derive(Debug)]
pub struct ScratchJob {
    id: Uuid,
    dir: PathBuf,
    artifacts: Vec<PathBuf>,
}

impl ScratchJob {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record an artifact for removal when the job ends.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.artifacts.push(path.into());
    }

    /// Write `bytes` as `name` inside the job directory and track it.
    pub async fn write_artifact(&mut self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = write_artifact(&self.dir, name, bytes).await?;
        self.track(&path);
        Ok(path)
    }

    /// File names currently in the job directory, in listing order.
    pub async fn snapshot(&self) -> Result<Vec<String>> {
        list_dir(&self.dir).await
    }
}

impl Drop for ScratchJob {
    fn drop(&mut self) {
        for path in &self.artifacts {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }

        // Sweep anything the converter left that we never saw.
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove scratch dir {}: {}", self.dir.display(), e),
        }
    }
}

/// Write `bytes` to `dir/name`.
pub async fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ConvertError::workspace(&path, e))?;
    Ok(path)
}

/// Read a whole artifact.
pub async fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| ConvertError::workspace(path, e))
}

/// List file names in `dir` in the order the OS returns them.
pub async fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ConvertError::workspace(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ConvertError::workspace(dir, e))?
    {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Files present in `after` but not in `before` whose name ends with
/// `.{extension}` (ASCII case-insensitive), in `after` order.
///
/// The converter's output name is not reliably derivable from the input
/// name, so output is identified by what appeared during the run.
pub fn new_artifacts(before: &[String], after: &[String], extension: &str) -> Vec<String> {
    let before: HashSet<&str> = before.iter().map(String::as_str).collect();
    let suffix = format!(".{}", extension.to_ascii_lowercase());

    after
        .iter()
        .filter(|name| !before.contains(name.as_str()))
        .filter(|name| name.to_ascii_lowercase().ends_with(&suffix))
        .cloned()
        .collect()
}
