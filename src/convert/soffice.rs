//! LibreOffice subprocess bridge
//!
//! Runs `soffice --headless --convert-to <format> --outdir <dir> <file>` as an
//! awaited tokio child process. The runtime stays free while the converter
//! works; a timeout kills runaway converters. On unix the converter runs in
//! its own process group, so the kill also reaches the helpers it forked.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::{ConvertError, Result};

/// Headless `soffice` invocation settings.
#[derive(Debug, Clone)]
pub struct Soffice {
    /// Path to the soffice binary
    soffice_path: PathBuf,
    timeout: Duration,
    /// Give each run a private user profile inside its output directory.
    isolate_profile: bool,
}

impl Soffice {
    pub fn new(soffice_path: impl Into<PathBuf>) -> Self {
        Self {
            soffice_path: soffice_path.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            isolate_profile: true,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Toggle the per-run profile. A shared profile makes a second
    /// concurrent soffice hand its work to the first and exit without output.
    #[must_use]
    pub fn with_isolated_profile(mut self, enabled: bool) -> Self {
        self.isolate_profile = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.soffice_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build soffice command arguments
    fn build_args(&self, format: &str, outdir: &Path, input: &Path) -> Vec<String> {
        let mut args = Vec::new();

        if self.isolate_profile {
            let profile = outdir.join(".profile");
            args.push(format!("-env:UserInstallation=file://{}", profile.display()));
        }

        args.extend(
            ["--headless", "--norestore", "--convert-to", format, "--outdir"]
                .iter()
                .map(std::string::ToString::to_string),
        );
        args.push(outdir.to_string_lossy().into_owned());
        args.push(input.to_string_lossy().into_owned());

        args
    }

    /// Convert `input` to `format`, placing the result in `outdir`.
    ///
    /// Success only means the process exited with status 0; the caller
    /// decides whether a usable file appeared.
    pub async fn run(&self, format: &str, outdir: &Path, input: &Path) -> Result<()> {
        let args = self.build_args(format, outdir, input);
        debug!("soffice args: {:?}", args);

        let mut command = Command::new(&self.soffice_path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let child = command
            .spawn()
            .map_err(|source| ConvertError::SubprocessLaunch {
                program: self.soffice_path.clone(),
                source,
            })?;
        let pid = child.id();

        let Ok(waited) = tokio::time::timeout(self.timeout, child.wait_with_output()).await else {
            warn!(
                "soffice did not finish within {}s, killing it",
                self.timeout.as_secs()
            );
            if let Some(pid) = pid {
                kill_process_group(pid);
            }
            return Err(ConvertError::Timeout {
                seconds: self.timeout.as_secs(),
            });
        };

        let output = waited.map_err(|e| ConvertError::SubprocessError {
            status: None,
            stderr: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            warn!("soffice stderr: {}", stderr.trim());
            return Err(ConvertError::SubprocessError {
                status: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        debug!("soffice stdout: {}", stdout.trim());
        if !stderr.trim().is_empty() {
            debug!("soffice stderr: {}", stderr.trim());
        }
        Ok(())
    }

    /// Check if the binary answers `--version`
    pub async fn check_available(&self) -> bool {
        Command::new(&self.soffice_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    let Ok(pgid) = i32::try_from(pid) else {
        return;
    };
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
        debug!(
            "kill of process group {} failed: {}",
            pgid,
            std::io::Error::last_os_error()
        );
    }
}

/// Without process groups only the direct child is killed, on drop.
#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

/// File extension a `--convert-to` target produces (`"html:XHTML Writer
/// File:UTF8"` → `"html"`).
pub fn target_extension(format: &str) -> &str {
    format.split(':').next().unwrap_or(format)
}
