//! Word ⇄ HTML conversion through headless LibreOffice.
//!
//! [`Converter`] is the orchestrator. Each call gets its own
//! [`ScratchJob`]: the input is staged there, the converter runs as a
//! subprocess, the output is identified by diffing the directory listing,
//! and the job directory is purged when the call returns.
//!
//! # Example
//!
//! ```rust,no_run
//! use docbridge::{Config, Converter};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let converter = Converter::from_config(&Config::load()?)?;
//! let docx = converter.html_to_docx("<h1>Hello</h1>").await?;
//! let html = converter.docx_to_html(&docx).await?;
//! # Ok(())
//! # }
//! ```

pub mod locate;
pub mod payload;
pub mod soffice;
pub mod workspace;

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;
use tracing::{debug, error, info};

use crate::error::{ConvertError, Result};
use crate::Config;

pub use locate::ConverterLocator;
pub use payload::{ExportRequest, ImportResponse, DOCX_MIME, EXPORT_FILENAME};
pub use soffice::Soffice;
pub use workspace::{new_artifacts, ScratchJob, Workspace};

static DOCTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<!DOCTYPE html>").expect("valid doctype regex"));

/// Which way a job converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    /// `.docx` in, HTML out.
    BinaryToMarkup,
    /// HTML in, `.docx` out.
    MarkupToBinary,
}

impl ConversionDirection {
    /// Extension the staged input file is given.
    pub fn input_extension(self) -> &'static str {
        match self {
            Self::BinaryToMarkup => "docx",
            Self::MarkupToBinary => "html",
        }
    }

    /// `--convert-to` target.
    pub fn target_format(self) -> &'static str {
        match self {
            Self::BinaryToMarkup => "html",
            Self::MarkupToBinary => "docx",
        }
    }
}

impl fmt::Display for ConversionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryToMarkup => f.write_str("DOCX→HTML"),
            Self::MarkupToBinary => f.write_str("HTML→DOCX"),
        }
    }
}

/// Conversion orchestrator.
#[derive(Debug, Clone)]
pub struct Converter {
    soffice: Soffice,
    workspace: Workspace,
}

impl Converter {
    pub fn new(soffice: Soffice, workspace: Workspace) -> Self {
        Self { soffice, workspace }
    }

    /// Locate the converter and set up the workspace from `config`.
    ///
    /// # Errors
    ///
    /// [`ConvertError::ConverterNotFound`] when no binary is installed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = ConverterLocator::from_config(config).locate()?;
        info!("Using converter {}", path.display());

        let soffice = Soffice::new(path)
            .with_timeout(config.timeout())
            .with_isolated_profile(config.isolate_profile);
        Ok(Self::new(soffice, Workspace::new(&config.workspace_dir)))
    }

    pub fn soffice(&self) -> &Soffice {
        &self.soffice
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Convert a `.docx` into HTML.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`ConvertError::ConversionFailed`].
    pub async fn docx_to_html(&self, bytes: &[u8]) -> Result<String> {
        let html = self
            .convert_bytes(bytes, ConversionDirection::BinaryToMarkup)
            .await
            .map_err(|e| {
                error!("DOCX→HTML conversion failed: {}", e);
                e.into_conversion_failed()
            })?;
        Ok(String::from_utf8_lossy(&html).into_owned())
    }

    /// Convert HTML (fragment or full document) into a `.docx`.
    ///
    /// # Errors
    ///
    /// [`ConvertError::SubprocessLaunch`] / [`ConvertError::SubprocessError`]
    /// when the converter cannot run or fails, and
    /// [`ConvertError::OutputNotProduced`] when it exits cleanly without a
    /// `.docx`.
    pub async fn html_to_docx(&self, markup: &str) -> Result<Vec<u8>> {
        let document = normalize_markup(markup);
        self.convert_bytes(document.as_bytes(), ConversionDirection::MarkupToBinary)
            .await
            .inspect_err(|e| error!("HTML→DOCX conversion failed: {}", e))
    }

    /// Library-style call: bytes in, converted bytes out.
    pub async fn convert_bytes(
        &self,
        input: &[u8],
        direction: ConversionDirection,
    ) -> Result<Vec<u8>> {
        let start = Instant::now();
        let mut job = self.workspace.begin_job().await?;
        info!("{} job {} started ({} bytes)", direction, job.id(), input.len());

        let name = format!("{}.{}", job.id(), direction.input_extension());
        let input_path = job.write_artifact(&name, input).await?;

        let output = self
            .run_in_job(&mut job, &input_path, direction.target_format())
            .await?;

        info!(
            "{} job {} finished: {} bytes in {:.1}ms",
            direction,
            job.id(),
            output.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(output)
    }

    /// Run the converter on a staged input and read back what it produced.
    async fn run_in_job(&self, job: &mut ScratchJob, input: &Path, format: &str) -> Result<Vec<u8>> {
        let extension = soffice::target_extension(format);

        let before = job.snapshot().await?;
        self.soffice.run(format, job.dir(), input).await?;
        let after = job.snapshot().await?;

        let produced = new_artifacts(&before, &after, extension);
        for name in &produced {
            job.track(job.dir().join(name));
        }
        debug!("New files after conversion: {:?}", produced);

        let Some(first) = produced.first() else {
            return Err(ConvertError::OutputNotProduced {
                dir: job.dir().to_path_buf(),
                extension: extension.to_string(),
                listing: after,
            });
        };

        let path = job.dir().join(first);
        debug!("Reading converted file {}", path.display());
        workspace::read_artifact(&path).await
    }
}

/// Wrap a fragment in a minimal complete document. Markup that already
/// starts with `<!DOCTYPE html>` is returned as is.
pub fn normalize_markup(markup: &str) -> String {
    if DOCTYPE.is_match(markup) {
        return markup.to_string();
    }

    format!(
        "<!DOCTYPE html>
<html>
<head>
  <meta charset=\"utf-8\" />
  <title>Document</title>
</head>
<body>
{markup}
</body>
</html>"
    )
}
