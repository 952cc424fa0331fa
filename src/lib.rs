//! `docbridge` - Word ⇄ HTML bridge for in-browser rich-text editors
//!
//! # Features
//!
//! - **Conversion**: `.docx` to HTML and back through headless LibreOffice,
//!   with per-job scratch directories that are always cleaned up
//! - **Outline**: `h1`/`h2` heading list with stable ids injected into the markup
//! - **Scroll-sync**: locate an outline heading in a rendered view
//!
//! # Example
//!
//! ```rust,no_run
//! use docbridge::{Config, Converter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let converter = Converter::from_config(&Config::load()?)?;
//!     let html = converter.docx_to_html(&std::fs::read("report.docx")?).await?;
//!
//!     let outline = docbridge::extract(&html);
//!     for heading in &outline.headings_data {
//!         println!("{} {}", heading.level, heading.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod outline;

pub use config::Config;
pub use convert::{
    normalize_markup, ConversionDirection, Converter, ConverterLocator, ExportRequest,
    ImportResponse, Soffice, Workspace, DOCX_MIME, EXPORT_FILENAME,
};
pub use error::{ConvertError, Result};
pub use outline::{
    extract, HeadingEntry, HeadingLevel, HeadingLocator, Outline, RenderedView, ScrollBehavior,
    ScrollRequest, SnapshotView,
};

/// Version of docbridge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
