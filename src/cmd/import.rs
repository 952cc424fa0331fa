use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use docbridge::{Config, Converter, ImportResponse};

pub async fn cmd_import(
    config: &Config,
    input: &Path,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    let converter = Converter::from_config(config).context("Document conversion failed")?;
    let html = converter
        .docx_to_html(&bytes)
        .await
        .context("Document conversion failed")?;

    let rendered = if json {
        serde_json::to_string_pretty(&ImportResponse { html })?
    } else {
        html
    };

    if let Some(path) = output {
        tokio::fs::write(&path, rendered.as_bytes())
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("💾 Saved {} bytes to {}", rendered.len(), path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
