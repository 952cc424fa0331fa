use std::path::Path;

use anyhow::{Context, Result};

use docbridge::{Config, Converter, ExportRequest, DOCX_MIME};

use super::read_input;

pub async fn cmd_export(config: &Config, input: &Path, output: &Path) -> Result<()> {
    let body = read_input(input)?;
    let request = ExportRequest::from_body(&body);

    let converter = Converter::from_config(config).context("Document export failed")?;
    let docx = converter
        .html_to_docx(&request.html)
        .await
        .context("Document export failed")?;

    tokio::fs::write(output, &docx)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!(
        "💾 Saved {} bytes ({}) to {}",
        docx.len(),
        DOCX_MIME,
        output.display()
    );

    Ok(())
}
