use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use docbridge::Outline;

use super::read_input;
use crate::OutputFormat;

pub fn cmd_outline(input: &Path, format: OutputFormat, write_html: Option<PathBuf>) -> Result<()> {
    let markup = read_input(input)?;
    let outline = docbridge::extract(&markup);

    if let Some(path) = write_html {
        std::fs::write(&path, &outline.html_with_ids)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("💾 Saved annotated markup to {}", path.display());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outline)?),
        OutputFormat::Text => print_tree(&outline),
    }

    Ok(())
}

fn print_tree(outline: &Outline) {
    if outline.is_empty() {
        println!("(no headings)");
        return;
    }
    for heading in &outline.headings_data {
        let pad = " ".repeat(heading.indent as usize / 8);
        println!("{pad}{} {}  #{}", heading.level, heading.text, heading.id);
    }
}
