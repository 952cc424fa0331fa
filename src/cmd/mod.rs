mod doctor;
mod export;
mod import;
mod locate;
mod outline;

pub use doctor::cmd_doctor;
pub use export::cmd_export;
pub use import::cmd_import;
pub use locate::cmd_locate;
pub use outline::cmd_outline;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a text input file, `-` meaning stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
