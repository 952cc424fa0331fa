use std::path::Path;

use anyhow::{bail, Result};

use docbridge::{HeadingLocator, ScrollBehavior, SnapshotView};

use super::read_input;

pub fn cmd_locate(snapshot: &Path, text: &str, offset: f64, instant: bool) -> Result<()> {
    let view = SnapshotView::parse(&read_input(snapshot)?);

    let behavior = if instant {
        ScrollBehavior::Instant
    } else {
        ScrollBehavior::Smooth
    };
    let locator = HeadingLocator::new()
        .with_offset(offset)
        .with_behavior(behavior);

    let Some(request) = locator.locate(&view, text) else {
        bail!("No heading matching {text:?}");
    };

    println!("{}", serde_json::to_string(&request)?);
    Ok(())
}
