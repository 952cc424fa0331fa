//! Heading outline and scroll-sync for the rich-text editor.
//!
//! [`extract`] turns HTML into an ordered list of `h1`/`h2` entries and
//! returns the markup with a stable id on every listed heading.
//! [`HeadingLocator`] finds a listed heading again in a rendered view.

mod extract;
mod parse;
pub mod scroll;
mod serialize;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use extract::extract;
pub use scroll::{HeadingLocator, RenderedView, ScrollBehavior, ScrollRequest, SnapshotView};

/// Attribute mirroring the heading id in the annotated markup.
pub const MARKER_ATTR: &str = "data-heading-id";

/// Heading levels that make up the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    H2,
}

impl HeadingLevel {
    /// Map a lowercase tag name to a level.
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            _ => None,
        }
    }

    /// Left indent of the entry in the outline panel, in pixels.
    pub fn indent(self) -> u32 {
        match self {
            Self::H1 => 0,
            Self::H2 => 16,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub id: String,
    pub indent: u32,
}

/// Result of [`extract`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    pub headings_data: Vec<HeadingEntry>,
    pub html_with_ids: String,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.headings_data.is_empty()
    }
}

pub(crate) fn is_outline_heading(name: &str) -> bool {
    HeadingLevel::from_tag(name).is_some()
}
