use std::collections::HashSet;

use scraper::ElementRef;
use tracing::{debug, warn};

use super::parse::parse;
use super::serialize::to_html;
use super::{HeadingEntry, HeadingLevel, Outline, MARKER_ATTR};

/// Build the outline of `markup` and annotate its headings.
///
/// Only `h1`/`h2` elements closed by their own end tag are listed. Each one
/// keeps an `id` (or `data-heading-id`) it already carries, and
/// otherwise gets `heading-{level}-{index}`. Ids are unique within one call;
/// a repeat gets `-1`, `-2`, ... appended.
///
/// Markup without any listed heading is returned verbatim.
///
/// ```
/// let outline = docbridge::extract("<h1>A</h1><h2>B</h2>");
/// assert_eq!(outline.headings_data[1].id, "heading-h2-1");
/// assert_eq!(
///     outline.html_with_ids,
///     "<h1 id=\"heading-h1-0\" data-heading-id=\"heading-h1-0\">A</h1>\
///      <h2 id=\"heading-h2-1\" data-heading-id=\"heading-h2-1\">B</h2>"
/// );
/// ```
pub fn extract(markup: &str) -> Outline {
    if markup.trim().is_empty() {
        return verbatim(markup);
    }

    let document = is_document(markup);
    let parsed = parse(markup, document);
    if parsed.closed.is_empty() {
        return verbatim(markup);
    }
    let html = &parsed.html;

    let mut issued = HashSet::new();
    let mut entries = Vec::new();
    let mut ids = Vec::new();

    let headings = html
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|el| HeadingLevel::from_tag(el.value().name()).map(|level| (el, level)));

    for (ordinal, (element, level)) in headings.enumerate() {
        if !parsed.is_closed(&element.id()) {
            debug!("Skipping unterminated <{}> #{}", level, ordinal);
            ids.push(None);
            continue;
        }

        let index = entries.len();
        let id = unique_id(&mut issued, existing_id(element), level, index);
        let text = element.text().collect::<String>().trim().to_string();

        ids.push(Some(id.clone()));
        entries.push(HeadingEntry {
            level,
            text,
            id,
            indent: level.indent(),
        });
    }

    if entries.is_empty() {
        return verbatim(markup);
    }

    let html_with_ids = match to_html(html, !document, &ids) {
        Ok(annotated) => annotated,
        Err(e) => {
            warn!("Failed to serialize annotated markup: {}", e);
            return verbatim(markup);
        }
    };

    debug!("Extracted {} headings", entries.len());
    Outline {
        headings_data: entries,
        html_with_ids,
    }
}

fn verbatim(markup: &str) -> Outline {
    Outline {
        headings_data: Vec::new(),
        html_with_ids: markup.to_string(),
    }
}

/// Whether `markup` is a complete document rather than a body fragment.
fn is_document(markup: &str) -> bool {
    let head: String = markup
        .trim_start()
        .chars()
        .take(9)
        .flat_map(char::to_lowercase)
        .collect();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

fn existing_id(element: ElementRef<'_>) -> Option<&str> {
    let value = element.value();
    value
        .id()
        .filter(|id| !id.is_empty())
        .or_else(|| value.attr(MARKER_ATTR).filter(|id| !id.is_empty()))
}

fn unique_id(
    issued: &mut HashSet<String>,
    existing: Option<&str>,
    level: HeadingLevel,
    index: usize,
) -> String {
    let base = existing.map_or_else(|| format!("heading-{level}-{index}"), str::to_string);

    let mut id = base.clone();
    let mut suffix = 1;
    while issued.contains(&id) {
        id = format!("{base}-{suffix}");
        suffix += 1;
    }
    issued.insert(id.clone());
    id
}
