//! Scroll-sync: bring an outline heading into view in the rendered editor.
//!
//! The locator only needs a handful of DOM queries, abstracted by
//! [`RenderedView`]. [`SnapshotView`] implements it over a captured render
//! snapshot so the same logic runs from the CLI and in tests.

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;

/// Scroll animation requested from the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Scroll the container to `top` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// DOM-like queries against a rendered document.
pub trait RenderedView {
    type Node;

    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// Matches in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Node>;

    fn text_content(&self, node: &Self::Node) -> String;

    /// Viewport-relative top edge of the node's box.
    fn bounding_top(&self, node: &Self::Node) -> f64;

    fn scroll_top(&self, node: &Self::Node) -> f64;

    fn scroll_to(&mut self, node: &Self::Node, request: ScrollRequest);
}

/// Finds headings by their text and computes the container scroll offset.
#[derive(Debug, Clone)]
pub struct HeadingLocator {
    container_selector: String,
    heading_selector: String,
    offset: f64,
    behavior: ScrollBehavior,
}

impl Default for HeadingLocator {
    fn default() -> Self {
        Self {
            container_selector: ".a4-container".to_string(),
            heading_selector: ".w-e-text-container h1, .w-e-text-container h2".to_string(),
            offset: 100.0,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

impl HeadingLocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_container_selector(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = selector.into();
        self
    }

    #[must_use]
    pub fn with_heading_selector(mut self, selector: impl Into<String>) -> Self {
        self.heading_selector = selector.into();
        self
    }

    /// Space left above the heading after scrolling, in pixels.
    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Compute where the container must scroll to show the first heading
    /// whose trimmed text equals `heading_text`.
    ///
    /// `None` when there is no container or no such heading.
    pub fn locate<V: RenderedView>(&self, view: &V, heading_text: &str) -> Option<ScrollRequest> {
        self.find(view, heading_text).map(|(_, request)| request)
    }

    /// Like [`locate`](Self::locate), and issue the scroll on the view.
    /// Returns the request that was issued.
    pub fn scroll_to_heading<V: RenderedView>(
        &self,
        view: &mut V,
        heading_text: &str,
    ) -> Option<ScrollRequest> {
        let (container, request) = self.find(view, heading_text)?;
        view.scroll_to(&container, request);
        Some(request)
    }

    fn find<V: RenderedView>(&self, view: &V, heading_text: &str) -> Option<(V::Node, ScrollRequest)> {
        let Some(container) = view.query_selector(&self.container_selector) else {
            debug!("No container matches {}", self.container_selector);
            return None;
        };

        let Some(target) = view
            .query_selector_all(&self.heading_selector)
            .into_iter()
            .find(|el| view.text_content(el).trim() == heading_text)
        else {
            debug!("No heading with text {:?}", heading_text);
            return None;
        };

        let top = view.bounding_top(&target) - view.bounding_top(&container)
            + view.scroll_top(&container)
            - self.offset;

        Some((
            container,
            ScrollRequest {
                top,
                behavior: self.behavior,
            },
        ))
    }
}

/// A node captured from a render snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotNode {
    text: String,
    top: f64,
    scroll_top: f64,
}

/// [`RenderedView`] over serialized render output.
///
/// Layout comes from attributes: `data-top` is an element's viewport top,
/// `data-scroll-top` a scroll container's current offset. Missing or
/// unparseable values read as `0`.
#[derive(Debug)]
pub struct SnapshotView {
    document: Html,
    scrolls: Vec<ScrollRequest>,
}

impl SnapshotView {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
            scrolls: Vec::new(),
        }
    }

    /// Scroll requests issued so far, oldest first.
    pub fn scrolls(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    pub fn last_scroll(&self) -> Option<ScrollRequest> {
        self.scrolls.last().copied()
    }

    fn select(&self, selector: &str) -> Vec<SnapshotNode> {
        let Ok(selector) = Selector::parse(selector) else {
            debug!("Invalid selector {:?}", selector);
            return Vec::new();
        };

        self.document
            .select(&selector)
            .map(|el| SnapshotNode {
                text: el.text().collect(),
                top: layout_attr(el.value().attr("data-top")),
                scroll_top: layout_attr(el.value().attr("data-scroll-top")),
            })
            .collect()
    }
}

fn layout_attr(value: Option<&str>) -> f64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0.0)
}

impl RenderedView for SnapshotView {
    type Node = SnapshotNode;

    fn query_selector(&self, selector: &str) -> Option<SnapshotNode> {
        self.select(selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<SnapshotNode> {
        self.select(selector)
    }

    fn text_content(&self, node: &SnapshotNode) -> String {
        node.text.clone()
    }

    fn bounding_top(&self, node: &SnapshotNode) -> f64 {
        node.top
    }

    fn scroll_top(&self, node: &SnapshotNode) -> f64 {
        node.scroll_top
    }

    fn scroll_to(&mut self, _node: &SnapshotNode, request: ScrollRequest) {
        self.scrolls.push(request);
    }
}
