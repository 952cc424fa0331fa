//! Tree parse that also reports which headings were properly closed.
//!
//! The tree builder silently closes an unterminated `<h1>` when the next
//! heading starts, so the finished tree cannot tell the two apart. For the
//! outline that heading does not exist: only an `h1`/`h2` whose own end tag
//! arrives before any other heading starts is recognized.
//!
//! [`parse`] sits between the tokenizer and the tree builder. It sees every
//! token the tree builder sees, in the tokenizer state the tree builder asked
//! for, and learns from the tree sink which start tags really produced a
//! heading element. Tags that the tree builder drops (inside `<select>`) or
//! that are text (inside `<script>`, but not `<svg><script>`) never count.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    TokenizerResult,
};
use html5ever::tree_builder::{
    create_element, ElementFlags, NodeOrText, QuirksMode, TreeBuilder, TreeBuilderOpts, TreeSink,
};
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::{Html, HtmlTreeSink};

type NodeHandle = <HtmlTreeSink as TreeSink>::Handle;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parsed markup plus the headings that count for the outline.
pub struct ParsedMarkup {
    pub html: Html,
    /// `h1`/`h2` elements closed by their own end tag.
    pub closed: Vec<NodeHandle>,
}

impl ParsedMarkup {
    pub fn is_closed(&self, node: &NodeHandle) -> bool {
        self.closed.contains(node)
    }
}

/// Parse `markup` as a full document or as a `<body>` fragment, matching
/// `Html::parse_document` / `Html::parse_fragment`.
pub fn parse(markup: &str, document: bool) -> ParsedMarkup {
    let builder = if document {
        let sink = RecordingSink::new(HtmlTreeSink::new(Html::new_document()));
        TreeBuilder::new(sink, TreeBuilderOpts::default())
    } else {
        let sink = RecordingSink::new(HtmlTreeSink::new(Html::new_fragment()));
        let body = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from("body"),
        );
        let context = create_element(&sink, body, Vec::new());
        TreeBuilder::new_for_fragment(sink, context, None, TreeBuilderOpts::default())
    };

    let tracker = HeadingTracker {
        builder,
        open: RefCell::new(None),
        closed: RefCell::new(Vec::new()),
    };
    let tokenizer = Tokenizer::new(tracker, TokenizerOpts::default());

    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(markup));
    while let TokenizerResult::Script(_) = tokenizer.feed(&input) {}
    tokenizer.end();

    let tracker = tokenizer.sink;
    let closed = tracker.closed.into_inner();
    ParsedMarkup {
        html: tracker.builder.sink.inner.finish(),
        closed,
    }
}

fn heading_rank(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Token sink in front of the tree builder.
struct HeadingTracker {
    builder: TreeBuilder<NodeHandle, RecordingSink>,
    /// Outline heading waiting for its end tag, with its rank.
    open: RefCell<Option<(NodeHandle, u8)>>,
    closed: RefCell<Vec<NodeHandle>>,
}

impl TokenSink for HeadingTracker {
    type Handle = NodeHandle;

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<NodeHandle> {
        let end_rank = match &token {
            Token::TagToken(tag) if tag.kind == TagKind::EndTag => heading_rank(&tag.name),
            _ => None,
        };

        let result = self.builder.process_token(token, line_number);

        if let Some((node, rank)) = self.builder.sink.take_created() {
            // a new heading implicitly ends the open one
            *self.open.borrow_mut() = (rank <= 2).then_some((node, rank));
        } else if let Some(rank) = end_rank {
            if let Some((node, open_rank)) = self.open.borrow_mut().take() {
                if open_rank == rank {
                    self.closed.borrow_mut().push(node);
                }
            }
        }

        result
    }

    fn end(&self) {
        self.builder.end();
    }

    fn adjusted_current_node_present_but_not_in_html_namespace(&self) -> bool {
        self.builder
            .adjusted_current_node_present_but_not_in_html_namespace()
    }
}

/// Tree sink that notes every heading element it creates.
struct RecordingSink {
    inner: HtmlTreeSink,
    created: RefCell<Option<(NodeHandle, u8)>>,
}

impl RecordingSink {
    fn new(inner: HtmlTreeSink) -> Self {
        Self {
            inner,
            created: RefCell::new(None),
        }
    }

    fn take_created(&self) -> Option<(NodeHandle, u8)> {
        self.created.borrow_mut().take()
    }
}

impl TreeSink for RecordingSink {
    type Handle = NodeHandle;
    type Output = Html;
    type ElemName<'a>
        = <HtmlTreeSink as TreeSink>::ElemName<'a>
    where
        Self: 'a;

    fn finish(self) -> Html {
        self.inner.finish()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.inner.parse_error(msg);
    }

    fn get_document(&self) -> NodeHandle {
        self.inner.get_document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeHandle) -> Self::ElemName<'a> {
        self.inner.elem_name(target)
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> NodeHandle {
        let rank = heading_rank(&name.local);
        let node = self.inner.create_element(name, attrs, flags);
        if let Some(rank) = rank {
            *self.created.borrow_mut() = Some((node, rank));
        }
        node
    }

    fn create_comment(&self, text: StrTendril) -> NodeHandle {
        self.inner.create_comment(text)
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> NodeHandle {
        self.inner.create_pi(target, data)
    }

    fn append(&self, parent: &NodeHandle, child: NodeOrText<NodeHandle>) {
        self.inner.append(parent, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeHandle,
        prev_element: &NodeHandle,
        child: NodeOrText<NodeHandle>,
    ) {
        self.inner
            .append_based_on_parent_node(element, prev_element, child);
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        self.inner
            .append_doctype_to_document(name, public_id, system_id);
    }

    fn get_template_contents(&self, target: &NodeHandle) -> NodeHandle {
        self.inner.get_template_contents(target)
    }

    fn same_node(&self, x: &NodeHandle, y: &NodeHandle) -> bool {
        self.inner.same_node(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.inner.set_quirks_mode(mode);
    }

    fn append_before_sibling(&self, sibling: &NodeHandle, new_node: NodeOrText<NodeHandle>) {
        self.inner.append_before_sibling(sibling, new_node);
    }

    fn add_attrs_if_missing(&self, target: &NodeHandle, attrs: Vec<Attribute>) {
        self.inner.add_attrs_if_missing(target, attrs);
    }

    fn remove_from_parent(&self, target: &NodeHandle) {
        self.inner.remove_from_parent(target);
    }

    fn reparent_children(&self, node: &NodeHandle, new_parent: &NodeHandle) {
        self.inner.reparent_children(node, new_parent);
    }

    fn is_mathml_annotation_xml_integration_point(&self, handle: &NodeHandle) -> bool {
        self.inner.is_mathml_annotation_xml_integration_point(handle)
    }
}
