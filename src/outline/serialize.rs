//! HTML serialization with heading id injection.
//!
//! The tree is printed by html5ever's `HtmlSerializer`, driven by scraper's
//! own `Serialize` impls. [`HeadingIds`] sits in between and rewrites the
//! start tag of each outline heading.

use std::io;

use html5ever::serialize::{
    AttrRef, HtmlSerializer, Serialize, SerializeOpts, Serializer, TraversalScope,
};
use html5ever::{LocalName, Namespace, QualName};
use scraper::Html;

use super::{is_outline_heading, MARKER_ATTR};

/// Serialize `html`, giving the n-th outline heading (document order) the id
/// in `ids[n]`. `None` leaves that heading as parsed.
///
/// Fragments print the children of their synthetic `<html>` wrapper only.
pub fn to_html(html: &Html, fragment: bool, ids: &[Option<String>]) -> io::Result<String> {
    let mut out = Vec::new();
    if fragment {
        write(&mut out, &html.root_element(), TraversalScope::ChildrenOnly(None), ids)?;
    } else {
        write(&mut out, html, TraversalScope::IncludeNode, ids)?;
    }
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write<T: Serialize>(
    out: &mut Vec<u8>,
    node: &T,
    scope: TraversalScope,
    ids: &[Option<String>],
) -> io::Result<()> {
    let opts = SerializeOpts {
        scripting_enabled: true,
        traversal_scope: scope.clone(),
        create_missing_parent: false,
    };
    let mut serializer = HeadingIds {
        inner: HtmlSerializer::new(out, opts),
        ids,
        ordinal: 0,
        pending_pre_newline: false,
    };
    node.serialize(&mut serializer, scope)
}

fn plain_attr(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

fn reborrow<'s, 'a: 's>(attr: AttrRef<'a>) -> AttrRef<'s> {
    attr
}

/// Serializer adapter that injects `id` and the marker attribute.
struct HeadingIds<'i, S> {
    inner: S,
    ids: &'i [Option<String>],
    /// Outline headings seen so far.
    ordinal: usize,
    /// A `pre`, `textarea` or `listing` start tag was just written. The
    /// parser drops one newline right after those, so a leading newline in
    /// their text needs a second one to survive a round trip.
    pending_pre_newline: bool,
}

impl<S: Serializer> Serializer for HeadingIds<'_, S> {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>,
    {
        self.pending_pre_newline = matches!(&*name.local, "pre" | "textarea" | "listing");

        if !is_outline_heading(&name.local) {
            return self.inner.start_elem(name, attrs);
        }

        let ids = self.ids;
        let id = ids.get(self.ordinal).and_then(Option::as_deref);
        self.ordinal += 1;
        let Some(id) = id else {
            return self.inner.start_elem(name, attrs);
        };

        let id_name = plain_attr("id");
        let marker_name = plain_attr(MARKER_ATTR);
        let rest = attrs
            .filter(|(attr, _)| {
                !(attr.ns.is_empty() && (&*attr.local == "id" || &*attr.local == MARKER_ATTR))
            })
            .map(reborrow);

        self.inner.start_elem(
            name,
            [(&id_name, id), (&marker_name, id)].into_iter().chain(rest),
        )
    }

    fn end_elem(&mut self, name: QualName) -> io::Result<()> {
        self.pending_pre_newline = false;
        self.inner.end_elem(name)
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        if std::mem::take(&mut self.pending_pre_newline) && text.starts_with('\n') {
            self.inner.write_text("\n")?;
        }
        self.inner.write_text(text)
    }

    fn write_comment(&mut self, text: &str) -> io::Result<()> {
        self.pending_pre_newline = false;
        self.inner.write_comment(text)
    }

    fn write_doctype(&mut self, name: &str) -> io::Result<()> {
        self.inner.write_doctype(name)
    }

    fn write_processing_instruction(&mut self, target: &str, data: &str) -> io::Result<()> {
        self.pending_pre_newline = false;
        self.inner.write_processing_instruction(target, data)
    }
}
