//! DOM operations adapter.
//!
//! Thin layer over the `dom_query` crate exposing the handful of tree
//! operations the extraction engine needs: tag names, attributes, visible
//! text, and sub-selection. The engine only ever reads the tree; nothing
//! here mutates a document.

// Re-export core types for external use
pub use dom_query::{Document, Selection};

// Re-export StrTendril for zero-copy text passing
pub use tendril::StrTendril;

use crate::patterns::WHITESPACE_RUN;

/// Get any attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get tag name (lowercase) of the first node in the selection.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

/// Get all text content of node and descendants.
///
/// Returns `StrTendril` for zero-copy passing. Use `.to_string()` only when
/// you need owned storage.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Visible text of a selection with runs of whitespace collapsed to single
/// spaces and the ends trimmed. This is the "visible text" accessor the
/// heuristics compare against label tables and keyword lists.
#[must_use]
pub fn trimmed_text(sel: &Selection) -> String {
    let raw = sel.text();
    WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned()
}

/// Wrap each node of a selection as its own single-node selection.
///
/// `dom_query` selections are flat node lists; classification needs to walk
/// rows and cells one at a time.
#[must_use]
pub fn each<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().map(|n| Selection::from(*n)).collect()
}

/// Text of the first anchor inside a cell, if any; otherwise the cell's own
/// trimmed text. Anchor text wins because linked entity names are cleaner
/// than the surrounding cell markup.
#[must_use]
pub fn anchor_first_text(cell: &Selection) -> String {
    let anchors = cell.select("a");
    if let Some(first) = anchors.nodes().first() {
        let anchor = Selection::from(*first);
        let text = trimmed_text(&anchor);
        if !text.is_empty() {
            return text;
        }
    }
    trimmed_text(cell)
}

/// Body text of a whole document, falling back to the root element when the
/// parser produced no body.
#[must_use]
pub fn page_text(doc: &Document) -> String {
    let body = doc.select("body");
    let text = text_content(&body);
    if text.trim().is_empty() {
        text_content(&doc.select("html")).to_string()
    } else {
        text.to_string()
    }
}
