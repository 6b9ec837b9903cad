//! # Inline Parsing
//!
//! Converts the text of a block window into text and element nodes.
//!
//! Every [`InlineParser`] searches the current fragment and reports its first
//! match. The driver ([`parse_block`]) picks the lowest-offset match across
//! the whole chain, ties going to the parser registered first, emits the text
//! before it, and lets the winner consume the match. Literal text is
//! tab-expanded and whitespace-collapsed; trimming at node boundaries is left
//! to the block parser that owns the node.
//!
//! ## Registration Order
//!
//! escaped, comment, markup, target, escaped character, email, url, bare
//! url, entity, link, code, term, quoted term, strong, em, quote, citation,
//! strikethrough, checkbox, break, newline, dots, arrow, emdash, endash.
//!
//! Escapes come first so nothing inside `{| … |}` is ever seen by the others.

pub mod kinds;

use std::ops::Range;

use regex::Captures;

use crate::tree::NodeId;

use super::ParsingContext;
use kinds::{
    ArrowInline, CommentInline, EntityInline, EscapedInline, LinkInline, MarkupInline,
    QuoteInline, SimpleInline, TargetInline,
};

/// Position of an inline match, relative to the fragment it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    pub start: usize,
    pub end: usize,
    groups: Vec<Option<Range<usize>>>,
}

impl InlineMatch {
    pub fn from_captures(caps: &Captures<'_>) -> Self {
        let groups: Vec<_> = caps.iter().map(|g| g.map(|m| m.range())).collect();
        let whole = groups.first().cloned().flatten().unwrap_or(0..0);
        InlineMatch {
            start: whole.start,
            end: whole.end,
            groups,
        }
    }

    /// Reports group `index` as the match itself, keeping the other groups.
    #[must_use]
    pub fn narrowed_to(mut self, index: usize) -> Self {
        if let Some(Some(range)) = self.groups.get(index) {
            self.start = range.start;
            self.end = range.end;
        }
        self
    }

    pub fn group<'t>(&self, fragment: &'t str, index: usize) -> Option<&'t str> {
        let range = self.groups.get(index)?.clone()?;
        fragment.get(range)
    }

    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        self.groups.get(index)?.clone()
    }

    pub fn has(&self, index: usize) -> bool {
        matches!(self.groups.get(index), Some(Some(_)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

pub trait InlineParser: Send + Sync {
    fn name(&self) -> &'static str;

    /// First match in the current fragment. Must not change the context.
    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch>;

    /// Consumes `m`, appending to `node`. Returns the offset just after the
    /// consumed text, relative to the context offset.
    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize;

    /// Offset just after `m`, used to skip a match without parsing it.
    fn end_of(&self, m: &InlineMatch) -> usize {
        m.end
    }
}

/// Builds the inline chain in registration order.
pub fn chain(escaped: &EscapedInline, markup: &MarkupInline) -> Vec<Box<dyn InlineParser>> {
    vec![
        Box::new(escaped.clone()),
        Box::new(CommentInline::new()),
        Box::new(markup.clone()),
        Box::new(TargetInline::new()),
        Box::new(SimpleInline::escaped_char()),
        Box::new(SimpleInline::email()),
        Box::new(SimpleInline::url()),
        Box::new(SimpleInline::bare_url()),
        Box::new(EntityInline::new()),
        Box::new(LinkInline::new()),
        Box::new(SimpleInline::code()),
        Box::new(SimpleInline::term()),
        Box::new(SimpleInline::quoted_term()),
        Box::new(SimpleInline::strong()),
        Box::new(SimpleInline::em()),
        Box::new(QuoteInline::quote()),
        Box::new(QuoteInline::citation()),
        Box::new(SimpleInline::strikethrough()),
        Box::new(SimpleInline::checkbox()),
        Box::new(SimpleInline::line_break()),
        Box::new(SimpleInline::newline()),
        Box::new(SimpleInline::dots()),
        Box::new(ArrowInline::new()),
        Box::new(SimpleInline::emdash()),
        Box::new(SimpleInline::endash()),
    ]
}

/// Parses the rest of the current window into children of `node`.
pub fn parse_block(cx: &mut ParsingContext<'_>, node: NodeId) {
    let parser = cx.parser();
    while !cx.is_block_end_reached() {
        match cx.find_next_inline(parser.inlines()) {
            Some((inline, m)) => {
                if m.start > 0 {
                    let text = parser.process_text(&cx.fragment()[..m.start]);
                    cx.append_text(node, text);
                }
                let consumed = inline.parse(cx, node, &m);
                assert!(
                    consumed > 0,
                    "{} inline consumed nothing at offset {}",
                    inline.name(),
                    cx.offset()
                );
                cx.increase_offset(consumed);
            }
            None => {
                let text = parser.process_text(cx.fragment());
                cx.append_text(node, text);
                let end = cx.block_end();
                cx.set_offset(end);
            }
        }
    }
}

/// Parses `range` of the current fragment into `node`, leaving the offsets
/// untouched.
pub fn parse_range(cx: &mut ParsingContext<'_>, node: NodeId, range: Range<usize>) {
    let base = cx.offset();
    let saved = cx.save_offsets();
    cx.set_current_block(base + range.start, base + range.end);
    parse_block(cx, node);
    cx.restore_offsets(saved);
}

/// Drops a whitespace-only text node at either end of `node`'s children, or
/// trims the edge text node when it has content.
pub fn trim_edges(cx: &mut ParsingContext<'_>, node: NodeId) {
    let tree = cx.tree_mut();
    for at_start in [true, false] {
        let edge = if at_start {
            tree.children(node).first().copied()
        } else {
            tree.last_child(node)
        };
        let Some(edge) = edge else { continue };
        let Some(text) = tree.text_mut(edge) else {
            continue;
        };
        if text.trim().is_empty() {
            tree.detach(edge);
        } else if at_start {
            *text = text.trim_start().to_string();
        } else {
            *text = text.trim_end().to_string();
        }
    }
}
