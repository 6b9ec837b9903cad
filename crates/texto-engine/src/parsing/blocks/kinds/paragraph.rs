use std::ops::Range;

use crate::parsing::ParsingContext;
use crate::parsing::blocks::{BlockParser, accepts_indent};
use crate::parsing::inline::{parse_range, trim_edges};
use crate::tree::NodeId;

/// The fallback: any block nothing else recognized.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphBlock;

/// Parses `range` of the current fragment into a `paragraph` appended to
/// `parent`. Nothing is appended when the paragraph ends up empty.
pub fn paragraph(
    cx: &mut ParsingContext<'_>,
    parent: NodeId,
    range: Range<usize>,
    indent: usize,
) -> Option<NodeId> {
    let base = cx.offset();
    let node = cx.tree_mut().element("paragraph");
    cx.tree_mut().set_attr(node, "_indent", indent.to_string());
    cx.mark_span(node, base + range.start, base + range.end);
    parse_range(cx, node, range);
    trim_edges(cx, node);
    if cx.tree().children(node).is_empty() {
        return None;
    }
    cx.tree_mut().append(parent, node);
    Some(node)
}

impl ParagraphBlock {
    /// Where a paragraph indented by `indent` goes: the nearest block element
    /// not indented deeper. Following a less indented paragraph it opens an
    /// indented `block`, and an indented `block` just before it at the same
    /// indent is reused.
    fn parent(cx: &mut ParsingContext<'_>, indent: usize) -> NodeId {
        while !accepts_indent(cx, cx.current(), indent) {
            match cx.tree().parent(cx.current()) {
                Some(parent) => cx.set_current(parent),
                None => break,
            }
        }

        let current = cx.current();
        let tree = cx.tree();
        let Some(last) = tree.last_child(current) else {
            return current;
        };
        let last_indent = tree.indent(last);
        if tree.is_named(last, "paragraph") && last_indent.is_some_and(|i| i < indent as i64) {
            let block = cx.tree_mut().element("block");
            cx.tree_mut().set_attr(block, "_indent", indent.to_string());
            cx.add_node(block);
            cx.set_current(block);
            block
        } else if tree.is_named(last, "block")
            && tree.attr(last, "type").is_none()
            && last_indent == Some(indent as i64)
        {
            cx.set_current(last);
            last
        } else {
            current
        }
    }
}

impl BlockParser for ParagraphBlock {
    type Info = ();

    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn recognises(&self, _: &mut ParsingContext<'_>) -> Option<()> {
        Some(())
    }

    fn process(&self, cx: &mut ParsingContext<'_>, (): ()) {
        let indent = cx.parser().indentation(cx.block_text());
        let parent = Self::parent(cx, indent);
        let length = cx.fragment().len();
        paragraph(cx, parent, 0..length, indent);
        let end = cx.block_end();
        cx.set_offset(end);
    }
}
