//! # Block Parsing
//!
//! A block is the text between two blank lines (see `segment`). Each block is
//! offered to the recognizers below in priority order and the first one that
//! accepts it places it in the tree.
//!
//! ## Protocol
//!
//! 1. **`recognises`**: lookahead over the block window. It may move the
//!    offset (the dispatcher resets the window afterwards) but must leave the
//!    tree reachable from the root unchanged.
//! 2. **`process`**: mutates the tree and leaves the offset at or before the
//!    block end. A block may move its own end (fenced pre spanning blank
//!    lines, a tagged marker handing back the lines after it); the driver
//!    resumes wherever the block ends.
//!
//! ## Priority
//!
//! comment, separator, markup, pre, fenced pre, meta, table, reference entry,
//! title, section, definition, list item, tagged block, paragraph.
//! Syntactically specific shapes come before loose ones; paragraph accepts
//! everything.
//!
//! ## Placement
//!
//! Lists, sections, definitions and paragraphs find their parent by comparing
//! the numeric `_indent` (or section depth) carried on ancestors, walking up
//! until a compatible one is found. This is how a shallower construct pops out
//! of nesting built by earlier blocks.

pub mod kinds;

use super::ParsingContext;

/// Elements a paragraph may be placed in directly.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "block",
    "list-item",
    "content",
    "chapter",
    "section",
    "appendix",
];

pub trait BlockParser: Send + Sync {
    /// What `recognises` learnt about the block, handed to `process`.
    type Info;

    fn name(&self) -> &'static str;

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<Self::Info>;

    fn process(&self, cx: &mut ParsingContext<'_>, info: Self::Info);
}

/// Object-safe view of a [`BlockParser`] used by the registry.
pub trait BlockDispatch: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs `recognises`, restores the window, and `process`es on success.
    fn dispatch(&self, cx: &mut ParsingContext<'_>) -> bool;
}

impl<T: BlockParser> BlockDispatch for T {
    fn name(&self) -> &'static str {
        BlockParser::name(self)
    }

    fn dispatch(&self, cx: &mut ParsingContext<'_>) -> bool {
        let (start, end) = (cx.block_start(), cx.block_end());
        let info = self.recognises(cx);
        cx.set_current_block(start, end);
        match info {
            Some(info) => {
                self.process(cx, info);
                true
            }
            None => false,
        }
    }
}

/// Builds the recognizers in dispatch order.
pub fn registry() -> Vec<Box<dyn BlockDispatch>> {
    use kinds::*;
    vec![
        Box::new(CommentBlock),
        Box::new(SeparatorBlock::new()),
        Box::new(MarkupBlock),
        Box::new(PreBlock::new()),
        Box::new(FencedPreBlock::new()),
        Box::new(MetaBlock::new()),
        Box::new(TableBlock::new()),
        Box::new(ReferenceBlock::new()),
        Box::new(TitleBlock::new()),
        Box::new(SectionBlock::new()),
        Box::new(DefinitionBlock::new()),
        Box::new(ListItemBlock::new()),
        Box::new(TaggedBlock::new()),
        Box::new(ParagraphBlock),
    ]
}

/// True when `node` is a block element with an indent not above `indent`.
pub(crate) fn accepts_indent(cx: &ParsingContext<'_>, node: crate::tree::NodeId, indent: usize) -> bool {
    let tree = cx.tree();
    tree.name(node).is_some_and(|n| BLOCK_ELEMENTS.contains(&n))
        && tree.indent(node).is_none_or(|i| i <= indent as i64)
}

/// First line of `text` that is not blank, with its byte offset.
pub(crate) fn first_line(text: &str) -> Option<(usize, &str)> {
    let mut at = 0;
    for line in text.split('\n') {
        if !line.trim().is_empty() {
            return Some((at, line));
        }
        at += line.len() + 1;
    }
    None
}

/// Non-blank lines of `text`, each with its byte offset.
pub(crate) fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut at = 0;
    let mut out = Vec::new();
    for line in text.split('\n') {
        if !line.trim().is_empty() {
            out.push((at, line));
        }
        at += line.len() + 1;
    }
    out
}

/// Outline of the parsed `content` part, or an empty string when pruned.
#[cfg(test)]
pub(crate) fn content_outline(text: &str) -> String {
    part_outline(text, "content")
}

#[cfg(test)]
pub(crate) fn part_outline(text: &str, part: &str) -> String {
    let doc = crate::parsing::parse(text);
    doc.part(part)
        .map(|id| doc.tree.outline_of(id))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_line_skips_blank_lines() {
        assert_eq!(first_line("\n  \nabc\ndef"), Some((4, "abc")));
        assert_eq!(first_line(" \n"), None);
    }

    #[test]
    fn lines_carry_offsets() {
        assert_eq!(
            lines_with_offsets("a\n\n  b\n"),
            vec![(0, "a"), (3, "  b")]
        );
    }
}
