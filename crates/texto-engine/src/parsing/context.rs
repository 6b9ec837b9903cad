//! # Parsing Context
//!
//! Mutable cursor state shared by every block and inline parser.
//!
//! The context owns the text being parsed, an offset into it and the active
//! block window `[block_start, block_end)`. Parsers only ever look at the
//! current fragment `text[offset..block_end]`, so narrowing the window is how
//! a list-item body, a section heading or a table cell gets parsed in
//! isolation.
//!
//! ## Save/Restore
//!
//! [`ParsingContext::save_offsets`] pushes `(block_start, offset, block_end)`
//! and hands back a [`SavedOffsets`] token. Tokens must be restored in strict
//! LIFO order; restoring an outer frame while an inner one is still open is a
//! defect in the calling parser and panics.
//!
//! ## Nested Contexts
//!
//! [`ParsingContext::clone_for`] builds an independent context over another
//! text (a table cell, a markup interior) sharing only the read-only
//! [`Parser`] tables. The nested parse runs to completion into its own arena
//! and its nodes are then grafted into the outer tree.
//!
//! ## Key Invariants
//!
//! - `block_start <= offset <= block_end <= text.len()` at all times
//! - The current node is always attached to the root of `tree`

use std::collections::HashSet;

use crate::tree::{NodeId, Tree, offsets};

use super::Parser;
use super::diagnostics::{Diagnostic, Issue, Severity};
use super::inline::{InlineMatch, InlineParser};
use super::text;

/// Token returned by [`ParsingContext::save_offsets`].
#[must_use = "saved offsets must be restored"]
#[derive(Debug)]
pub struct SavedOffsets {
    depth: usize,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    block_start: usize,
    offset: usize,
    block_end: usize,
}

/// A section heading already placed in the tree.
#[derive(Debug, Clone, Copy)]
struct DeclaredSection {
    content: NodeId,
    depth: i64,
    indent: usize,
}

/// Output of a completed parse.
#[derive(Debug)]
pub struct Document {
    pub tree: Tree,
    pub diagnostics: Vec<Diagnostic>,
    /// `(start, end)` per element, indexed by `_number`, when offsets are tracked.
    pub offsets: Option<Vec<offsets::Span>>,
}

impl Document {
    pub fn outline(&self) -> String {
        self.tree.outline()
    }

    /// Top-level child of `document` with the given name.
    pub fn part(&self, name: &str) -> Option<NodeId> {
        self.tree
            .children(self.tree.root())
            .iter()
            .copied()
            .find(|n| self.tree.is_named(*n, name))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

pub struct ParsingContext<'p> {
    parser: &'p Parser,
    text: String,
    /// Offset of `text` inside the top-level input.
    base: usize,
    nested: bool,
    offset: usize,
    block_start: usize,
    block_end: usize,
    saved: Vec<Frame>,
    tree: Tree,
    current: NodeId,
    last_block: Option<NodeId>,
    header: NodeId,
    content: NodeId,
    references: NodeId,
    appendices: NodeId,
    sections: Vec<DeclaredSection>,
    keys: HashSet<String>,
    issues: Vec<(Issue, usize)>,
}

impl<'p> ParsingContext<'p> {
    /// Context for a top-level document: `document` with `header`, `content`,
    /// `references` and `appendices`, inserting into `content`.
    pub fn new(parser: &'p Parser, text: &str) -> Self {
        let mut tree = Tree::new("document");
        let root = tree.root();
        let [header, content, references, appendices] =
            ["header", "content", "references", "appendices"].map(|name| {
                let node = tree.element(name);
                tree.append(root, node);
                node
            });
        Self::with_tree(parser, text, 0, false, tree, [header, content, references, appendices])
    }

    fn with_tree(
        parser: &'p Parser,
        text: &str,
        base: usize,
        nested: bool,
        tree: Tree,
        [header, content, references, appendices]: [NodeId; 4],
    ) -> Self {
        ParsingContext {
            parser,
            text: text.to_string(),
            base,
            nested,
            offset: 0,
            block_start: 0,
            block_end: text.len(),
            saved: Vec::new(),
            tree,
            current: content,
            last_block: None,
            header,
            content,
            references,
            appendices,
            sections: Vec::new(),
            keys: HashSet::new(),
            issues: Vec::new(),
        }
    }

    /// Independent context over `text`, which starts at `offset` in this
    /// context's text. Its root is a bare `content` element.
    pub fn clone_for(&self, text: &str, offset: usize) -> ParsingContext<'p> {
        let mut tree = Tree::new("content");
        let content = tree.root();
        let [header, references, appendices] =
            ["header", "references", "appendices"].map(|name| tree.element(name));
        Self::with_tree(
            self.parser,
            text,
            self.base + offset,
            true,
            tree,
            [header, content, references, appendices],
        )
    }

    pub fn parser(&self) -> &'p Parser {
        self.parser
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True inside a table cell or markup interior parse.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    // Offsets and window

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn block_start(&self) -> usize {
        self.block_start
    }

    pub fn block_end(&self) -> usize {
        self.block_end
    }

    /// Sets the window and moves the offset to its start.
    ///
    /// # Panics
    /// Panics unless `start <= end <= len`.
    pub fn set_current_block(&mut self, start: usize, end: usize) {
        assert!(
            start <= end && end <= self.text.len(),
            "block window {start}..{end} outside text of length {}",
            self.text.len()
        );
        self.block_start = start;
        self.block_end = end;
        self.offset = start;
    }

    /// Moves the window end, used by blocks that extend past a separator or
    /// leave their trailing lines to the next dispatch.
    pub fn set_current_block_end(&mut self, end: usize) {
        assert!(
            self.offset <= end && end <= self.text.len(),
            "block end {end} outside {}..{}",
            self.offset,
            self.text.len()
        );
        self.block_end = end;
    }

    pub fn set_offset(&mut self, offset: usize) {
        assert!(
            self.block_start <= offset && offset <= self.block_end,
            "offset {offset} outside block {}..{}",
            self.block_start,
            self.block_end
        );
        self.offset = offset;
    }

    pub fn increase_offset(&mut self, by: usize) {
        self.set_offset(self.offset + by);
    }

    pub fn decrease_offset(&mut self, by: usize) {
        assert!(by <= self.offset, "cannot move offset before 0");
        self.set_offset(self.offset - by);
    }

    /// `text[offset..block_end]`.
    pub fn fragment(&self) -> &str {
        &self.text[self.offset..self.block_end]
    }

    /// `text[block_start..block_end]`.
    pub fn block_text(&self) -> &str {
        &self.text[self.block_start..self.block_end]
    }

    pub fn is_block_end_reached(&self) -> bool {
        self.offset >= self.block_end
    }

    pub fn is_document_end_reached(&self) -> bool {
        self.offset >= self.text.len()
    }

    pub fn save_offsets(&mut self) -> SavedOffsets {
        self.saved.push(Frame {
            block_start: self.block_start,
            offset: self.offset,
            block_end: self.block_end,
        });
        SavedOffsets {
            depth: self.saved.len() - 1,
        }
    }

    /// # Panics
    /// Panics if `saved` is not the innermost open frame.
    pub fn restore_offsets(&mut self, saved: SavedOffsets) {
        assert_eq!(
            saved.depth + 1,
            self.saved.len(),
            "offsets restored out of order"
        );
        if let Some(frame) = self.saved.pop() {
            self.block_start = frame.block_start;
            self.offset = frame.offset;
            self.block_end = frame.block_end;
        }
    }

    // Tree cursor

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn set_current(&mut self, node: NodeId) {
        self.current = node;
    }

    pub fn last_block(&self) -> Option<NodeId> {
        self.last_block
    }

    pub fn set_last_block(&mut self, node: Option<NodeId>) {
        self.last_block = node;
    }

    pub fn header(&self) -> NodeId {
        self.header
    }

    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn references(&self) -> NodeId {
        self.references
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let node = self.tree.text(text);
        self.tree.append(parent, node);
        node
    }

    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let node = self.tree.element(name);
        self.tree.append(parent, node);
        node
    }

    /// Appends `node` to the current node.
    pub fn add_node(&mut self, node: NodeId) {
        self.tree.append(self.current, node);
    }

    /// Walks the current node up until its name is one of `names` or the root
    /// is reached.
    pub fn ensure_parent(&mut self, names: &[&str]) {
        while let Some(name) = self.tree.name(self.current) {
            if names.contains(&name) {
                break;
            }
            match self.tree.parent(self.current) {
                Some(parent) => self.current = parent,
                None => break,
            }
        }
    }

    /// Records `_start`/`_end` on `node` when offset tracking is enabled.
    pub fn mark_span(&mut self, node: NodeId, start: usize, end: usize) {
        if self.parser.config().track_offsets {
            self.tree.set_attr(node, "_start", start.to_string());
            self.tree.set_attr(node, "_end", end.to_string());
        }
    }

    // Sections

    pub fn declare_section(&mut self, content: NodeId, depth: i64, indent: usize) {
        self.sections.push(DeclaredSection {
            content,
            depth,
            indent,
        });
    }

    /// Content node a new section with `depth` and `indent` belongs in.
    ///
    /// The most recent section that is shallower (by indent, or by depth at
    /// the same indent) wins; otherwise the document content.
    pub fn parent_section(&self, depth: i64, indent: usize) -> NodeId {
        self.sections
            .iter()
            .rev()
            .find(|s| indent > s.indent || (s.indent <= indent && s.depth < depth))
            .map_or(self.content, |s| s.content)
    }

    /// Stable identifier for a heading, de-duplicated within this context.
    pub fn unique_key(&mut self, heading: &str) -> String {
        let mut key = text::slug(heading);
        if key.is_empty() {
            key = "section".to_string();
        }
        let mut candidate = key.clone();
        let mut n = 1;
        while self.keys.contains(&candidate) {
            candidate = format!("{key}-{n}");
            n += 1;
        }
        self.keys.insert(candidate.clone());
        candidate
    }

    // Inline search

    /// Lowest-offset match among `parsers` in the current fragment, ties going
    /// to the earlier parser.
    pub fn find_next_inline<'a>(
        &self,
        parsers: impl IntoIterator<Item = &'a dyn InlineParser>,
    ) -> Option<(&'a dyn InlineParser, InlineMatch)> {
        let mut best: Option<(&'a dyn InlineParser, InlineMatch)> = None;
        for parser in parsers {
            if let Some(m) = parser.recognises(self) {
                if best.as_ref().is_none_or(|(_, b)| m.start < b.start) {
                    best = Some((parser, m));
                }
            }
        }
        best
    }

    // Diagnostics

    /// Reports `issue` at the current offset.
    pub fn warn(&mut self, issue: Issue) {
        self.warn_at(issue, self.offset);
    }

    /// Reports `issue` at `offset` in this context's text.
    pub fn warn_at(&mut self, issue: Issue, offset: usize) {
        log::debug!("{issue} (offset {})", self.base + offset);
        self.issues.push((issue, self.base + offset));
    }

    // Nested parses

    /// Parses `text` as a mini-document and grafts the result under `target`.
    ///
    /// `offset` is where `text` starts in this context's text. Header and
    /// reference entries produced by the nested parse land in this context's
    /// header and references.
    pub fn parse_nested(&mut self, text: &str, offset: usize, target: NodeId) {
        let mut sub = self.clone_for(text, offset);
        log::debug!("nested parse of {} bytes at {}", text.len(), sub.base);
        self.parser.run(&mut sub);

        let pairs = [
            (sub.content, target),
            (sub.header, self.header),
            (sub.references, self.references),
            (sub.appendices, self.appendices),
        ];
        for (from, to) in pairs {
            for child in sub.tree.children(from) {
                self.tree.graft(to, &sub.tree, *child, offset);
            }
        }
        self.issues.append(&mut sub.issues);
    }

    /// Prunes the empty top-level parts and drops every node left detached,
    /// then runs the offset pass when enabled and resolves diagnostics to
    /// line/column.
    pub fn finish(mut self) -> Document {
        for part in [self.header, self.content, self.references, self.appendices] {
            if self.tree.children(part).is_empty() {
                self.tree.detach(part);
            }
        }
        self.tree = self.tree.compact();

        let offsets = self
            .parser
            .config()
            .track_offsets
            .then(|| offsets::annotate(&mut self.tree, self.text.len()));

        let diagnostics: Vec<Diagnostic> = self
            .issues
            .into_iter()
            .map(|(issue, offset)| Diagnostic::locate(issue, offset, &self.text))
            .collect();
        for d in &diagnostics {
            match d.severity {
                Severity::Warning => log::warn!("{}", d.log_line()),
                Severity::Error => log::error!("{}", d.log_line()),
            }
        }

        Document {
            tree: self.tree,
            diagnostics,
            offsets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ParserConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_with_whole_text_window() {
        let parser = Parser::default();
        let cx = ParsingContext::new(&parser, "hello world");
        assert_eq!(cx.offset(), 0);
        assert_eq!(cx.block_end(), 11);
        assert_eq!(cx.fragment(), "hello world");
        assert_eq!(cx.tree().name(cx.current()), Some("content"));
    }

    #[test]
    fn fragment_follows_offset_changes() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "hello world");
        cx.set_current_block(0, 5);
        cx.increase_offset(2);
        assert_eq!(cx.fragment(), "llo");
        cx.decrease_offset(1);
        assert_eq!(cx.fragment(), "ello");
        cx.set_offset(5);
        assert_eq!(cx.fragment(), "");
        assert!(cx.is_block_end_reached());
        assert!(!cx.is_document_end_reached());
    }

    #[test]
    #[should_panic(expected = "outside block")]
    fn offset_past_window_panics() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "hello world");
        cx.set_current_block(0, 5);
        cx.increase_offset(6);
    }

    #[test]
    #[should_panic(expected = "outside text")]
    fn window_past_text_panics() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "abc");
        cx.set_current_block(1, 4);
    }

    #[test]
    fn save_restore_nests() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "0123456789");
        cx.set_current_block(2, 8);
        cx.increase_offset(1);

        let outer = cx.save_offsets();
        cx.set_current_block(4, 6);
        let inner = cx.save_offsets();
        cx.set_current_block(5, 5);
        cx.restore_offsets(inner);
        assert_eq!((cx.block_start(), cx.offset(), cx.block_end()), (4, 4, 6));
        cx.restore_offsets(outer);
        assert_eq!((cx.block_start(), cx.offset(), cx.block_end()), (2, 3, 8));
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn restoring_outer_frame_first_panics() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "0123456789");
        let outer = cx.save_offsets();
        let _inner = cx.save_offsets();
        cx.restore_offsets(outer);
    }

    #[test]
    fn ensure_parent_stops_at_named_ancestor_or_root() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "");
        let list = cx.tree_mut().element("list");
        let item = cx.tree_mut().element("list-item");
        cx.add_node(list);
        cx.tree_mut().append(list, item);
        cx.set_current(item);

        cx.ensure_parent(&["list"]);
        assert_eq!(cx.current(), list);

        cx.ensure_parent(&["section"]);
        assert_eq!(cx.tree().name(cx.current()), Some("document"));
    }

    #[test]
    fn parent_section_prefers_shallower_recent_section() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "");
        let one = cx.tree_mut().element("content");
        let one_one = cx.tree_mut().element("content");
        cx.declare_section(one, 1, 0);
        cx.declare_section(one_one, 2, 0);

        assert_eq!(cx.parent_section(1, 0), cx.content());
        assert_eq!(cx.parent_section(2, 0), one);
        assert_eq!(cx.parent_section(3, 0), one_one);
        // Deeper indentation nests under the last section whatever the depth
        assert_eq!(cx.parent_section(1, 4), one_one);
    }

    #[test]
    fn unique_keys_are_deduplicated() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "");
        assert_eq!(cx.unique_key("Intro"), "intro");
        assert_eq!(cx.unique_key("intro"), "intro-1");
        assert_eq!(cx.unique_key("Intro!"), "intro-2");
        assert_eq!(cx.unique_key("???"), "section");
    }

    #[test]
    fn finish_prunes_empty_parts_and_tracks_offsets() {
        let parser = Parser::new(ParserConfig {
            track_offsets: true,
            ..ParserConfig::default()
        });
        let mut cx = ParsingContext::new(&parser, "abc");
        let p = cx.tree_mut().element("paragraph");
        cx.add_node(p);

        let doc = cx.finish();

        assert_eq!(doc.tree.children(doc.tree.root()).len(), 1);
        assert!(doc.part("content").is_some());
        assert!(doc.part("header").is_none());
        let offsets = doc.offsets.unwrap();
        assert_eq!(offsets[0], (Some(0), Some(3)));
        assert_eq!(offsets.len(), 3);
    }
}
