//! Generic markup tags.
//!
//! - `[start name k=v]` … `[end name]` wraps a span whose interior is parsed
//!   as a nested mini-document (or handed to a custom processor)
//! - `[name: k=v]` is an empty element
//!
//! `[start:name]` and `[end:name]` are accepted as well. Start/end keywords
//! are case-insensitive; names are compared exactly.

use regex::Regex;

use crate::parsing::diagnostics::Issue;
use crate::parsing::inline::{InlineMatch, InlineParser};
use crate::parsing::{ParsingContext, compile};
use crate::tree::{Attributes, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Start,
    End,
    Single,
}

/// A decoded markup tag. `start`/`end` are relative to the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupTag {
    pub kind: TagKind,
    pub name: String,
    pub attrs: String,
    pub start: usize,
    pub end: usize,
}

impl MarkupTag {
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.kind == TagKind::Start
    }
}

#[derive(Debug, Clone)]
pub struct MarkupInline {
    tag: Regex,
    attribute: Regex,
}

impl MarkupInline {
    /// Groups: 1 start/end keyword, 2 its name, 3 its attributes,
    /// 4 single tag name, 5 single tag attributes.
    pub const TAG: &'static str = concat!(
        r#"\[(?:(?i:(start|end))[ \t:]+([A-Za-z][\w\-]*)([^\]]*)"#,
        r#"|([A-Za-z][\w\-]*):((?:[ \t]+[A-Za-z][\w\-]*(?::[A-Za-z][\w\-]*)?=(?:"[^"]*"|'[^']*'|[^\s\]"']+))*)[ \t]*)\]"#,
    );

    /// `[ns:]name=value`, the value quoted or a run of non-space characters.
    pub const ATTRIBUTE: &'static str = r#"[ \t]*(?:([A-Za-z][\w\-]*):)?([A-Za-z][\w\-]*)=("(?:\\"|[^"])*"|'(?:\\'|[^'])*'|[^ \t\r\n]+)?"#;

    pub fn new() -> Self {
        Self {
            tag: compile(Self::TAG),
            attribute: compile(Self::ATTRIBUTE),
        }
    }

    /// First tag in `text` at or after `from`.
    pub fn tag_at(&self, text: &str, from: usize) -> Option<MarkupTag> {
        self.tag
            .captures_at(text, from)
            .map(|c| Self::decode(text, &InlineMatch::from_captures(&c)))
    }

    fn decode(text: &str, m: &InlineMatch) -> MarkupTag {
        let (kind, name, attrs) = match m.group(text, 1) {
            Some(keyword) if keyword.eq_ignore_ascii_case("start") => (TagKind::Start, 2, 3),
            Some(_) => (TagKind::End, 2, 3),
            None => (TagKind::Single, 4, 5),
        };
        MarkupTag {
            kind,
            name: m.group(text, name).unwrap_or_default().to_string(),
            attrs: m.group(text, attrs).unwrap_or_default().to_string(),
            start: m.start,
            end: m.end,
        }
    }

    /// Parses `k=v` pairs, returning any text that is not an attribute.
    pub fn parse_attributes(&self, text: &str) -> (Attributes, Option<String>) {
        let mut attrs = Attributes::default();
        let mut at = 0;
        while let Some(caps) = self.attribute.captures_at(text, at) {
            let Some(whole) = caps.get(0) else { break };
            if whole.start() != at || whole.is_empty() {
                break;
            }
            let value = caps.get(3).map_or(String::new(), |v| unquote(v.as_str()));
            attrs.set(&caps[2], value);
            at = whole.end();
        }
        let rest = text[at..].trim();
        (attrs, (!rest.is_empty()).then(|| rest.to_string()))
    }

    /// Finds the end tag closing `name`, starting `skip` bytes after the
    /// current offset.
    ///
    /// Start tags deepen and end tags shallow the nesting. The answer is the
    /// end tag that brings the depth to zero with the same name; a differently
    /// named end tag at that point closes some unrelated tag and the scan goes
    /// on. Tags inside escaped spans are ignored.
    ///
    /// Returns the `(start, end)` of the end tag relative to the current
    /// offset, which is left unchanged.
    pub fn find_end(
        &self,
        cx: &mut ParsingContext<'_>,
        name: &str,
        skip: usize,
    ) -> Option<(usize, usize)> {
        let saved = cx.save_offsets();
        let origin = cx.offset();
        cx.increase_offset(skip);
        let mut depth = 1usize;
        let mut found = None;
        while !cx.is_block_end_reached() {
            let Some(m) = self.search_markup(cx) else {
                break;
            };
            let tag = Self::decode(cx.fragment(), &m);
            match tag.kind {
                TagKind::Start => depth += 1,
                TagKind::End => {
                    depth -= 1;
                    if depth == 0 {
                        if tag.name == name {
                            let at = cx.offset() - origin;
                            found = Some((at + m.start, at + m.end));
                            break;
                        }
                        log::debug!("skipping `{}' end while looking for `{name}'", tag.name);
                        depth = 1;
                    }
                }
                TagKind::Single => {}
            }
            cx.increase_offset(m.end);
        }
        cx.restore_offsets(saved);
        found
    }

    /// Next tag from the current offset, stepping over escaped spans. Leaves
    /// the offset just before the returned match, which is relative to it.
    fn search_markup(&self, cx: &mut ParsingContext<'_>) -> Option<InlineMatch> {
        let parsers: [&dyn InlineParser; 2] = [cx.parser().escaped(), self];
        while !cx.is_block_end_reached() {
            let (winner, m) = cx.find_next_inline(parsers)?;
            if winner.name() == self.name() {
                return Some(m);
            }
            cx.increase_offset(winner.end_of(&m));
        }
        None
    }

    fn element(&self, cx: &mut ParsingContext<'_>, tag: &MarkupTag, at: usize) -> NodeId {
        let node = cx.tree_mut().element(&tag.name);
        let (attrs, rest) = self.parse_attributes(&tag.attrs);
        for (k, v) in attrs.iter() {
            cx.tree_mut().set_attr(node, k, v);
        }
        if let Some(rest) = rest {
            cx.warn_at(Issue::MalformedAttributes(rest), at);
        }
        node
    }
}

impl Default for MarkupInline {
    fn default() -> Self {
        Self::new()
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            let inner = &value[1..value.len() - 1];
            return inner.replace(&format!("\\{quote}"), &quote.to_string());
        }
    }
    value.to_string()
}

/// A nested mini-document that is a single paragraph is spliced inline.
fn unwrap_single_paragraph(cx: &mut ParsingContext<'_>, node: NodeId) {
    let tree = cx.tree_mut();
    let [paragraph] = tree.children(node) else {
        return;
    };
    let paragraph = *paragraph;
    if !tree.is_named(paragraph, "paragraph") {
        return;
    }
    tree.detach(paragraph);
    for child in tree.children(paragraph).to_vec() {
        tree.detach(child);
        tree.append(node, child);
    }
}

impl InlineParser for MarkupInline {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        self.tag
            .captures(cx.fragment())
            .map(|c| InlineMatch::from_captures(&c))
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let tag = Self::decode(cx.fragment(), m);
        let at = cx.offset() + m.start;
        match tag.kind {
            TagKind::Single => {
                let element = self.element(cx, &tag, at);
                cx.tree_mut().append(node, element);
                m.end
            }
            TagKind::End => {
                cx.warn_at(Issue::MarkupEndWithoutStart(tag.name), at);
                m.end
            }
            TagKind::Start => {
                let Some((close_start, close_end)) = self.find_end(cx, &tag.name, m.end) else {
                    cx.warn_at(Issue::MarkupStartWithoutEnd(tag.name), at);
                    return m.end;
                };
                let from = cx.offset() + m.end;
                let to = cx.offset() + close_start;
                if let Some(processor) = cx.parser().processor(&tag.name) {
                    log::debug!("custom processor for `{}' at {from}..{to}", tag.name);
                    let saved = cx.save_offsets();
                    cx.set_current_block(from, to);
                    processor.process(cx, node);
                    cx.restore_offsets(saved);
                } else {
                    let element = self.element(cx, &tag, at);
                    cx.mark_span(element, at, cx.offset() + close_end);
                    let interior = cx.text()[from..to].to_string();
                    cx.parse_nested(&interior, from, element);
                    unwrap_single_paragraph(cx, element);
                    cx.tree_mut().append(node, element);
                }
                close_end
            }
        }
    }
}
