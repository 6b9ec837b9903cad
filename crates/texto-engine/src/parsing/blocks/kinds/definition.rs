use regex::Regex;

use crate::parsing::blocks::{BlockParser, accepts_indent};
use crate::parsing::inline::{parse_range, trim_edges};
use crate::parsing::text::{count_leading_spaces, is_blank};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

use super::paragraph::paragraph;

/// `term::` followed by its definition.
///
/// ```text
/// Texto::
///     A plain text format.
/// ```
pub struct DefinitionBlock {
    term: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInfo {
    /// End of the term, before `::`.
    term_end: usize,
    /// Start of the definition body.
    body_start: usize,
}

impl DefinitionBlock {
    pub const MARKER: &'static str = "::";

    pub fn new() -> Self {
        Self {
            term: compile(r"\A([ \t]*(?:[^:\n]|:[^:\n])+)::+[ \t]*\|?[ \t\r]*(?:\n|\z)"),
        }
    }

    /// The definition list a term with `indent` joins, creating it if needed.
    fn list(cx: &mut ParsingContext<'_>, indent: usize) -> NodeId {
        let mut node = cx.current();
        loop {
            let tree = cx.tree();
            if tree.is_named(node, "definition-list") && tree.indent(node) == Some(indent as i64) {
                return node;
            }
            if accepts_indent(cx, node, indent) {
                break;
            }
            match tree.parent(node) {
                Some(parent) => node = parent,
                None => break,
            }
        }
        let list = cx.append_element(node, "definition-list");
        cx.tree_mut().set_attr(list, "_indent", indent.to_string());
        list
    }
}

impl Default for DefinitionBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for DefinitionBlock {
    type Info = DefinitionInfo;

    fn name(&self) -> &'static str {
        "definition"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<DefinitionInfo> {
        let caps = self.term.captures(cx.fragment())?;
        let term = caps.get(1)?;
        if is_blank(term.as_str()) {
            return None;
        }
        Some(DefinitionInfo {
            term_end: term.end(),
            body_start: caps.get(0)?.end(),
        })
    }

    fn process(&self, cx: &mut ParsingContext<'_>, info: DefinitionInfo) {
        let (start, end) = (cx.block_start(), cx.block_end());
        let tab = cx.parser().config().tab_width;
        let indent = count_leading_spaces(cx.fragment(), tab);
        let list = Self::list(cx, indent);

        let item = cx.append_element(list, "definition-item");
        cx.tree_mut().set_attr(item, "_indent", (indent + 1).to_string());
        cx.mark_span(item, start, end);

        let title = cx.append_element(item, "title");
        cx.mark_span(title, start, start + info.term_end);
        parse_range(cx, title, 0..info.term_end);
        trim_edges(cx, title);

        let content = cx.append_element(item, "content");
        cx.tree_mut().set_attr(content, "_indent", (indent + 1).to_string());
        cx.mark_span(content, start + info.body_start, end);

        let length = cx.fragment().len();
        if !is_blank(&cx.fragment()[info.body_start..]) {
            let indent = cx.parser().indentation(&cx.fragment()[info.body_start..]);
            paragraph(cx, content, info.body_start..length, indent);
        }

        cx.set_current(content);
        cx.set_offset(end);
    }
}
