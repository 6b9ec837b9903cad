use regex::Regex;

use crate::parsing::inline::{InlineMatch, InlineParser};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

/// A `//` line inside a block, kept as a comment node.
#[derive(Debug, Clone)]
pub struct CommentInline {
    pattern: Regex,
}

impl CommentInline {
    pub const PREFIX: &'static str = "//";

    pub fn new() -> Self {
        Self {
            pattern: compile(r"(?m)^[ \t]*//([^\n]*)$"),
        }
    }
}

impl Default for CommentInline {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineParser for CommentInline {
    fn name(&self) -> &'static str {
        "comment"
    }

    /// The fragment may start mid-line, where `^` would match too; a match at
    /// its very start counts only if the text before it on that line is blank.
    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        let before = cx.text()[..cx.offset()].trim_end_matches([' ', '\t']);
        let at_line_start = before.is_empty() || before.ends_with('\n');
        self.pattern
            .captures_iter(cx.fragment())
            .find(|c| at_line_start || c.get(0).is_some_and(|m| m.start() > 0))
            .map(|c| InlineMatch::from_captures(&c))
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let text = m.group(cx.fragment(), 1).unwrap_or_default().trim().to_string();
        let comment = cx.tree_mut().comment(text);
        cx.tree_mut().append(node, comment);
        m.end
    }
}
