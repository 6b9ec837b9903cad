use regex::Regex;

use crate::parsing::inline::{InlineMatch, InlineParser};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

/// `{| … |}`: the interior is emitted as-is, with no inline parsing.
#[derive(Debug, Clone)]
pub struct EscapedInline {
    pattern: Regex,
}

impl EscapedInline {
    pub const OPEN: &'static str = "{|";
    pub const CLOSE: &'static str = "|}";

    pub fn new() -> Self {
        Self {
            pattern: compile(r"(?s)\{\|(.*?)\|\}"),
        }
    }
}

impl Default for EscapedInline {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineParser for EscapedInline {
    fn name(&self) -> &'static str {
        "escaped"
    }

    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        self.pattern
            .captures(cx.fragment())
            .map(|c| InlineMatch::from_captures(&c))
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let text = m.group(cx.fragment(), 1).unwrap_or_default().to_string();
        if !text.is_empty() {
            cx.append_text(node, text);
        }
        m.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Parser;

    #[test]
    fn interior_is_lazy() {
        let parser = Parser::default();
        let cx = ParsingContext::new(&parser, "a {|x|} b {|y|}");
        let m = EscapedInline::new().recognises(&cx).unwrap();
        assert_eq!((m.start, m.end), (2, 7));
        assert_eq!(m.group(cx.fragment(), 1), Some("x"));
    }

    #[test]
    fn spans_lines() {
        let parser = Parser::default();
        let cx = ParsingContext::new(&parser, "{|one\ntwo|}");
        let m = EscapedInline::new().recognises(&cx).unwrap();
        assert_eq!(m.group(cx.fragment(), 1), Some("one\ntwo"));
    }
}
