use regex::Regex;

use crate::parsing::inline::{InlineMatch, InlineParser};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

/// `<->`, `<-` and `->` (any number of dashes), as `arrow type=…`.
#[derive(Debug, Clone)]
pub struct ArrowInline {
    pattern: Regex,
}

impl ArrowInline {
    const TYPES: [&'static str; 3] = ["double", "left", "right"];

    pub fn new() -> Self {
        Self {
            pattern: compile(r"(<-+>)|(<-+)|(-+>)"),
        }
    }
}

impl Default for ArrowInline {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineParser for ArrowInline {
    fn name(&self) -> &'static str {
        "arrow"
    }

    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        self.pattern
            .captures(cx.fragment())
            .map(|c| InlineMatch::from_captures(&c))
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let kind = (1..=3)
            .find(|g| m.has(*g))
            .map_or("right", |g| Self::TYPES[g - 1]);
        let arrow = cx.append_element(node, "arrow");
        cx.tree_mut().set_attr(arrow, "type", kind);
        m.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Parser;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("a <-> b", "double")]
    #[case("a <-- b", "left")]
    #[case("a -> b", "right")]
    fn arrow_types(#[case] text: &str, #[case] expected: &str) {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, text);
        let node = cx.tree_mut().element("p");
        let arrow = ArrowInline::new();
        let m = arrow.recognises(&cx).unwrap();
        arrow.parse(&mut cx, node, &m);
        let child = cx.tree().children(node)[0];
        assert_eq!(cx.tree().attr(child, "type"), Some(expected));
    }
}
