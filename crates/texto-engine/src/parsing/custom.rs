//! Custom processors for markup block interiors.
//!
//! When a `[start name]` tag has a processor registered under `name`, the
//! processor receives the context narrowed to the interior and the node to
//! append to, instead of the interior being parsed as a mini-document.

use crate::tree::NodeId;

use super::ParsingContext;
use super::text;

pub trait CustomProcessor: Send + Sync {
    /// Processes the current window, appending results to `parent`.
    fn process(&self, cx: &mut ParsingContext<'_>, parent: NodeId);
}

/// `[start pre] … [end pre]`: the interior as one verbatim `pre` element,
/// dedented and without the blank lines framing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreProcessor;

impl CustomProcessor for PreProcessor {
    fn process(&self, cx: &mut ParsingContext<'_>, parent: NodeId) {
        let tab_width = cx.parser().config().tab_width;
        let expanded = text::expand_tabs(cx.fragment(), tab_width, 0);
        let lines: Vec<&str> = expanded.lines().collect();
        let first = lines.iter().position(|l| !text::is_blank(l));
        let last = lines.iter().rposition(|l| !text::is_blank(l));
        let body = match (first, last) {
            (Some(first), Some(last)) => &lines[first..=last],
            _ => &[][..],
        };
        let cut = body
            .iter()
            .filter(|l| !text::is_blank(l))
            .map(|l| text::count_leading_spaces(l, tab_width))
            .min()
            .unwrap_or(0);
        let verbatim = body
            .iter()
            .map(|l| l.chars().skip(cut).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");

        let pre = cx.append_element(parent, "pre");
        let (start, end) = (cx.block_start(), cx.block_end());
        cx.mark_span(pre, start, end);
        if !verbatim.is_empty() {
            cx.append_text(pre, verbatim);
        }
        cx.set_offset(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn dedents_and_strips_framing_blank_lines() {
        let parser = Parser::default();
        let mut cx = ParsingContext::new(&parser, "\n    fn main() {\n        go();\n    }\n\n");
        let parent = cx.content();

        PreProcessor.process(&mut cx, parent);

        assert_eq!(
            cx.tree().outline_of(parent),
            "content\n  pre\n    \"fn main() {\\n    go();\\n}\"\n"
        );
        assert!(cx.is_block_end_reached());
    }
}
