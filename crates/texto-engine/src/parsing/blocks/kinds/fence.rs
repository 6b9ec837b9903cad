use regex::Regex;

use crate::parsing::blocks::{BlockParser, first_line};
use crate::parsing::diagnostics::Issue;
use crate::parsing::text::{count_leading_spaces, expand_tabs, is_blank};
use crate::parsing::{ParsingContext, compile};

/// ```` ```lang ```` … ```` ``` ````, allowed to run across blank lines.
pub struct FencedPreBlock {
    start: Regex,
    end: Regex,
}

pub struct FenceInfo {
    /// Column of the opening fence; body lines lose up to this many columns.
    indent: usize,
    lang: Option<String>,
    /// Where the body starts, in context coordinates.
    body_start: usize,
}

impl FencedPreBlock {
    pub const FENCE: &'static str = "```";

    pub fn new() -> Self {
        Self {
            start: compile(r"^([ \t]*)```[ \t]*([\w+#.\-]*)[^\n`]*$"),
            end: compile(r"^[ \t]*```[ \t]*$"),
        }
    }

    /// End of the closing fence line, searching whole lines from `from`.
    ///
    /// The search gives up at a non-blank line indented less than the
    /// opening fence, since that line belongs to an enclosing construct.
    fn closing(&self, text: &str, from: usize, indent: usize, tab: usize) -> Option<(usize, usize)> {
        let mut at = from;
        while at < text.len() {
            let line_end = text[at..].find('\n').map_or(text.len(), |i| at + i);
            let line = text[at..line_end].trim_end_matches('\r');
            if self.end.is_match(line) {
                return Some((at, line_end));
            }
            if !is_blank(line) && count_leading_spaces(line, tab) < indent {
                return None;
            }
            at = line_end + 1;
        }
        None
    }
}

impl Default for FencedPreBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for FencedPreBlock {
    type Info = FenceInfo;

    fn name(&self) -> &'static str {
        "fence"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<FenceInfo> {
        let (at, line) = first_line(cx.fragment())?;
        let caps = self.start.captures(line.trim_end_matches('\r'))?;
        let tab = cx.parser().config().tab_width;
        Some(FenceInfo {
            indent: count_leading_spaces(&caps[1], tab),
            lang: Some(caps[2].to_string()).filter(|l| !l.is_empty()),
            body_start: (cx.offset() + at + line.len() + 1).min(cx.len()),
        })
    }

    fn process(&self, cx: &mut ParsingContext<'_>, info: FenceInfo) {
        let tab = cx.parser().config().tab_width;
        let start = cx.block_start();
        let body_end = match self.closing(cx.text(), info.body_start, info.indent, tab) {
            Some((close_start, close_end)) => {
                cx.set_current_block_end(close_end);
                close_start.saturating_sub(1).max(info.body_start)
            }
            None => {
                cx.warn_at(Issue::UnterminatedPreformatted, start);
                cx.block_end().max(info.body_start)
            }
        };

        let body = cx.text()[info.body_start..body_end].trim_end_matches(['\r', '\n']);
        let has_body = !body.is_empty();
        let verbatim = body
            .split('\n')
            .map(|line| {
                let line = line.trim_end_matches('\r');
                let cut = count_leading_spaces(line, tab).min(info.indent);
                expand_tabs(line, tab, cut)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let end = cx.block_end();
        let pre = cx.tree_mut().element("pre");
        if let Some(lang) = info.lang {
            cx.tree_mut().set_attr(pre, "data-lang", lang);
        }
        cx.mark_span(pre, start, end);
        if has_body {
            cx.append_text(pre, verbatim);
        }
        cx.add_node(pre);
        cx.set_offset(end);
    }
}

#[cfg(test)]
mod tests {
    use crate::parsing::blocks::content_outline;
    use crate::parsing::{Issue, parse};
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_body_verbatim_with_language() {
        assert_eq!(
            content_outline("```rust\nfn main() {\n\tgo();\n}\n```"),
            "content\n  pre data-lang=\"rust\"\n    \"fn main() {\\n    go();\\n}\"\n"
        );
    }

    #[test]
    fn runs_across_blank_lines() {
        assert_eq!(
            content_outline("```\na\n\n\nb\n```\n\nafter"),
            "content\n  pre\n    \"a\\n\\n\\nb\"\n  paragraph\n    \"after\"\n"
        );
    }

    #[test]
    fn text_right_after_the_fence_is_a_new_block() {
        assert_eq!(
            content_outline("```\ncode\n```\nprose"),
            "content\n  pre\n    \"code\"\n  paragraph\n    \"prose\"\n"
        );
    }

    #[test]
    fn indented_fence_loses_its_indent() {
        assert_eq!(
            content_outline("  ```\n    a\n  b\n  ```"),
            "content\n  pre\n    \"  a\\nb\"\n"
        );
    }

    #[test]
    fn missing_close_covers_the_block() {
        let doc = parse("```\nnever closed\n\nnext");
        assert_eq!(
            doc.diagnostics.iter().map(|d| &d.issue).collect::<Vec<_>>(),
            vec![&Issue::UnterminatedPreformatted]
        );
        assert_eq!(
            doc.tree.outline_of(doc.part("content").unwrap()),
            "content\n  pre\n    \"never closed\"\n  paragraph\n    \"next\"\n"
        );
    }
}
