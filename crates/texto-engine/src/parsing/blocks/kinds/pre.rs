use regex::Regex;

use crate::parsing::blocks::{BlockParser, lines_with_offsets};
use crate::parsing::{ParsingContext, compile};

/// Lines prefixed with `>` and a tab or three spaces, kept verbatim.
pub struct PreBlock {
    line: Regex,
}

impl PreBlock {
    pub fn new() -> Self {
        Self {
            line: compile(r"^[ \t]*>(?:\t|   )(.*)$"),
        }
    }
}

impl Default for PreBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for PreBlock {
    type Info = Vec<String>;

    fn name(&self) -> &'static str {
        "pre"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<Vec<String>> {
        let lines = lines_with_offsets(cx.fragment());
        if lines.is_empty() {
            return None;
        }
        lines
            .into_iter()
            .map(|(_, line)| {
                let caps = self.line.captures(line.trim_end_matches('\r'))?;
                Some(caps[1].to_string())
            })
            .collect()
    }

    fn process(&self, cx: &mut ParsingContext<'_>, lines: Vec<String>) {
        let (start, end) = (cx.block_start(), cx.block_end());
        let pre = cx.tree_mut().element("pre");
        cx.mark_span(pre, start, end);
        cx.append_text(pre, lines.join("\n"));
        cx.add_node(pre);
        cx.set_offset(end);
    }
}
