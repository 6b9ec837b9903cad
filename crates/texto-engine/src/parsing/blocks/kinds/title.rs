use regex::Regex;

use crate::parsing::ParsingContext;
use crate::parsing::blocks::{BlockParser, lines_with_offsets};
use crate::parsing::compile;

/// A line of a document title block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleLine {
    /// `== Title`, or text underlined with `==`.
    Title(String),
    /// `-- name: value`
    Meta(String, String),
}

/// The document title, header fields and subtitles. Only recognized while
/// the document content is still empty.
pub struct TitleBlock {
    title: Regex,
    meta: Regex,
    underline: Regex,
}

impl TitleBlock {
    pub fn new() -> Self {
        Self {
            title: compile(r"^[ \t]*==[ \t]*([^=\s].*?)[ \t\r]*$"),
            meta: compile(r"^[ \t]*--[ \t]*([^:\n]+?)[ \t]*:[ \t]*(.*?)[ \t\r]*$"),
            underline: compile(r"^[ \t]*==+[ \t\r]*$"),
        }
    }

    fn line(&self, line: &str) -> Option<TitleLine> {
        if let Some(caps) = self.title.captures(line) {
            return Some(TitleLine::Title(caps[1].to_string()));
        }
        self.meta
            .captures(line)
            .map(|caps| TitleLine::Meta(caps[1].to_string(), caps[2].to_string()))
    }
}

impl Default for TitleBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for TitleBlock {
    type Info = Vec<TitleLine>;

    fn name(&self) -> &'static str {
        "title"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<Vec<TitleLine>> {
        if cx.is_nested() || !cx.tree().children(cx.content()).is_empty() {
            return None;
        }
        let lines = lines_with_offsets(cx.fragment());
        if let [(_, text), (_, underline)] = lines.as_slice() {
            if self.underline.is_match(underline) && self.line(text).is_none() {
                return Some(vec![TitleLine::Title(text.trim().to_string())]);
            }
        }
        if lines.is_empty() {
            return None;
        }
        lines.iter().map(|(_, line)| self.line(line)).collect()
    }

    fn process(&self, cx: &mut ParsingContext<'_>, lines: Vec<TitleLine>) {
        let (start, end) = (cx.block_start(), cx.block_end());
        let header = cx.header();
        for line in lines {
            match line {
                TitleLine::Title(text) => {
                    let tree = cx.tree();
                    let previous = tree
                        .children(header)
                        .iter()
                        .filter(|n| tree.name(**n).is_some_and(|name| name.ends_with("title")))
                        .count();
                    let name = format!("{}title", "sub".repeat(previous));
                    let text = cx.parser().process_text(text.trim());
                    let node = cx.append_element(header, &name);
                    cx.mark_span(node, start, end);
                    cx.append_text(node, text);
                }
                TitleLine::Meta(name, value) => {
                    let meta = match cx.tree().last_child_named(header, "meta") {
                        Some(meta) => meta,
                        None => cx.append_element(header, "meta"),
                    };
                    let value = cx.parser().process_text(value.trim());
                    let node = cx.append_element(meta, "meta");
                    cx.tree_mut().set_attr(node, "name", name.trim());
                    cx.append_text(node, value);
                }
            }
        }
        cx.set_offset(end);
    }
}
