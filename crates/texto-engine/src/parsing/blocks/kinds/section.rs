//! Section headings.
//!
//! Three shapes open a section:
//!
//! - a numbered prefix: `1.`, `1.2.`, `A.`
//! - a run of `#` on a single-line block: `## Title`
//! - text underlined with at least three of `*`, `-`, `=`, `#`
//!
//! A numbered heading may be underlined as well. The effective depth is the
//! number of prefix levels (or `#` count) minus the underline weight: 2 for
//! `==`, 1 for `--`, 0 otherwise. So an `==` underlined heading outranks a
//! `--` underlined one, which outranks a bare `1.`.

use std::ops::Range;

use regex::Regex;

use crate::parsing::blocks::BlockParser;
use crate::parsing::inline::{parse_range, trim_edges};
use crate::parsing::text::is_blank;
use crate::parsing::{ParsingContext, compile};

pub struct SectionBlock {
    heading: Regex,
    hashes: Regex,
    underline: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    /// Numbered prefix levels plus `#` count.
    pub levels: usize,
    /// Underline weight.
    pub weight: usize,
    /// Heading text, relative to the fragment.
    pub title: Range<usize>,
}

impl SectionInfo {
    pub fn depth(&self) -> i64 {
        self.levels as i64 - self.weight as i64
    }
}

impl SectionBlock {
    pub fn new() -> Self {
        Self {
            heading: compile(r"\A[ \t]*((?:(?:[0-9]+|[A-Z])\.)+)(?:[ \t]|\r?\n|\z)"),
            hashes: compile(r"\A([ \t]*(#+)[ \t]+)[^\s#][^\n]*?\s*\z"),
            underline: compile(r"(?m)^[ \t]*[*\-=#]{3,}[ \t\r]*$"),
        }
    }

    /// Underline weight: `==` counts 2, `--` counts 1.
    pub fn weight(underline: &str) -> usize {
        let underline = underline.trim();
        if underline.ends_with("==") {
            2
        } else if underline.ends_with("--") {
            1
        } else {
            0
        }
    }

    /// The underline closing `fragment`, if text precedes it and only
    /// whitespace follows.
    fn final_underline(&self, fragment: &str, from: usize) -> Option<(Range<usize>, usize)> {
        let m = self.underline.find_at(fragment, from)?;
        (is_blank(&fragment[m.end()..]) && !is_blank(&fragment[from..m.start()]))
            .then(|| (m.start()..m.end(), Self::weight(m.as_str())))
    }
}

impl Default for SectionBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for SectionBlock {
    type Info = SectionInfo;

    fn name(&self) -> &'static str {
        "section"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<SectionInfo> {
        let fragment = cx.fragment();
        let text_end = fragment.trim_end().len();

        if let Some(caps) = self.heading.captures(fragment) {
            let prefix = caps.get(1)?;
            let levels = prefix.as_str().split('.').filter(|p| !p.is_empty()).count();
            return Some(match self.final_underline(fragment, prefix.end()) {
                Some((underline, weight)) => SectionInfo {
                    levels,
                    weight,
                    title: prefix.end()..underline.start,
                },
                None => SectionInfo {
                    levels,
                    weight: 0,
                    title: prefix.end()..text_end.max(prefix.end()),
                },
            });
        }

        if let Some(caps) = self.hashes.captures(fragment) {
            let marker = caps.get(1)?;
            return Some(SectionInfo {
                levels: caps[2].len(),
                weight: 0,
                title: marker.end()..text_end,
            });
        }

        let (underline, weight) = self.final_underline(fragment, 0)?;
        Some(SectionInfo {
            levels: 0,
            weight,
            title: 0..underline.start,
        })
    }

    fn process(&self, cx: &mut ParsingContext<'_>, info: SectionInfo) {
        let (start, end) = (cx.block_start(), cx.block_end());
        let base = cx.offset();
        let indent = cx.parser().indentation(cx.block_text());
        let depth = info.depth();

        let parent = cx.parent_section(depth, indent);
        let nesting = cx
            .tree()
            .ancestors(parent)
            .filter(|n| cx.tree().is_named(*n, "section"))
            .count()
            + 1;
        let heading = cx.fragment()[info.title.clone()].trim().to_string();
        let id = cx.unique_key(&heading);
        log::debug!("section {heading:?} at depth {depth}, indent {indent}");

        let section = cx.tree_mut().element("section");
        let tree = cx.tree_mut();
        tree.set_attr(section, "depth", nesting.to_string());
        tree.set_attr(section, "id", id);
        tree.set_attr(section, "_indent", indent.to_string());
        cx.mark_span(section, start, end);

        let title = cx.append_element(section, "title");
        cx.mark_span(title, base + info.title.start, base + info.title.end);
        parse_range(cx, title, info.title);
        trim_edges(cx, title);

        let content = cx.append_element(section, "content");
        cx.tree_mut().set_attr(content, "_indent", indent.to_string());
        cx.tree_mut().append(parent, section);
        cx.set_current(content);
        cx.declare_section(content, depth, indent);
        cx.set_offset(end);
    }
}
