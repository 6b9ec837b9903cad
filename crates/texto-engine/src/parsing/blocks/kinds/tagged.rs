use regex::Regex;

use crate::parsing::blocks::{BlockParser, first_line};
use crate::parsing::text::is_blank;
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

/// `NAME: title ___` opens a typed `block`; a bare `___` closes it.
///
/// ```text
/// NOTE: Careful ___
/// The stove is hot.
///
/// Blocks in between go inside.
///
/// ___
/// ```
pub struct TaggedBlock {
    marker: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedInfo {
    Open {
        name: String,
        title: Option<String>,
        rest: usize,
    },
    Close {
        rest: usize,
    },
}

impl TaggedBlock {
    pub fn new() -> Self {
        Self {
            marker: compile(
                r"^[ \t]*(?:([^_:\s][^_:\n]*?)[ \t]*(?::[ \t]*([^_\n]*?))?[ \t]*)?_{3,}[ \t\r]*$",
            ),
        }
    }

    /// The innermost open tagged block around the cursor.
    fn open_block(cx: &ParsingContext<'_>) -> Option<NodeId> {
        let tree = cx.tree();
        tree.ancestors(cx.current())
            .find(|n| tree.is_named(*n, "block") && tree.attr(*n, "type").is_some())
    }
}

impl Default for TaggedBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for TaggedBlock {
    type Info = TaggedInfo;

    fn name(&self) -> &'static str {
        "tagged"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<TaggedInfo> {
        let (at, line) = first_line(cx.fragment())?;
        let caps = self.marker.captures(line)?;
        let rest = (at + line.len() + 1).min(cx.fragment().len());
        Some(match caps.get(1) {
            Some(name) => TaggedInfo::Open {
                name: name.as_str().trim().to_lowercase(),
                title: caps
                    .get(2)
                    .map(|t| t.as_str().trim().to_string())
                    .filter(|t| !t.is_empty()),
                rest,
            },
            None => TaggedInfo::Close { rest },
        })
    }

    fn process(&self, cx: &mut ParsingContext<'_>, info: TaggedInfo) {
        let start = cx.block_start();
        let rest = match &info {
            TaggedInfo::Open { rest, .. } | TaggedInfo::Close { rest } => *rest,
        };
        // Lines after the marker are left to the driver as a block of their own
        if !is_blank(&cx.fragment()[rest..]) {
            cx.set_current_block_end(start + rest);
        }
        let end = cx.block_end();

        match info {
            TaggedInfo::Open { name, title, .. } => {
                let indent = cx.parser().indentation(cx.block_text());
                if let Some(open) = Self::open_block(cx) {
                    if let Some(parent) = cx.tree().parent(open) {
                        cx.set_current(parent);
                    }
                }
                let block = cx.tree_mut().element("block");
                let tree = cx.tree_mut();
                tree.set_attr(block, "type", name);
                if let Some(title) = title {
                    tree.set_attr(block, "title", title);
                }
                tree.set_attr(block, "_indent", indent.to_string());
                cx.mark_span(block, start, end);

                let content = cx.append_element(block, "content");
                cx.tree_mut().set_attr(content, "_indent", indent.to_string());
                cx.add_node(block);
                cx.set_current(content);
            }
            TaggedInfo::Close { .. } => {
                match Self::open_block(cx).and_then(|open| cx.tree().parent(open)) {
                    Some(parent) => cx.set_current(parent),
                    None => log::debug!("closing marker without an open block at {start}"),
                }
            }
        }
        cx.set_offset(end);
    }
}
