use regex::Regex;

use crate::parsing::blocks::BlockParser;
use crate::parsing::{ParsingContext, compile};

/// `-- name k=v`: starts a new top-level `content` part.
pub struct SeparatorBlock {
    pattern: Regex,
}

pub struct SeparatorInfo {
    name: String,
    attrs: String,
}

impl SeparatorBlock {
    pub fn new() -> Self {
        Self {
            pattern: compile(concat!(
                r"\A\s*--[ \t]+([A-Za-z0-9][\w\-]*)",
                r#"((?:[ \t]+[A-Za-z][\w\-:]*=(?:"[^"\n]*"|'[^'\n]*'|[^\s"']+))*)\s*\z"#,
            )),
        }
    }
}

impl Default for SeparatorBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for SeparatorBlock {
    type Info = SeparatorInfo;

    fn name(&self) -> &'static str {
        "separator"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<SeparatorInfo> {
        let caps = self.pattern.captures(cx.fragment())?;
        Some(SeparatorInfo {
            name: caps[1].to_string(),
            attrs: caps[2].to_string(),
        })
    }

    fn process(&self, cx: &mut ParsingContext<'_>, info: SeparatorInfo) {
        let (start, end) = (cx.block_start(), cx.block_end());
        let (attrs, _) = cx.parser().markup().parse_attributes(&info.attrs);

        cx.ensure_parent(&["document"]);
        let part = cx.tree_mut().element("content");
        cx.tree_mut().set_attr(part, "type", info.name);
        for (k, v) in attrs.iter() {
            cx.tree_mut().set_attr(part, k, v);
        }
        cx.mark_span(part, start, end);
        cx.add_node(part);
        cx.set_current(part);
        cx.set_offset(end);
    }
}
