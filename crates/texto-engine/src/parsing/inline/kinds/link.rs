use regex::Regex;

use crate::parsing::inline::{InlineMatch, InlineParser, parse_range};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

/// Classifies a reference target: `#name` is internal, `$key` points into a
/// bibliography, anything else (optionally in `<…>`) is a url.
pub fn identify_reference(target: &str) -> (&'static str, String) {
    let target = target.trim();
    if let Some(name) = target.strip_prefix('#') {
        ("ref", name.to_string())
    } else if let Some(key) = target.strip_prefix('$') {
        ("bibliographic", key.to_string())
    } else if let Some(url) = target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        ("url", url.to_string())
    } else {
        ("url", target.to_string())
    }
}

/// `[label](target)`.
#[derive(Debug, Clone)]
pub struct LinkInline {
    pattern: Regex,
}

impl LinkInline {
    pub fn new() -> Self {
        Self {
            pattern: compile(r"\[([^\]\n]+)\]\(([^)\s]+)\)"),
        }
    }
}

impl Default for LinkInline {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineParser for LinkInline {
    fn name(&self) -> &'static str {
        "link"
    }

    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        self.pattern
            .captures(cx.fragment())
            .map(|c| InlineMatch::from_captures(&c))
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let (kind, target) = identify_reference(m.group(cx.fragment(), 2).unwrap_or_default());
        let link = cx.tree_mut().element("link");
        cx.tree_mut().set_attr(link, "type", kind);
        cx.tree_mut().set_attr(link, "target", target);
        if let Some(label) = m.range(1) {
            parse_range(cx, link, label);
        }
        cx.tree_mut().append(node, link);
        m.end
    }
}

/// `[> name]`: an anchor that `#name` links point to.
#[derive(Debug, Clone)]
pub struct TargetInline {
    pattern: Regex,
}

impl TargetInline {
    pub fn new() -> Self {
        Self {
            pattern: compile(r"\[>[ \t]*([^\]\n]*[^\]\s])[ \t]*\]"),
        }
    }
}

impl Default for TargetInline {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineParser for TargetInline {
    fn name(&self) -> &'static str {
        "target"
    }

    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        self.pattern
            .captures(cx.fragment())
            .map(|c| InlineMatch::from_captures(&c))
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let name = m.group(cx.fragment(), 1).unwrap_or_default().to_string();
        let target = cx.append_element(node, "target");
        cx.tree_mut().set_attr(target, "name", name);
        m.end
    }
}
