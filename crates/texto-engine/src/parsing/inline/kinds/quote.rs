//! Quotes and citations with trailing metadata.
//!
//! - `<<quoted text>>(:title:authors:year:link)`
//! - `>>cited text<<(:authors:link)`
//!
//! Every metadata field is optional; present ones become attributes and the
//! link is classified like a link target.

use regex::Regex;

use super::link::identify_reference;
use crate::parsing::inline::{InlineMatch, InlineParser, parse_range};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

#[derive(Debug, Clone)]
pub struct QuoteInline {
    element: &'static str,
    pattern: Regex,
    /// Attribute name per metadata group, starting at group 2. The last field
    /// is the link.
    fields: &'static [&'static str],
}

impl QuoteInline {
    pub fn quote() -> Self {
        Self {
            element: "quote",
            pattern: compile(concat!(
                r"<<((?:[^>]|>[^>])+)>>",
                r"(?:\((?::([^:)]*))?(?::([^:)]*))?(?::([^:)]*))?(?::([^)]*))?\))?",
            )),
            fields: &["title", "authors", "year", "link"],
        }
    }

    pub fn citation() -> Self {
        Self {
            element: "citation",
            pattern: compile(concat!(
                r">>((?:[^<]|<[^<])+)<<",
                r"(?:\((?::([^:)]*))?(?::([^)]*))?\))?",
            )),
            fields: &["authors", "link"],
        }
    }
}

impl InlineParser for QuoteInline {
    fn name(&self) -> &'static str {
        self.element
    }

    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        self.pattern
            .captures(cx.fragment())
            .map(|c| InlineMatch::from_captures(&c))
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let element = cx.tree_mut().element(self.element);
        for (i, field) in self.fields.iter().enumerate() {
            let Some(value) = m.group(cx.fragment(), i + 2).map(str::trim) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            if *field == "link" {
                let (kind, target) = identify_reference(value);
                cx.tree_mut().set_attr(element, "type", kind);
                cx.tree_mut().set_attr(element, "target", target);
            } else {
                let value = value.to_string();
                cx.tree_mut().set_attr(element, *field, value);
            }
        }
        if let Some(body) = m.range(1) {
            parse_range(cx, element, body);
        }
        cx.tree_mut().append(node, element);
        m.end
    }
}
