use regex::Regex;

use crate::parsing::inline::{InlineMatch, InlineParser};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

/// Named entities understood without a numeric form.
const NAMED: &[(&str, u32)] = &[
    ("amp", 38),
    ("lt", 60),
    ("gt", 62),
    ("quot", 34),
    ("apos", 39),
    ("nbsp", 160),
    ("copy", 169),
    ("reg", 174),
    ("trade", 8482),
    ("laquo", 171),
    ("raquo", 187),
    ("ndash", 8211),
    ("mdash", 8212),
    ("hellip", 8230),
    ("euro", 8364),
    ("eacute", 233),
    ("egrave", 232),
    ("agrave", 224),
    ("ccedil", 231),
];

/// `&name;`, `&#65;` and `&#x41;`, emitted as `entity num=<code point>`.
#[derive(Debug, Clone)]
pub struct EntityInline {
    pattern: Regex,
}

impl EntityInline {
    pub fn new() -> Self {
        Self {
            pattern: compile(r"&(#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);"),
        }
    }

    pub fn code_point(reference: &str) -> Option<u32> {
        if let Some(hex) = reference
            .strip_prefix("#x")
            .or_else(|| reference.strip_prefix("#X"))
        {
            u32::from_str_radix(hex, 16).ok()
        } else if let Some(dec) = reference.strip_prefix('#') {
            dec.parse().ok()
        } else {
            NAMED
                .iter()
                .find(|(name, _)| *name == reference)
                .map(|(_, code)| *code)
        }
    }
}

impl Default for EntityInline {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineParser for EntityInline {
    fn name(&self) -> &'static str {
        "entity"
    }

    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        self.pattern
            .captures(cx.fragment())
            .map(|c| InlineMatch::from_captures(&c))
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let reference = m.group(cx.fragment(), 1).unwrap_or_default();
        match Self::code_point(reference) {
            Some(code) => {
                let entity = cx.append_element(node, "entity");
                cx.tree_mut().set_attr(entity, "num", code.to_string());
            }
            None => {
                // Unknown names stay literal
                let literal = cx.fragment()[m.start..m.end].to_string();
                cx.append_text(node, literal);
            }
        }
        m.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("amp", Some(38))]
    #[case("#65", Some(65))]
    #[case("#x41", Some(65))]
    #[case("bogus", None)]
    fn resolves_code_points(#[case] reference: &str, #[case] expected: Option<u32>) {
        assert_eq!(EntityInline::code_point(reference), expected);
    }
}
