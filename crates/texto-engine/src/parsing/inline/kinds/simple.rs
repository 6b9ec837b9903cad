//! Single-pattern inline constructs.
//!
//! Each constructor pairs a pattern with the element it produces and how the
//! first capture group becomes its content.

use regex::Regex;

use crate::parsing::inline::{InlineMatch, InlineParser, parse_range};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

/// What becomes of capture group 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// Parsed again as inline content.
    Inline,
    /// Kept as-is.
    Verbatim,
    /// No content; the element alone marks the construct.
    Empty,
    /// No content; a non-blank group 1 sets `checked=true`.
    Checked,
}

#[derive(Debug, Clone)]
pub struct SimpleInline {
    label: &'static str,
    /// `None` appends the body as bare text.
    element: Option<&'static str>,
    pattern: Regex,
    body: Body,
    /// Capture group reported as the match, leaving context around it as text.
    mark: Option<usize>,
}

impl SimpleInline {
    fn new(label: &'static str, element: Option<&'static str>, pattern: &str, body: Body) -> Self {
        Self {
            label,
            element,
            pattern: compile(pattern),
            body,
            mark: None,
        }
    }

    fn marked(mut self, group: usize) -> Self {
        self.mark = Some(group);
        self
    }

    /// `\*`, `\[` …: the character itself, never markup.
    pub fn escaped_char() -> Self {
        Self::new(
            "escaped-char",
            None,
            r#"\\([\\`*_{}\[\]()<>#+\-.!|~/'"$&=])"#,
            Body::Verbatim,
        )
    }

    pub fn email() -> Self {
        Self::new(
            "email",
            Some("email"),
            r"<([\w.+\-]+@[\w\-]+(?:\.[\w\-]+)+)>",
            Body::Verbatim,
        )
    }

    pub fn url() -> Self {
        Self::new(
            "url",
            Some("url"),
            r"<([A-Za-z][A-Za-z0-9+.\-]*://[^>\s]+)>",
            Body::Verbatim,
        )
    }

    /// A url in running text; trailing punctuation stays outside it.
    pub fn bare_url() -> Self {
        Self::new(
            "bare-url",
            Some("url"),
            r#"\b((?:https?|ftp|file)://[^\s<>\[\]()]*[^\s<>\[\]().,;:!?'"])"#,
            Body::Verbatim,
        )
    }

    pub fn code() -> Self {
        Self::new("code", Some("code"), r"`([^`]+)`", Body::Verbatim)
    }

    /// `|a term|`, one line with no padding inside the bars.
    pub fn term() -> Self {
        Self::new(
            "term",
            Some("term"),
            r"\|([^|\s](?:[^|\n]*[^|\s])?)\|",
            Body::Inline,
        )
    }

    /// `'word'`
    pub fn quoted_term() -> Self {
        Self::new("quoted-term", Some("term"), r"'(\w+)'", Body::Inline)
    }

    pub fn strong() -> Self {
        Self::new(
            "strong",
            Some("strong"),
            r"\*\*([^*\s](?:[^*]*[^*\s])?)\*\*",
            Body::Inline,
        )
    }

    pub fn em() -> Self {
        Self::new(
            "em",
            Some("em"),
            r"\*([^*\s](?:[^*]*[^*\s])?)\*",
            Body::Inline,
        )
    }

    pub fn strikethrough() -> Self {
        Self::new(
            "strikethrough",
            Some("strikethrough"),
            r"~~([^~\s](?:[^~]*[^~\s])?)~~",
            Body::Inline,
        )
    }

    /// A line holding only `|`.
    pub fn line_break() -> Self {
        Self::new(
            "break",
            Some("break"),
            r"[ \t]*\n[ \t]*\|[ \t]*(?:\n|$)",
            Body::Empty,
        )
    }

    /// A literal `\n`.
    pub fn newline() -> Self {
        Self::new("newline", Some("newline"), r"\\n", Body::Empty)
    }

    pub fn dots() -> Self {
        Self::new("dots", Some("dots"), r"\.\.\.", Body::Empty)
    }

    pub fn emdash() -> Self {
        Self::new("emdash", Some("emdash"), r"[ \t](---)(?:[ \t]|$)", Body::Empty).marked(1)
    }

    pub fn endash() -> Self {
        Self::new("endash", Some("endash"), r"[ \t](--)(?:[ \t]|$)", Body::Empty).marked(1)
    }

    pub fn checkbox() -> Self {
        Self::new("checkbox", Some("checkbox"), r"\[([ xX])\]", Body::Checked)
    }
}

impl InlineParser for SimpleInline {
    fn name(&self) -> &'static str {
        self.label
    }

    fn recognises(&self, cx: &ParsingContext<'_>) -> Option<InlineMatch> {
        let m = InlineMatch::from_captures(&self.pattern.captures(cx.fragment())?);
        Some(match self.mark {
            Some(group) => m.narrowed_to(group),
            None => m,
        })
    }

    fn parse(&self, cx: &mut ParsingContext<'_>, node: NodeId, m: &InlineMatch) -> usize {
        let Some(name) = self.element else {
            let text = m.group(cx.fragment(), 1).unwrap_or_default().to_string();
            cx.append_text(node, text);
            return m.end;
        };
        let element = cx.tree_mut().element(name);
        match (self.body, m.range(1)) {
            (Body::Inline, Some(range)) => parse_range(cx, element, range),
            (Body::Verbatim, Some(range)) => {
                let text = cx.fragment()[range].to_string();
                cx.append_text(element, text);
            }
            (Body::Checked, range) => {
                let checked = range.is_some_and(|r| !cx.fragment()[r].trim().is_empty());
                cx.tree_mut().set_attr(element, "checked", checked.to_string());
            }
            _ => {}
        }
        cx.tree_mut().append(node, element);
        m.end
    }
}
