//! `--` delimited metadata blocks.
//!
//! ```text
//! --
//! author: Ann Lee <ann@example.org>, Bo
//! creation: 2021-04-09
//! --
//! ```
//!
//! Every field becomes `meta name= value=` inside one `meta` element. Known
//! field names get a handler that adds structure (people, keywords, date
//! parts); unknown names are kept and reported.

use std::collections::HashMap;

use regex::Regex;

use crate::parsing::blocks::{BlockParser, first_line, lines_with_offsets};
use crate::parsing::diagnostics::Issue;
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

/// One `name: value` field, continuation lines folded into the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaField {
    pub name: String,
    pub value: String,
    /// Start of the field line, in context coordinates.
    pub offset: usize,
}

type FieldHandler = fn(&MetaBlock, &mut ParsingContext<'_>, NodeId, &MetaField);

pub struct MetaBlock {
    delimiter: Regex,
    field: Regex,
    email: Regex,
    date: Regex,
    kind: Regex,
    handlers: HashMap<&'static str, FieldHandler>,
}

impl MetaBlock {
    /// Fields stored without further structure.
    pub const PLAIN_FIELDS: &'static [&'static str] = &[
        "abstract",
        "acknowledgements",
        "language",
        "organisation",
        "organization",
        "reference",
        "revision",
        "title",
    ];

    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, FieldHandler> = HashMap::new();
        handlers.insert("author", Self::people);
        handlers.insert("authors", Self::people);
        handlers.insert("keywords", Self::keywords);
        handlers.insert("creation", Self::date);
        handlers.insert("last-mod", Self::date);
        handlers.insert("date", Self::date);
        handlers.insert("type", Self::kind);
        for name in Self::PLAIN_FIELDS {
            handlers.insert(*name, Self::plain);
        }
        Self {
            delimiter: compile(r"^[ \t]*--[ \t]*\r?$"),
            field: compile(r"^[ \t]*([\w\-]+)[ \t]*:[ \t]*(.*?)[ \t\r]*$"),
            email: compile(r"<([^>]+)>"),
            date: compile(r"^(\d{4})-(\d{1,2})-(\d{1,2})$"),
            kind: compile(r"^(\w+)[ \t]*(?:\((\w+)\))?$"),
            handlers,
        }
    }

    /// Comma separated list, a trailing period dropped.
    fn items(value: &str) -> impl Iterator<Item = &str> {
        let value = value.trim();
        value
            .strip_suffix('.')
            .unwrap_or(value)
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
    }

    fn plain(&self, _: &mut ParsingContext<'_>, _: NodeId, _: &MetaField) {}

    fn people(&self, cx: &mut ParsingContext<'_>, node: NodeId, field: &MetaField) {
        for author in Self::items(&field.value) {
            let person = cx.append_element(node, "person");
            let name = match self.email.captures(author) {
                Some(caps) => {
                    cx.tree_mut().set_attr(person, "email", &caps[1]);
                    author[..caps.get(0).map_or(author.len(), |m| m.start())].trim()
                }
                None => author,
            };
            cx.append_text(person, name);
        }
    }

    fn keywords(&self, cx: &mut ParsingContext<'_>, node: NodeId, field: &MetaField) {
        for keyword in Self::items(&field.value) {
            let element = cx.append_element(node, "keyword");
            cx.append_text(element, keyword);
        }
    }

    fn date(&self, cx: &mut ParsingContext<'_>, node: NodeId, field: &MetaField) {
        let Some(caps) = self.date.captures(field.value.trim()) else {
            cx.warn_at(Issue::MalformedDate(field.value.clone()), field.offset);
            return;
        };
        let [year, month, day] = [1, 2, 3].map(|i| caps[i].parse::<u32>().unwrap_or(0));
        if !(1..=12).contains(&month) {
            cx.warn_at(Issue::BadMonth(month.to_string()), field.offset);
        }
        if !(1..=31).contains(&day) {
            cx.warn_at(Issue::BadDay(day.to_string()), field.offset);
        }
        let tree = cx.tree_mut();
        tree.set_attr(node, "year", year.to_string());
        tree.set_attr(node, "month", month.to_string());
        tree.set_attr(node, "day", day.to_string());
    }

    fn kind(&self, cx: &mut ParsingContext<'_>, node: NodeId, field: &MetaField) {
        let Some(caps) = self.kind.captures(field.value.trim()) else {
            cx.warn_at(Issue::MalformedMetaType(field.value.clone()), field.offset);
            return;
        };
        let name = caps[1].to_lowercase();
        let style = caps.get(2).map(|s| s.as_str().to_lowercase());
        let tree = cx.tree_mut();
        tree.set_attr(node, "type", name);
        if let Some(style) = style {
            tree.set_attr(node, "style", style);
        }
    }

    /// Fields of the block body, which starts after the opening `--`.
    pub fn fields(&self, body: &str, base: usize) -> Vec<MetaField> {
        let mut fields: Vec<MetaField> = Vec::new();
        for (at, line) in lines_with_offsets(body) {
            if self.delimiter.is_match(line) {
                break;
            }
            match self.field.captures(line) {
                Some(caps) => fields.push(MetaField {
                    name: caps[1].to_lowercase(),
                    value: caps[2].to_string(),
                    offset: base + at,
                }),
                None => {
                    if let Some(last) = fields.last_mut() {
                        if !last.value.is_empty() {
                            last.value.push(' ');
                        }
                        last.value.push_str(line.trim());
                    }
                }
            }
        }
        fields
    }
}

impl Default for MetaBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for MetaBlock {
    /// Offset of the body, just after the opening line.
    type Info = usize;

    fn name(&self) -> &'static str {
        "meta"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<usize> {
        let (at, line) = first_line(cx.fragment())?;
        self.delimiter
            .is_match(line)
            .then(|| (at + line.len() + 1).min(cx.fragment().len()))
    }

    fn process(&self, cx: &mut ParsingContext<'_>, body: usize) {
        let (start, end) = (cx.block_start(), cx.block_end());
        let base = cx.offset() + body;
        let fields = self.fields(&cx.fragment()[body..], base);
        cx.set_offset(end);
        if fields.is_empty() {
            cx.warn_at(Issue::EmptyMetaBlock, start);
            return;
        }

        let meta = cx.tree_mut().element("meta");
        cx.mark_span(meta, start, end);
        for field in &fields {
            let node = cx.append_element(meta, "meta");
            cx.tree_mut().set_attr(node, "name", field.name.as_str());
            cx.tree_mut().set_attr(node, "value", field.value.as_str());
            match self.handlers.get(field.name.as_str()) {
                Some(handler) => handler(self, cx, node, field),
                None => cx.warn_at(Issue::UnknownMetaField(field.name.clone()), field.offset),
            }
        }
        cx.add_node(meta);
    }
}
