//! List items.
//!
//! ```text
//! - first
//!   - nested, because it is indented further
//! - second
//! [ ] a todo item
//! 1) an ordered item
//! ```
//!
//! A block may hold several items; each one is placed by comparing its
//! indent with the `_indent` of the lists and items around the cursor:
//!
//! - walk up while on a list indented deeper, or an item indented as deep
//! - on a list whose last item is shallower, descend into that item
//! - anything that is not a list gets a new list
//!
//! After a blank line the driver hands back the last item, so a list
//! continues across blank lines.

use regex::Regex;

use crate::parsing::blocks::BlockParser;
use crate::parsing::diagnostics::Issue;
use crate::parsing::inline::{parse_range, trim_edges};
use crate::parsing::text::{count_leading_spaces, is_blank};
use crate::parsing::{ParsingContext, compile};
use crate::tree::NodeId;

pub struct ListItemBlock {
    item: Regex,
    heading: Regex,
}

/// An item marker, relative to the offset it was searched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMarker {
    pub start: usize,
    /// Just after the marker and the whitespace following it.
    pub end: usize,
    pub indent: usize,
    pub marker: String,
}

impl ItemMarker {
    /// `todo` attribute of the item.
    pub fn todo(&self) -> Option<&'static str> {
        match self.marker.as_str() {
            "[ ]" => Some("true"),
            "[x]" | "[X]" => Some("done"),
            _ => None,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.marker.starts_with(|c: char| c.is_ascii_digit())
    }
}

impl ListItemBlock {
    pub fn new() -> Self {
        Self {
            item: compile(r"(?m)^([ \t]*)(-|\*\)|[0-9]+\)|[A-Za-z]\)|\[[ xX\-~]\])(?:[ \t]+|$)"),
            heading: compile(
                r"\A(?:([^:(`\n]+)(?::[ \t]*\r?\n[ \t]*|::[ \t]*)|([^/\\\n]+)[/\\][ \t]*\r?\n[ \t]*)",
            ),
        }
    }

    fn marker_at(&self, cx: &ParsingContext<'_>, text: &str, from: usize) -> Option<ItemMarker> {
        let caps = self.item.captures_at(text, from)?;
        let whole = caps.get(0)?;
        Some(ItemMarker {
            start: whole.start(),
            end: whole.end(),
            indent: count_leading_spaces(&caps[1], cx.parser().config().tab_width),
            marker: caps[2].to_string(),
        })
    }

    /// Moves the cursor to the node an item with `indent` belongs in and
    /// returns the list to append to, creating it when needed.
    fn position(cx: &mut ParsingContext<'_>, indent: usize) -> NodeId {
        let indent = indent as i64;
        loop {
            let tree = cx.tree();
            let current = cx.current();
            let own = tree.indent(current).unwrap_or(0);
            let climb = (tree.is_named(current, "list") && own > indent)
                || (tree.is_named(current, "list-item") && own >= indent);
            match tree.parent(current) {
                Some(parent) if climb => cx.set_current(parent),
                _ => break,
            }
        }

        let current = cx.current();
        if cx.tree().is_named(current, "list") {
            match cx.tree().last_child_named(current, "list-item") {
                Some(last) if cx.tree().indent(last).unwrap_or(0) < indent => {
                    cx.set_current(last);
                }
                _ => return current,
            }
        }

        let list = cx.tree_mut().element("list");
        cx.tree_mut().set_attr(list, "_indent", indent.to_string());
        cx.add_node(list);
        cx.set_current(list);
        list
    }

    /// Places one item. Returns it, with the marker of the next item in the
    /// block if there is one.
    fn place(&self, cx: &mut ParsingContext<'_>, marker: ItemMarker) -> (Option<NodeId>, Option<ItemMarker>) {
        if let Some(last) = cx.last_block() {
            if cx.tree().is_named(last, "list-item") {
                cx.set_current(last);
            }
        }
        cx.ensure_parent(&["content", "appendix", "chapter", "section", "list"]);
        let start = cx.offset() + marker.start;
        cx.set_offset(cx.offset() + marker.end);

        let fragment = cx.fragment();
        let next = fragment
            .find('\n')
            .and_then(|eol| self.marker_at(cx, fragment, eol));
        let item_end = next.as_ref().map_or(fragment.len(), |n| n.start);
        let item_text = &fragment[..item_end];
        let blank = is_blank(item_text);
        let (heading, body_start, definition) = match self.heading.captures(item_text) {
            Some(caps) => {
                let text_end = caps.get(1).or_else(|| caps.get(2)).map_or(0, |m| m.end());
                let body_start = caps.get(0).map_or(0, |m| m.end());
                (Some(text_end), body_start, caps.get(2).is_some())
            }
            None => (None, 0, false),
        };
        if blank {
            cx.warn_at(Issue::EmptyListItem, start);
            return (None, next);
        }

        let list = Self::position(cx, marker.indent);
        let item = cx.tree_mut().element("list-item");
        cx.tree_mut().set_attr(item, "_indent", marker.indent.to_string());
        if let Some(todo) = marker.todo() {
            cx.tree_mut().set_attr(item, "todo", todo);
        }
        let base = cx.offset();
        cx.mark_span(item, start, base + item_end);

        if let Some(text_end) = heading {
            let node = cx.append_element(item, "heading");
            parse_range(cx, node, 0..text_end);
            trim_edges(cx, node);
        }
        parse_range(cx, item, body_start..item_end);
        trim_edges(cx, item);
        cx.tree_mut().append(list, item);

        let kind = if marker.todo().is_some() {
            Some("todo")
        } else if marker.is_ordered() {
            Some("ordered")
        } else if definition {
            Some("definition")
        } else {
            None
        };
        if let Some(kind) = kind {
            cx.tree_mut().set_attr(list, "type", kind);
        }

        cx.set_current(item);
        (Some(item), next)
    }
}

impl Default for ListItemBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for ListItemBlock {
    type Info = ItemMarker;

    fn name(&self) -> &'static str {
        "list-item"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<ItemMarker> {
        self.marker_at(cx, cx.fragment(), 0)
            .filter(|m| m.start == 0)
    }

    fn process(&self, cx: &mut ParsingContext<'_>, first: ItemMarker) {
        let mut next = Some(first);
        while let Some(marker) = next.take() {
            let (item, following) = self.place(cx, marker);
            if following.is_some() {
                if let Some(item) = item {
                    cx.set_last_block(Some(item));
                }
            }
            next = following;
        }
        let end = cx.block_end();
        cx.set_offset(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::content_outline;
    use crate::parsing::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn two_items_one_list() {
        assert_eq!(
            content_outline("- item one\n- item two\n"),
            concat!(
                "content\n",
                "  list\n",
                "    list-item\n",
                "      \"item one\"\n",
                "    list-item\n",
                "      \"item two\"\n",
            )
        );
    }

    #[test]
    fn deeper_indent_nests_and_shallower_pops_out() {
        assert_eq!(
            content_outline("- a\n  - b\n    - c\n  - d\n- e"),
            concat!(
                "content\n",
                "  list\n",
                "    list-item\n",
                "      \"a\"\n",
                "      list\n",
                "        list-item\n",
                "          \"b\"\n",
                "          list\n",
                "            list-item\n",
                "              \"c\"\n",
                "        list-item\n",
                "          \"d\"\n",
                "    list-item\n",
                "      \"e\"\n",
            )
        );
    }

    #[test]
    fn list_continues_across_blank_lines() {
        assert_eq!(
            content_outline("- a\n\n- b\n\nafter"),
            concat!(
                "content\n",
                "  list\n",
                "    list-item\n",
                "      \"a\"\n",
                "    list-item\n",
                "      \"b\"\n",
                "  paragraph\n",
                "    \"after\"\n",
            )
        );
    }

    #[test]
    fn todo_items() {
        assert_eq!(
            content_outline("[ ] write\n[x] read"),
            concat!(
                "content\n",
                "  list type=\"todo\"\n",
                "    list-item todo=\"true\"\n",
                "      \"write\"\n",
                "    list-item todo=\"done\"\n",
                "      \"read\"\n",
            )
        );
    }

    #[test]
    fn numbered_markers_make_an_ordered_list() {
        assert_eq!(
            content_outline("1) one\n2) two\n\na) not a number"),
            concat!(
                "content\n",
                "  list type=\"ordered\"\n",
                "    list-item\n",
                "      \"one\"\n",
                "    list-item\n",
                "      \"two\"\n",
                "    list-item\n",
                "      \"not a number\"\n",
            )
        );
    }

    #[test]
    fn headings() {
        assert_eq!(
            content_outline("- Fruits:\n  apple, pear\n- Veg:: carrot\n- Tools/\n  hammer"),
            concat!(
                "content\n",
                "  list type=\"definition\"\n",
                "    list-item\n",
                "      heading\n",
                "        \"Fruits\"\n",
                "      \"apple, pear\"\n",
                "    list-item\n",
                "      heading\n",
                "        \"Veg\"\n",
                "      \"carrot\"\n",
                "    list-item\n",
                "      heading\n",
                "        \"Tools\"\n",
                "      \"hammer\"\n",
            )
        );
    }

    #[test]
    fn empty_item_is_reported_and_skipped() {
        let doc = parse("- \n- b");
        assert_eq!(
            doc.diagnostics.iter().map(|d| &d.issue).collect::<Vec<_>>(),
            vec![&Issue::EmptyListItem]
        );
        assert_eq!(
            doc.tree.outline_of(doc.part("content").unwrap()),
            "content\n  list\n    list-item\n      \"b\"\n"
        );
    }

    #[test]
    fn prose_starting_with_a_dash_word_is_not_a_list() {
        assert_eq!(
            content_outline("-dash"),
            "content\n  paragraph\n    \"-dash\"\n"
        );
    }
}
