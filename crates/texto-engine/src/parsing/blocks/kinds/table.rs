//! Tables framed by separator lines.
//!
//! ```text
//! == Prices#prices
//! =====================
//! Item     || Price
//! =====================
//! Apple    || 1
//! ---------------------
//! Pear     || 2
//!          || on sale
//! ---------------------
//! ```
//!
//! Lines between two separators are one row; a cell continuing over several
//! lines is joined with newlines. The separator that closes a row decides its
//! type: `=` makes a header row, `-` a data row. Every cell is parsed as a
//! nested mini-document.

use regex::Regex;

use crate::parsing::blocks::{BlockParser, lines_with_offsets};
use crate::parsing::{ParsingContext, compile};

pub struct TableBlock {
    separator: Regex,
    caption: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    caption: Option<String>,
    /// Lines after the opening separator, with their offsets in the fragment.
    body: Vec<(usize, String)>,
}

/// A cell being accumulated over the lines of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PendingCell {
    text: String,
    offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Header,
    Data,
}

impl RowKind {
    fn as_str(self) -> &'static str {
        match self {
            RowKind::Header => "header",
            RowKind::Data => "data",
        }
    }
}

impl TableBlock {
    pub const CELL: &'static str = "||";
    pub const NARROW_CELL: &'static str = "|";

    pub fn new() -> Self {
        Self {
            separator: compile(r"^[ \t]*(?:[\-+]+|[=+]+)[ \t\r]*$"),
            caption: compile(r"^[ \t]*==([^=].*?)[ \t\r]*$"),
        }
    }

    /// Cells of a row line, with their offsets in the line. Border pipes are
    /// not cells.
    pub fn split_row(line: &str) -> Vec<(usize, &str)> {
        let delimiter = if line.contains(Self::CELL) {
            Self::CELL
        } else {
            Self::NARROW_CELL
        };
        let mut base = line.len() - line.trim_start().len();
        let mut body = line.trim();
        if let Some(rest) = body.strip_prefix(delimiter) {
            body = rest;
            base += delimiter.len();
        }
        body = body.strip_suffix(delimiter).unwrap_or(body);

        let mut at = base;
        body.split(delimiter)
            .map(|cell| {
                let found = (at, cell);
                at += cell.len() + delimiter.len();
                found
            })
            .collect()
    }

    fn rows(&self, body: &[(usize, String)]) -> Vec<(Vec<PendingCell>, RowKind)> {
        let mut rows = Vec::new();
        let mut pending: Vec<PendingCell> = Vec::new();
        for (offset, line) in body {
            if self.separator.is_match(line) {
                if !pending.is_empty() {
                    let kind = if line.contains('=') {
                        RowKind::Header
                    } else {
                        RowKind::Data
                    };
                    rows.push((std::mem::take(&mut pending), kind));
                }
                continue;
            }
            for (i, (at, text)) in Self::split_row(line).into_iter().enumerate() {
                match pending.get_mut(i) {
                    Some(cell) => {
                        cell.text.push('\n');
                        cell.text.push_str(text);
                    }
                    None => pending.push(PendingCell {
                        text: text.to_string(),
                        offset: offset + at,
                    }),
                }
            }
        }
        if !pending.is_empty() {
            rows.push((pending, RowKind::Data));
        }
        rows
    }
}

impl Default for TableBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for TableBlock {
    type Info = TableInfo;

    fn name(&self) -> &'static str {
        "table"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<TableInfo> {
        let lines = lines_with_offsets(cx.fragment());
        let (caption, rest) = match lines.split_first() {
            Some(((_, first), rest)) => match self.caption.captures(first) {
                Some(caps) => (Some(caps[1].trim().to_string()), rest),
                None => (None, &lines[..]),
            },
            None => return None,
        };
        let [(_, opening), body @ .., (_, closing)] = rest else {
            return None;
        };
        if !self.separator.is_match(opening) || !self.separator.is_match(closing) {
            return None;
        }
        let mut body: Vec<(usize, String)> = body
            .iter()
            .map(|(at, line)| (*at, line.trim_end_matches('\r').to_string()))
            .collect();
        if let Some((at, line)) = rest.last() {
            body.push((*at, line.to_string()));
        }
        Some(TableInfo { caption, body })
    }

    fn process(&self, cx: &mut ParsingContext<'_>, info: TableInfo) {
        let (start, end) = (cx.block_start(), cx.block_end());
        let base = cx.offset();
        let table = cx.tree_mut().element("table");
        cx.mark_span(table, start, end);

        if let Some(caption) = info.caption {
            let (title, id) = match caption.rsplit_once('#') {
                Some((title, id)) if !id.trim().is_empty() => (title, Some(id.trim())),
                _ => (caption.as_str(), None),
            };
            if let Some(id) = id {
                cx.tree_mut().set_attr(table, "id", id);
            }
            let title = cx.parser().process_text(title.trim());
            let node = cx.append_element(table, "caption");
            cx.append_text(node, title);
        }

        let rows = self.rows(&info.body);
        let width = rows.iter().map(|(cells, _)| cells.len()).max().unwrap_or(0);
        log::trace!("table of {} rows, {width} columns", rows.len());
        for (cells, kind) in rows {
            let row = cx.append_element(table, "row");
            let last = cells.len() - 1;
            for (i, cell) in cells.into_iter().enumerate() {
                let node = cx.append_element(row, "cell");
                cx.tree_mut().set_attr(node, "type", kind.as_str());
                if i == last && last + 1 < width {
                    cx.tree_mut()
                        .set_attr(node, "colspan", (width - i).to_string());
                }
                cx.parse_nested(&cell.text, base + cell.offset, node);
            }
        }

        cx.add_node(table);
        cx.set_offset(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::content_outline;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("a || b", vec![(0, "a "), (4, " b")])]
    #[case("| a | b |", vec![(1, " a "), (5, " b ")])]
    #[case("  || x ||", vec![(4, " x ")])]
    #[case("no pipes", vec![(0, "no pipes")])]
    fn splits_cells(#[case] line: &str, #[case] expected: Vec<(usize, &str)>) {
        assert_eq!(TableBlock::split_row(line), expected);
    }

    #[test]
    fn header_then_data_rows() {
        assert_eq!(
            content_outline("=====\nName || Age\n=====\nAnn || 3\n-----\nBo || 4\n-----"),
            concat!(
                "content\n",
                "  table\n",
                "    row\n",
                "      cell type=\"header\"\n",
                "        paragraph\n",
                "          \"Name\"\n",
                "      cell type=\"header\"\n",
                "        paragraph\n",
                "          \"Age\"\n",
                "    row\n",
                "      cell type=\"data\"\n",
                "        paragraph\n",
                "          \"Ann\"\n",
                "      cell type=\"data\"\n",
                "        paragraph\n",
                "          \"3\"\n",
                "    row\n",
                "      cell type=\"data\"\n",
                "        paragraph\n",
                "          \"Bo\"\n",
                "      cell type=\"data\"\n",
                "        paragraph\n",
                "          \"4\"\n",
            )
        );
    }

    #[test]
    fn caption_short_rows_and_multiline_cells() {
        assert_eq!(
            content_outline("== Prices#prices\n---\nA | B | C\n---\nwide\nmore\n---"),
            concat!(
                "content\n",
                "  table id=\"prices\"\n",
                "    caption\n",
                "      \"Prices\"\n",
                "    row\n",
                "      cell type=\"data\"\n",
                "        paragraph\n",
                "          \"A\"\n",
                "      cell type=\"data\"\n",
                "        paragraph\n",
                "          \"B\"\n",
                "      cell type=\"data\"\n",
                "        paragraph\n",
                "          \"C\"\n",
                "    row\n",
                "      cell type=\"data\" colspan=\"3\"\n",
                "        paragraph\n",
                "          \"wide more\"\n",
            )
        );
    }

    #[test]
    fn underlined_text_is_not_a_table() {
        assert!(!content_outline("Heading\n-------\n\nbody").contains("table"));
    }
}
