use regex::Regex;

use crate::parsing::blocks::BlockParser;
use crate::parsing::inline::{parse_range, trim_edges};
use crate::parsing::{ParsingContext, compile};

/// Indented `[name]: text` entries, collected under `references`.
pub struct ReferenceBlock {
    entry: Regex,
}

impl ReferenceBlock {
    pub fn new() -> Self {
        Self {
            entry: compile(r"(?m)^[ \t]+\[([^\]\n]+)\]:"),
        }
    }
}

impl Default for ReferenceBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for ReferenceBlock {
    /// `(id, body start, entry start)` per entry, relative to the fragment.
    type Info = Vec<(String, usize, usize)>;

    fn name(&self) -> &'static str {
        "reference"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<Self::Info> {
        let fragment = cx.fragment();
        let start = fragment.len() - fragment.trim_start_matches(['\r', '\n']).len();
        let entries: Vec<_> = self
            .entry
            .captures_iter(fragment)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some((caps[1].trim().to_string(), whole.end(), whole.start()))
            })
            .collect();
        match entries.first() {
            Some((_, _, at)) if *at == start => Some(entries),
            _ => None,
        }
    }

    fn process(&self, cx: &mut ParsingContext<'_>, entries: Self::Info) {
        let base = cx.offset();
        let length = cx.fragment().len();
        let references = cx.references();
        let ends: Vec<usize> = entries
            .iter()
            .skip(1)
            .map(|(_, _, at)| *at)
            .chain([length])
            .collect();

        for ((id, body, at), end) in entries.into_iter().zip(ends) {
            let entry = cx.append_element(references, "entry");
            cx.tree_mut().set_attr(entry, "id", id);
            cx.mark_span(entry, base + at, base + end);
            parse_range(cx, entry, body..end);
            trim_edges(cx, entry);
        }
        let end = cx.block_end();
        cx.set_offset(end);
    }
}

#[cfg(test)]
mod tests {
    use crate::parsing::blocks::{content_outline, part_outline};
    use pretty_assertions::assert_eq;

    #[test]
    fn entries_go_to_references() {
        let text = "Body [see](#knuth).\n\n  [knuth]: Knuth, *The Art*\n  [lamport]: Lamport,\n    LaTeX";
        assert_eq!(
            part_outline(text, "references"),
            concat!(
                "references\n",
                "  entry id=\"knuth\"\n",
                "    \"Knuth, \"\n",
                "    em\n",
                "      \"The Art\"\n",
                "  entry id=\"lamport\"\n",
                "    \"Lamport, LaTeX\"\n",
            )
        );
        assert!(!content_outline(text).contains("entry"));
    }

    #[test]
    fn unindented_brackets_are_prose() {
        assert!(part_outline("[knuth]: Knuth", "references").is_empty());
    }
}
