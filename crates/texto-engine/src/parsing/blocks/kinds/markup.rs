use crate::parsing::ParsingContext;
use crate::parsing::blocks::BlockParser;
use crate::parsing::inline::{InlineMatch, InlineParser};
use crate::parsing::text::is_blank;

/// A block that is exactly one `[start name] … [end name]` span.
///
/// Recognition only locates the closing tag, so a block rejected because text
/// follows the span leaves nothing behind for the paragraph fallback to
/// duplicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupBlock;

impl BlockParser for MarkupBlock {
    type Info = InlineMatch;

    fn name(&self) -> &'static str {
        "markup"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<InlineMatch> {
        let markup = cx.parser().markup();
        let tag = markup.tag_at(cx.fragment(), 0)?;
        if !tag.is_start() || !is_blank(&cx.fragment()[..tag.start]) {
            return None;
        }
        let m = markup.recognises(cx)?;
        let (_, close_end) = markup.find_end(cx, &tag.name, m.end)?;
        is_blank(&cx.fragment()[close_end..]).then_some(m)
    }

    fn process(&self, cx: &mut ParsingContext<'_>, m: InlineMatch) {
        let current = cx.current();
        cx.parser().markup().parse(cx, current, &m);
        let end = cx.block_end();
        cx.set_offset(end);
    }
}

#[cfg(test)]
mod tests {
    use crate::parsing::blocks::content_outline;
    use crate::parsing::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn span_across_blank_lines_is_one_element() {
        assert_eq!(
            content_outline("[start note class=tip]\nfirst\n\nsecond\n[end note]"),
            "content\n  note class=\"tip\"\n    paragraph\n      \"first\"\n    paragraph\n      \"second\"\n"
        );
    }

    #[test]
    fn single_paragraph_interior_is_spliced() {
        assert_eq!(
            content_outline("[start aside]just *this*[end aside]"),
            "content\n  aside\n    \"just \"\n    em\n      \"this\"\n"
        );
    }

    #[test]
    fn custom_processor_handles_pre() {
        assert_eq!(
            content_outline("[start pre]\n  keep   spacing\n\n  here\n[end pre]"),
            "content\n  pre\n    \"keep   spacing\\n\\nhere\"\n"
        );
    }

    #[test]
    fn text_after_span_falls_back_to_paragraph() {
        let doc = parse("[start b]x[end b] and more");
        assert_eq!(
            doc.outline(),
            "document\n  content\n    paragraph\n      b\n        \"x\"\n      \" and more\"\n"
        );
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn span_with_trailing_text_keeps_one_reference() {
        let doc = parse("[start note]\n  [a]: Book\n[end note] trailing");
        let tree = &doc.tree;
        let references = doc.part("references").expect("references");
        assert_eq!(tree.children(references).len(), 1);
        assert_eq!(tree.text_content(references), "Book");
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn unterminated_start_is_reported_once() {
        let doc = parse("[start b]never closed");
        assert_eq!(doc.diagnostics.len(), 1);
        assert!(doc.has_errors());
    }
}
