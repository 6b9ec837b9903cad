//! Block segmentation.
//!
//! A block normally ends at the next blank line. A generic markup span is the
//! exception: when a start tag before that blank line has its matching end
//! tag after it, the blank line is inside the span and the search resumes
//! after the end tag. Unmatched start tags fall back to the literal blank
//! line; the inline markup parser reports them later.

use super::ParsingContext;

/// Finds the block starting at the current offset.
///
/// Returns `(block_end, next_block_start)`. `block_end == offset` means the
/// offset sits on a separator (an empty block). With no separator left both
/// values are the text length.
pub fn next_block(cx: &mut ParsingContext<'_>) -> (usize, usize) {
    let len = cx.len();
    let from = cx.offset();
    let Some((sep_start, sep_end)) = cx
        .parser()
        .separator()
        .find_at(cx.text(), from)
        .map(|m| (m.start(), m.end()))
    else {
        return (len, len);
    };

    let mut local = from;
    while local < sep_start {
        let Some(tag) = cx.parser().markup().tag_at(&cx.text()[..sep_start], local) else {
            break;
        };
        if !tag.is_start() {
            local = tag.end;
            continue;
        }
        match delimit(cx, tag.end, &tag.name) {
            Some(span_end) if span_end > sep_start => {
                log::trace!("markup `{}' spans the blank line at {sep_start}", tag.name);
                let saved = cx.save_offsets();
                cx.set_current_block(span_end, len);
                let found = next_block(cx);
                cx.restore_offsets(saved);
                return found;
            }
            Some(span_end) => local = span_end,
            None => local = tag.end,
        }
    }
    (sep_start, sep_end)
}

/// Absolute end of the end tag closing `name`, searching from `from`.
fn delimit(cx: &mut ParsingContext<'_>, from: usize, name: &str) -> Option<usize> {
    let saved = cx.save_offsets();
    cx.set_current_block(from, cx.len());
    let found = cx.parser().markup().find_end(cx, name, 0);
    cx.restore_offsets(saved);
    found.map(|(_, end)| from + end)
}
