use crate::parsing::ParsingContext;
use crate::parsing::blocks::{BlockParser, lines_with_offsets};

/// A block made only of `//` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentBlock;

impl CommentBlock {
    pub const MARKER: &'static str = "//";
}

impl BlockParser for CommentBlock {
    type Info = String;

    fn name(&self) -> &'static str {
        "comment"
    }

    fn recognises(&self, cx: &mut ParsingContext<'_>) -> Option<String> {
        let lines = lines_with_offsets(cx.fragment());
        if lines.is_empty() {
            return None;
        }
        let mut body = Vec::with_capacity(lines.len());
        for (_, line) in lines {
            body.push(line.trim_start().strip_prefix(Self::MARKER)?.trim());
        }
        Some(body.join("\n"))
    }

    fn process(&self, cx: &mut ParsingContext<'_>, text: String) {
        let comment = cx.tree_mut().comment(text);
        cx.add_node(comment);
        let end = cx.block_end();
        cx.set_offset(end);
    }
}

#[cfg(test)]
mod tests {
    use crate::parsing::blocks::content_outline;
    use pretty_assertions::assert_eq;

    #[test]
    fn joins_comment_lines() {
        assert_eq!(
            content_outline("// first\n  //second\n\npara"),
            "content\n  // \"first\\nsecond\"\n  paragraph\n    \"para\"\n"
        );
    }

    #[test]
    fn mixed_block_is_not_a_comment() {
        assert_eq!(
            content_outline("// note\ntext"),
            "content\n  paragraph\n    // \"note\"\n    \"text\"\n"
        );
    }
}
