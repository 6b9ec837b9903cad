//! Recoverable input problems reported while parsing.
//!
//! Parsers push an [`Issue`] at an absolute offset; line and column are
//! resolved against the top-level text when the parse finishes. Each
//! diagnostic is also mirrored to the `log` facade.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    #[error("Empty list item.")]
    EmptyListItem,

    #[error("Markup `{0}' start found without following markup end")]
    MarkupStartWithoutEnd(String),

    #[error("Markup `{0}' end found without previous markup start")]
    MarkupEndWithoutStart(String),

    #[error("Unknown meta field: {0}")]
    UnknownMetaField(String),

    #[error("Empty meta block.")]
    EmptyMetaBlock,

    #[error("Malformed date meta field: {0} (should be YYYY-MM-DD)")]
    MalformedDate(String),

    #[error("Bad month number: {0}")]
    BadMonth(String),

    #[error("Bad day number: {0}")]
    BadDay(String),

    #[error("Malformed meta type field: {0}")]
    MalformedMetaType(String),

    #[error("Malformed attributes: {0}")]
    MalformedAttributes(String),

    #[error("Preformatted block has no closing fence")]
    UnterminatedPreformatted,
}

impl Issue {
    /// Unbalanced markup and unreadable dates are errors, the rest warnings.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Issue::MarkupStartWithoutEnd(_)
            | Issue::MarkupEndWithoutStart(_)
            | Issue::MalformedDate(_) => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// An [`Issue`] located in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub issue: Issue,
    /// Byte offset into the top-level input.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Diagnostic {
    pub fn locate(issue: Issue, offset: usize, text: &str) -> Self {
        let (line, column) = line_column(text, offset);
        Diagnostic {
            severity: issue.severity(),
            issue,
            offset,
            line,
            column,
        }
    }

    pub fn message(&self) -> String {
        self.issue.to_string()
    }

    /// `line:column: message`, the form mirrored to the log.
    pub fn log_line(&self) -> String {
        format!("{}:{}: {}", self.line, self.column, self.issue)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        write!(
            f,
            "{label} at line {:4}, character {:3}: {}",
            self.line, self.column, self.issue
        )
    }
}

/// Resolves a byte offset to a 1-based `(line, column)` pair.
pub fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("abc", 0, (1, 1))]
    #[case("abc", 2, (1, 3))]
    #[case("ab\ncd", 3, (2, 1))]
    #[case("ab\ncd\nef", 7, (3, 2))]
    #[case("é\nx", 3, (2, 1))]
    #[case("short", 99, (1, 6))]
    fn resolves_line_and_column(
        #[case] text: &str,
        #[case] offset: usize,
        #[case] expected: (usize, usize),
    ) {
        assert_eq!(line_column(text, offset), expected);
    }

    #[test]
    fn display_matches_warning_format() {
        let d = Diagnostic::locate(Issue::EmptyListItem, 4, "one\n- ");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(
            d.to_string(),
            "WARNING at line    2, character   1: Empty list item."
        );
    }

    #[test]
    fn log_line_is_line_column_message() {
        let d = Diagnostic::locate(Issue::MarkupEndWithoutStart("b".into()), 6, "one\nx [end b]");
        assert_eq!(
            d.log_line(),
            "2:3: Markup `b' end found without previous markup start"
        );
    }

    #[test]
    fn unbalanced_markup_is_an_error() {
        let issue = Issue::MarkupStartWithoutEnd("note".into());
        assert_eq!(issue.severity(), Severity::Error);
        assert_eq!(
            issue.to_string(),
            "Markup `note' start found without following markup end"
        );
    }
}
