//! Text helpers shared by block and inline parsers.
//!
//! Column arithmetic always expands tabs first, so indentation compares the
//! same way whether a line was indented with spaces or tabs.

use regex::Regex;

/// Collapses every run of whitespace (newlines included) into one space.
pub fn normalise(text: &str, whitespace: &Regex) -> String {
    whitespace.replace_all(text, " ").into_owned()
}

/// Expands tabs to the next multiple of `tab_width` on each line, then drops
/// the first `cut` columns of every line.
pub fn expand_tabs(text: &str, tab_width: usize, cut: usize) -> String {
    let tab_width = tab_width.max(1);
    text.split('\n')
        .map(|line| {
            let mut expanded = String::with_capacity(line.len());
            let mut column = 0;
            for ch in line.chars() {
                if ch == '\t' {
                    let pad = tab_width - column % tab_width;
                    expanded.extend(std::iter::repeat_n(' ', pad));
                    column += pad;
                } else {
                    expanded.push(ch);
                    column += 1;
                }
            }
            if cut == 0 {
                expanded
            } else {
                expanded.chars().skip(cut).collect()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of leading space columns, tabs counted up to the next tab stop.
pub fn count_leading_spaces(line: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut column = 0;
    for ch in line.chars() {
        match ch {
            ' ' => column += 1,
            '\t' => column += tab_width - column % tab_width,
            _ => break,
        }
    }
    column
}

/// Indentation of a block of text.
///
/// Only the first few non-empty lines matter. With two lines the second wins,
/// since the first usually carries a marker (list bullet, heading prefix).
/// With more, the widest of the first three is used.
pub fn indentation(text: &str, tab_width: usize) -> usize {
    let indents: Vec<usize> = text
        .splitn(5, '\n')
        .filter(|l| !l.is_empty())
        .map(|l| count_leading_spaces(l, tab_width))
        .collect();
    match indents.as_slice() {
        [] => 0,
        [only] => *only,
        [_, second] => *second,
        more => more.iter().take(3).copied().max().unwrap_or(0),
    }
}

/// True when `text` has no non-whitespace character.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Derives an identifier from a heading: lowercase, with every run of
/// characters outside `[a-z0-9_-]` replaced by a single `-`.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn whitespace() -> Regex {
        Regex::new(r"\s+").unwrap()
    }

    #[test]
    fn normalise_collapses_runs() {
        assert_eq!(normalise("a \t b\n\n c", &whitespace()), "a b c");
    }

    #[rstest]
    #[case("plain words here")]
    #[case(" leading and trailing ")]
    #[case("")]
    fn normalise_is_idempotent(#[case] input: &str) {
        let once = normalise(input, &whitespace());
        assert_eq!(normalise(&once, &whitespace()), once);
    }

    #[rstest]
    #[case("\tx", 4, 0, "    x")]
    #[case("ab\tx", 4, 0, "ab  x")]
    #[case("\t\tx", 4, 0, "        x")]
    #[case("\tx\n  \ty", 4, 0, "    x\n    y")]
    #[case("    code\n      more", 4, 4, "code\n  more")]
    #[case("\tx", 8, 0, "        x")]
    fn expand_tabs_cases(
        #[case] input: &str,
        #[case] tab: usize,
        #[case] cut: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(expand_tabs(input, tab, cut), expected);
    }

    #[rstest]
    #[case("x", 0)]
    #[case("   x", 3)]
    #[case("\tx", 4)]
    #[case("  \tx", 4)]
    #[case(" \t x", 5)]
    fn leading_spaces(#[case] line: &str, #[case] expected: usize) {
        assert_eq!(count_leading_spaces(line, 4), expected);
    }

    #[rstest]
    #[case("", 0)]
    #[case("  one line", 2)]
    #[case("- marker\n    body", 4)]
    #[case("a\n  b\n    c\n      d", 4)]
    fn indentation_cases(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(indentation(text, 4), expected);
    }

    #[rstest]
    #[case("Introduction", "introduction")]
    #[case("  The Big  Picture! ", "the-big-picture")]
    #[case("1.2 Setup", "1-2-setup")]
    fn slug_cases(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(slug(text), expected);
    }
}
