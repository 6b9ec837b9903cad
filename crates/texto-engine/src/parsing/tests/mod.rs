//! Whole-document tests for the parsing module.
//!
//! Uses inline snapshots of the tree outline. Every parsed document is also
//! run through the structural invariant checks.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::parsing::{Document, Issue, Parser, ParserConfig};

fn parse_checked(text: &str) -> Document {
    let doc = crate::parsing::parse(text);
    invariants::check(text, &doc);
    doc
}

fn outline(text: &str) -> String {
    parse_checked(text).outline()
}

// Snapshot tests

#[test]
fn snapshot_full_document() {
    let text = "\
== Texto
-- author: Ann

1. Intro

Some *text*.

- one
- two

1.1. Detail

Deeper.

2. End

  [a]: Some book.
";
    insta::assert_snapshot!(outline(text), @r#"
document
  header
    title
      "Texto"
    meta
      meta name="author"
        "Ann"
  content
    section depth="1" id="intro"
      title
        "Intro"
      content
        paragraph
          "Some "
          em
            "text"
          "."
        list
          list-item
            "one"
          list-item
            "two"
        section depth="2" id="detail"
          title
            "Detail"
          content
            paragraph
              "Deeper."
    section depth="1" id="end"
      title
        "End"
      content
  references
    entry id="a"
      "Some book."
"#);
}

#[test]
fn snapshot_two_item_list() {
    insta::assert_snapshot!(outline("- item one\n- item two\n"), @r#"
document
  content
    list
      list-item
        "item one"
      list-item
        "item two"
"#);
}

#[test]
fn snapshot_underlined_title() {
    insta::assert_snapshot!(outline("Title\n==\n\nSome text.\n"), @r#"
document
  header
    title
      "Title"
  content
    paragraph
      "Some text."
"#);
}

#[test]
fn snapshot_nested_same_named_markup() {
    insta::assert_snapshot!(outline("x [start a]one [start a]two[end a] three[end a] y"), @r#"
document
  content
    paragraph
      "x "
      a
        "one "
        a
          "two"
        " three"
      " y"
"#);
}

#[test]
fn snapshot_tagged_block_around_list() {
    insta::assert_snapshot!(outline("TIP: Shopping ___\n- milk\n- eggs\n\n___\n\nDone."), @r#"
document
  content
    block type="tip" title="Shopping"
      content
        list
          list-item
            "milk"
          list-item
            "eggs"
    paragraph
      "Done."
"#);
}

#[test]
fn snapshot_markup_span_with_trailing_text() {
    insta::assert_snapshot!(outline("[start note]\nfirst\n\nsecond\n[end note] after"), @r#"
document
  content
    paragraph
      note
        paragraph
          "first"
        paragraph
          "second"
      " after"
"#);
}

#[test]
fn markup_span_with_trailing_text_grafts_references_once() {
    let doc = parse_checked("[start note]\n  [a]: Book\n[end note] trailing");
    let tree = &doc.tree;
    let references = doc.part("references").expect("references");
    let ids: Vec<_> = tree
        .children(references)
        .iter()
        .map(|e| tree.attr(*e, "id").unwrap_or_default())
        .collect();
    assert_eq!(ids, ["a"]);
    let notes = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|n| tree.is_named(*n, "note"))
        .count();
    assert_eq!(notes, 1);
    assert!(doc.diagnostics.is_empty());
}

// Properties

#[rstest]
#[case("plain words")]
#[case("a b\nc")]
#[case("")]
#[case("x y z ")]
fn normalising_is_idempotent(#[case] text: &str) {
    let parser = Parser::default();
    let once = parser.normalise(text);
    assert_eq!(parser.normalise(&once), once);
}

#[rstest]
#[case("**not** `parsed`")]
#[case("[start a] x [end a]")]
#[case("a -- b ... -> &amp;")]
#[case("[label](#target) <<q>>")]
fn escaped_text_is_one_verbatim_node(#[case] text: &str) {
    let doc = parse_checked(&format!("{{|{text}|}}"));
    let tree = &doc.tree;
    let paragraph = tree
        .descendants(tree.root())
        .into_iter()
        .find(|n| tree.is_named(*n, "paragraph"))
        .expect("paragraph");
    let children = tree.children(paragraph);
    assert_eq!(children.len(), 1);
    assert_eq!(tree.text_of(children[0]), Some(text));
}

#[test]
fn numbered_headings_nest_by_depth() {
    let doc = parse_checked("1. A\n\n1.1. B\n\n1.2. C\n\n2. D");
    let tree = &doc.tree;
    let content = doc.part("content").expect("content");
    let top: Vec<_> = tree
        .children(content)
        .iter()
        .map(|s| tree.attr(*s, "id").unwrap_or_default())
        .collect();
    assert_eq!(top, ["a", "d"]);

    let first = tree.children(content)[0];
    let inner = tree.last_child_named(first, "content").expect("content");
    let nested: Vec<_> = tree
        .children(inner)
        .iter()
        .map(|s| {
            (
                tree.attr(*s, "id").unwrap_or_default(),
                tree.attr(*s, "depth").unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(nested, [("b", "2"), ("c", "2")]);
}

#[test]
fn table_separators_decide_cell_types() {
    let doc = parse_checked("=====\nName || Age\n=====\nAnn || 3\n-----\nBo || 4\n-----");
    let tree = &doc.tree;
    let types: Vec<_> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|n| tree.is_named(*n, "cell"))
        .map(|n| tree.attr(n, "type").unwrap_or_default())
        .collect();
    assert_eq!(types, ["header", "header", "data", "data", "data", "data"]);
}

#[test]
fn deeper_list_indent_always_nests() {
    // Checked by the invariants: nested lists are strictly deeper
    let doc = parse_checked("- a\n   - b\n - c\n     - d\n- e");
    assert!(doc.diagnostics.is_empty());
}

#[test]
fn free_parse_reuses_the_default_parser() {
    let first = crate::parsing::default_parser();
    assert!(std::ptr::eq(first, crate::parsing::default_parser()));
    assert_eq!(outline("- a\n- b"), first.parse("- a\n- b").outline());
}

#[rstest]
#[case("")]
#[case("\n\n")]
#[case("   \n\t\n")]
fn empty_input_has_no_parts(#[case] text: &str) {
    let doc = parse_checked(text);
    assert!(doc.tree.children(doc.tree.root()).is_empty());
    assert!(doc.diagnostics.is_empty());
}

// Diagnostics

#[test]
fn diagnostics_carry_line_and_column() {
    let doc = parse_checked("Intro.\n\nsee [start note] here\n\n- ");
    let found: Vec<_> = doc
        .diagnostics
        .iter()
        .map(|d| (d.issue.clone(), d.line, d.column))
        .collect();
    assert_eq!(
        found,
        [
            (Issue::MarkupStartWithoutEnd("note".into()), 3, 5),
            (Issue::EmptyListItem, 5, 1),
        ]
    );
    assert!(doc.has_errors());
}

// Offsets

#[test]
fn tracked_offsets_cover_every_element() {
    let text = "1. Intro\n\nSome text.\n\n- one\n- two\n";
    let parser = Parser::new(ParserConfig {
        track_offsets: true,
        ..ParserConfig::default()
    });
    let doc = parser.parse(text);
    invariants::check(text, &doc);

    let tree = &doc.tree;
    let elements = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|n| tree.is_element(*n))
        .count();
    let offsets = doc.offsets.as_ref().expect("offsets");
    assert_eq!(offsets.len(), elements);
    assert_eq!(offsets[0], (Some(0), Some(text.len())));

    let section = tree
        .descendants(tree.root())
        .into_iter()
        .find(|n| tree.is_named(*n, "section"))
        .expect("section");
    let number: usize = tree
        .attr(section, "_number")
        .and_then(|n| n.parse().ok())
        .expect("numbered");
    assert_eq!(offsets[number].0, Some(0));
}

#[test]
fn untracked_parse_has_no_offsets() {
    let doc = parse_checked("Some text.");
    assert_eq!(doc.offsets, None);
    assert!(!doc.outline().contains("_start"));
}
