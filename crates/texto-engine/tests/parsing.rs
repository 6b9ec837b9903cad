use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use texto_engine::parsing::ParsingContext;
use texto_engine::{CustomProcessor, Issue, NodeId, Parser, Severity, parse};

/// Replaces a markup interior with one `shout` element holding it in capitals.
struct Shout;

impl CustomProcessor for Shout {
    fn process(&self, cx: &mut ParsingContext<'_>, parent: NodeId) {
        let text = cx.fragment().trim().to_uppercase();
        let node = cx.append_element(parent, "shout");
        cx.append_text(node, text);
        let end = cx.block_end();
        cx.set_offset(end);
    }
}

#[test]
fn custom_processor_handles_markup_interior() {
    let parser = Parser::default().with_processor("shout", Shout);
    let doc = parser.parse("[start shout]\nhello\n[end shout]");
    insta::assert_snapshot!(doc.outline(), @r#"
document
  content
    shout
      "HELLO"
"#);
    assert!(doc.diagnostics.is_empty());
}

#[test]
fn pre_processor_is_registered_by_default() {
    let doc = parse("[start pre]\n  keep   this\n    spacing\n[end pre]");
    insta::assert_snapshot!(doc.outline(), @r#"
document
  content
    pre
      "keep   this\n  spacing"
"#);
}

#[test]
fn tree_serializes_as_nested_maps() {
    let doc = parse("Hi *there*");
    let value = serde_json::to_value(doc.tree.node(doc.tree.root())).unwrap();
    assert_eq!(
        value,
        json!({
            "name": "document",
            "attributes": {},
            "children": [{
                "name": "content",
                "attributes": {},
                "children": [{
                    "name": "paragraph",
                    "attributes": {"_indent": "0"},
                    "children": [
                        "Hi ",
                        {"name": "em", "attributes": {}, "children": ["there"]}
                    ]
                }]
            }]
        })
    );
}

#[test]
fn one_parser_serves_many_threads() {
    let parser = Parser::default();
    let texts = [
        "1. One\n\nBody.",
        "- a\n- b",
        "=====\nH || I\n=====\nx || y\n-----",
        "NOTE: n ___\ninside\n\n___",
    ];
    let expected: Vec<String> = texts.iter().map(|t| parser.parse(t).outline()).collect();

    let shared = &parser;
    let outlines: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = texts
            .iter()
            .map(|t| s.spawn(move || shared.parse(t).outline()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outlines, expected);
}

#[rstest]
#[case("- ", Issue::EmptyListItem, Severity::Warning)]
#[case("x [end note]", Issue::MarkupEndWithoutStart("note".into()), Severity::Error)]
#[case("--\n--", Issue::EmptyMetaBlock, Severity::Warning)]
#[case("```rust\nfn main() {}", Issue::UnterminatedPreformatted, Severity::Warning)]
fn reports_issue_with_severity(
    #[case] text: &str,
    #[case] issue: Issue,
    #[case] severity: Severity,
) {
    let doc = parse(text);
    assert_eq!(doc.diagnostics.len(), 1, "{:?}", doc.diagnostics);
    assert_eq!(doc.diagnostics[0].issue, issue);
    assert_eq!(doc.diagnostics[0].severity, severity);
}

#[test]
fn diagnostic_display() {
    let doc = parse("Intro.\n\n- ");
    assert_eq!(
        doc.diagnostics[0].to_string(),
        "WARNING at line    3, character   1: Empty list item."
    );
}

#[test]
fn separator_opens_typed_part() {
    let doc = parse("Body.\n\n-- appendix lang=fr\n\nAnnexe.");
    insta::assert_snapshot!(doc.outline(), @r#"
document
  content
    paragraph
      "Body."
  content type="appendix" lang="fr"
    paragraph
      "Annexe."
"#);
}
