// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_texto_content(size: usize) -> String {
    let base = "1. Title\n\nParagraph with *some* content and a [link](#title).\n\n- Bullet point\n  - Nested item\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_structured_texto(sections: usize, depth: usize) -> String {
    let mut content = String::from("== Benchmark\n-- author: Bench\n\n");

    for section in 1..=sections {
        content.push_str(&format!("{section}. Section {section}\n\n"));
        content.push_str(&generate_nested_content(depth, 1, &section.to_string()));
    }

    content.push_str("  [title]: The reference entry.\n");
    content
}

#[allow(dead_code)]
fn generate_nested_content(remaining_depth: usize, level: usize, number: &str) -> String {
    if remaining_depth == 0 {
        return String::new();
    }

    let mut content = String::new();
    let heading = format!("{number}.1.");
    content.push_str(&format!("{heading} Subsection Level {level}\n\n"));
    content.push_str("Some paragraph content with multiple sentences. This helps create realistic document structure for benchmarking.\n\n");

    for i in 0..3 {
        let indent = "  ".repeat(level.min(3) - 1);
        content.push_str(&format!("{indent}- Item {i} with **strong** text\n"));
    }
    content.push('\n');

    content.push_str("=====\nName || Value\n=====\nA || 1\n-----\nB || 2\n-----\n\n");
    content.push_str("[start note]\nA note spanning\n\nseveral blocks.\n[end note]\n\n");

    content.push_str(&generate_nested_content(
        remaining_depth - 1,
        level + 1,
        &format!("{number}.1"),
    ));
    content
}
