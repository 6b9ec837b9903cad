//! Offset annotation pass.
//!
//! Recognizers record `_start`/`_end` only on the nodes whose source span
//! they know. This pass gives every element a best-effort span and a
//! preorder `_number`:
//!
//! 1. the root spans the whole text
//! 2. a parent missing a bound takes it from its first/last spanned child
//! 3. bounds flow back down: a child missing its start takes the previous
//!    sibling's end (or the parent's start), and symmetrically for ends
//!
//! The returned table is indexed by `_number`, so rendered output tagged with
//! node numbers can be mapped back to source positions.

use super::{NodeId, Tree};

/// Best-effort `(start, end)` span of one element.
pub type Span = (Option<usize>, Option<usize>);

/// Annotates every element below the root and returns the span table.
pub fn annotate(tree: &mut Tree, text_len: usize) -> Vec<Span> {
    let root = tree.root();
    ensure(tree, root, Some(0), Some(text_len));
    let mut table = Vec::new();
    number(tree, root, 0, &mut table);
    table
}

fn get(tree: &Tree, id: NodeId) -> Span {
    let read = |key| tree.attr(id, key).and_then(|v| v.parse::<usize>().ok());
    (read("_start"), read("_end"))
}

/// Sets each bound only where the element does not have one yet.
fn ensure(tree: &mut Tree, id: NodeId, start: Option<usize>, end: Option<usize>) {
    let (s, e) = get(tree, id);
    if let (None, Some(start)) = (s, start) {
        tree.set_attr(id, "_start", start.to_string());
    }
    if let (None, Some(end)) = (e, end) {
        tree.set_attr(id, "_end", end.to_string());
    }
}

fn number(tree: &mut Tree, id: NodeId, mut counter: usize, table: &mut Vec<Span>) -> usize {
    let own = counter;
    tree.set_attr(id, "_number", own.to_string());
    table.push((None, None));

    let children = tree.element_children(id);
    let (start, end) = get(tree, id);
    if let (Some(first), Some(last)) = (children.first(), children.last()) {
        ensure(tree, *first, start, None);
        ensure(tree, *last, None, end);
    }

    let mut spans = Vec::with_capacity(children.len());
    for child in &children {
        counter = number(tree, *child, counter + 1, table);
        spans.push(get(tree, *child));
    }
    let child_start = spans.iter().find_map(|(s, _)| *s);
    let child_end = spans.iter().rev().find_map(|(_, e)| *e);
    ensure(tree, id, child_start, child_end);

    let (start, end) = get(tree, id);
    propagate(tree, id, start, end);
    table[own] = get(tree, id);
    counter
}

fn propagate(tree: &mut Tree, id: NodeId, start: Option<usize>, end: Option<usize>) {
    ensure(tree, id, start, end);
    let children = tree.element_children(id);
    if let (Some(first), Some(last)) = (children.first(), children.last()) {
        ensure(tree, *first, start, None);
        ensure(tree, *last, None, end);
    }

    let mut start = start;
    for child in &children {
        propagate(tree, *child, start, None);
        if let (_, Some(child_end)) = get(tree, *child) {
            start = Some(child_end);
        }
    }

    let mut end = end;
    for child in children.iter().rev() {
        propagate(tree, *child, None, end);
        if let (Some(child_start), _) = get(tree, *child) {
            end = Some(child_start);
        }
    }
}
