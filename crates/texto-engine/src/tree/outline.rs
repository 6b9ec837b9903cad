use std::fmt::Write;

use super::{NodeId, NodeKind, Tree};

impl Tree {
    /// Indented text rendering of the whole tree.
    ///
    /// One node per line, two spaces per level. Elements show their public
    /// attributes, text nodes are quoted and comments are prefixed with `//`.
    pub fn outline(&self) -> String {
        self.outline_of(self.root())
    }

    pub fn outline_of(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, id, 0);
        out
    }

    fn write_outline(&self, out: &mut String, id: NodeId, level: usize) {
        let pad = "  ".repeat(level);
        // Writing into a String cannot fail
        let _ = match self.kind(id) {
            NodeKind::Element { name, attrs } => {
                let _ = write!(out, "{pad}{name}");
                for (k, v) in attrs.public() {
                    let _ = write!(out, " {k}={v:?}");
                }
                writeln!(out)
            }
            NodeKind::Text(t) => writeln!(out, "{pad}{t:?}"),
            NodeKind::Comment(t) => writeln!(out, "{pad}// {t:?}"),
        };
        for child in self.children(id) {
            self.write_outline(out, *child, level + 1);
        }
    }
}
