//! # Document Tree
//!
//! Arena-backed node storage for parsed documents.
//!
//! Every node lives in a single `Vec` owned by [`Tree`] and is addressed by a
//! [`NodeId`]. Nodes store the index of their parent, so walking up from the
//! current insertion point (`ensure_parent`, indent-based repositioning) is a
//! plain index chase with no back-pointer lifetimes involved.
//!
//! ## Node Kinds
//!
//! - **Element**: a name, an insertion-ordered [`Attributes`] map and children
//! - **Text**: literal text produced from prose or an inline parser
//! - **Comment**: text from `//` lines, kept in the tree but not rendered
//!
//! ## Bookkeeping Attributes
//!
//! Attribute keys starting with `_` (`_indent`, `_start`, `_end`, `_number`)
//! carry positional bookkeeping for the parser and the offset pass. Renderers
//! are expected to ignore them; [`Tree::outline`] omits them.
//!
//! ## Key Invariants
//!
//! - A node has at most one parent and appears once in that parent's children
//! - Only elements have children
//! - Detached nodes stay in the arena but are unreachable from the root

pub mod offsets;
mod outline;
mod serialize;

pub use serialize::NodeRef;

/// Index of a node inside its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Insertion-ordered string map of element attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Keys with this prefix are parser bookkeeping, not document data.
    pub const BOOKKEEPING_PREFIX: char = '_';

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key`, keeping its original position when it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Attributes that belong to the document, bookkeeping excluded.
    pub fn public(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(|(k, _)| !k.starts_with(Self::BOOKKEEPING_PREFIX))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::default();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { name: String, attrs: Attributes },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Slot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of document nodes with a single root element.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Tree {
    pub fn new(root_name: &str) -> Self {
        let mut tree = Tree {
            slots: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.element(root_name);
        tree
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Creates a detached element.
    pub fn element(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Element {
            name: name.to_string(),
            attrs: Attributes::default(),
        })
    }

    /// Creates a detached text node.
    pub fn text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Creates a detached comment node.
    pub fn comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    fn slot(&self, id: NodeId) -> &Slot {
        &self.slots[id.0]
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        &mut self.slots[id.0]
    }

    /// Appends a detached `child` as the last child of `parent`.
    ///
    /// # Panics
    /// Panics if `child` is already attached or `parent` is not an element.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            self.is_element(parent),
            "cannot append to non-element node {parent:?}"
        );
        assert!(
            self.slot(child).parent.is_none() && child != self.root,
            "node {child:?} is already attached"
        );
        self.slot_mut(child).parent = Some(parent);
        self.slot_mut(parent).children.push(child);
    }

    /// Removes `child` from its parent, leaving it detached in the arena.
    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.slot_mut(child).parent.take() {
            self.slot_mut(parent).children.retain(|c| *c != child);
        }
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.slot(id).kind
    }

    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.slot(id).kind, NodeKind::Element { .. })
    }

    /// Element name, `None` for text and comment nodes.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.slot(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_named(&self, id: NodeId, name: &str) -> bool {
        self.name(id) == Some(name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slot(id).children
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).children.last().copied()
    }

    /// Element children only, in document order.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    pub fn last_child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .rev()
            .copied()
            .find(|c| self.is_named(*c, name))
    }

    pub fn attrs(&self, id: NodeId) -> Option<&Attributes> {
        match &self.slot(id).kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attrs(id)?.get(key)
    }

    /// Sets an attribute on an element. Text and comment nodes are ignored.
    pub fn set_attr(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        if let NodeKind::Element { attrs, .. } = &mut self.slot_mut(id).kind {
            attrs.set(key, value);
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, key: &str) -> Option<String> {
        match &mut self.slot_mut(id).kind {
            NodeKind::Element { attrs, .. } => attrs.remove(key),
            _ => None,
        }
    }

    /// The `_indent` bookkeeping value, when present and numeric.
    pub fn indent(&self, id: NodeId) -> Option<i64> {
        self.attr(id, "_indent")?.parse().ok()
    }

    /// Literal content of a text or comment node.
    pub fn text_of(&self, id: NodeId) -> Option<&str> {
        match &self.slot(id).kind {
            NodeKind::Text(t) | NodeKind::Comment(t) => Some(t),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.slot_mut(id).kind {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Concatenation of every text node below `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match &self.slot(n).kind {
                NodeKind::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Iterates from `id` up to the root, `id` included.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |n| self.parent(*n))
    }

    /// Nearest node named `name` among `id` and its ancestors.
    pub fn find_ancestor(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.ancestors(id).find(|n| self.is_named(*n, name))
    }

    /// Preorder list of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Deep-copies `source` from another arena under `parent`.
    ///
    /// `_start`/`_end` attributes are shifted by `shift`, which maps offsets
    /// of a nested parse back onto the enclosing text.
    pub fn graft(&mut self, parent: NodeId, other: &Tree, source: NodeId, shift: usize) -> NodeId {
        let mut kind = other.kind(source).clone();
        if let NodeKind::Element { attrs, .. } = &mut kind {
            for key in ["_start", "_end"] {
                if let Some(v) = attrs.get(key).and_then(|v| v.parse::<usize>().ok()) {
                    attrs.set(key, (v + shift).to_string());
                }
            }
        }
        let copy = self.push(kind);
        self.append(parent, copy);
        for child in other.children(source) {
            self.graft(copy, other, *child, shift);
        }
        copy
    }

    /// Every node in the arena, detached ones included.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.slots.len()).map(NodeId)
    }

    /// Copy holding only the nodes reachable from the root, numbered in
    /// preorder.
    #[must_use]
    pub fn compact(&self) -> Tree {
        let mut tree = Tree {
            slots: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.push(self.kind(self.root).clone());
        for child in self.children(self.root) {
            tree.graft(tree.root, self, *child, 0);
        }
        tree
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }
}
