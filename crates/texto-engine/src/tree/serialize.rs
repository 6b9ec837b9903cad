use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Attributes, NodeId, NodeKind, Tree};

/// Borrowed view of one node, serializable as nested maps.
///
/// Elements become `{"name", "attributes", "children"}`, text nodes become
/// plain strings and comments become `{"comment": text}`.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(super) fn new(tree: &'a Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }
}

struct Children<'a>(NodeRef<'a>);

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.tree.kind(self.id) {
            NodeKind::Text(t) => serializer.serialize_str(t),
            NodeKind::Comment(t) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("comment", t)?;
                map.end()
            }
            NodeKind::Element { name, attrs } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("attributes", attrs)?;
                map.serialize_entry("children", &Children(*self))?;
                map.end()
            }
        }
    }
}

impl Serialize for Children<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.0;
        let children = node.tree.children(node.id);
        let mut seq = serializer.serialize_seq(Some(children.len()))?;
        for child in children {
            seq.serialize_element(&NodeRef::new(node.tree, *child))?;
        }
        seq.end()
    }
}
