use serde_core::ser::{Serialize, SerializeMap, Serializer};

use crate::tree::{DataTree, Node};

impl Serialize for DataTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, node) in self {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Tree(tree) => tree.serialize(serializer),
            Node::ScalarArray(items) => serializer.collect_seq(items),
            Node::TreeArray(items) => serializer.collect_seq(items),
        }
    }
}
