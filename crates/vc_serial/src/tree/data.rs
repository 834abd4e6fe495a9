use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::Scalar;

// -----------------------------------------------------------------------------
// Node

/// An entry of a [`DataTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Tree(DataTree),
    ScalarArray(Vec<Scalar>),
    TreeArray(Vec<DataTree>),
}

impl Node {
    /// Returns a short name of the variant, used in error messages.
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Tree(_) => "tree",
            Self::ScalarArray(_) => "scalar array",
            Self::TreeArray(_) => "tree array",
        }
    }

    #[inline]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_tree(&self) -> Option<&DataTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}

impl From<Scalar> for Node {
    #[inline]
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<DataTree> for Node {
    #[inline]
    fn from(value: DataTree) -> Self {
        Self::Tree(value)
    }
}

// -----------------------------------------------------------------------------
// DataTree

/// A keyed container of [`Node`]s, ordered by key.
///
/// # Examples
///
/// ```
/// use vc_serial::Scalar;
/// use vc_serial::tree::{DataTree, Node};
///
/// let mut tree = DataTree::new();
/// tree.insert("y", Scalar::I32(-4));
/// tree.insert("x", Scalar::I32(3));
///
/// assert_eq!(tree.keys().collect::<Vec<_>>(), ["x", "y"]);
/// assert_eq!(tree.get("x"), Some(&Node::Scalar(Scalar::I32(3))));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTree {
    entries: BTreeMap<String, Node>,
}

impl DataTree {
    /// Creates an empty tree.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts an entry, returning the previous one under the same key.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns an iterator over the keys, in order.
    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over the entries, in key order.
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, String, Node> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, N: Into<Node>> FromIterator<(K, N)> for DataTree {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, node)| (key.into(), node.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DataTree {
    type Item = (&'a String, &'a Node);
    type IntoIter = btree_map::Iter<'a, String, Node>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
