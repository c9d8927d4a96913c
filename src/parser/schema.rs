//! In-memory model of a simulator statistics document.
//!
//! A `NestedRecord` is a tree of string-keyed nodes whose leaves are
//! `Scalar`s. Keys are kept in sorted order so every traversal is
//! deterministic.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A leaf value in a statistics document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => Ok(()),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// A node of a `NestedRecord`: either a leaf or a subtree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Record(NestedRecord),
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<NestedRecord> for Node {
    fn from(value: NestedRecord) -> Self {
        Node::Record(value)
    }
}

/// Tree-shaped statistics document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedRecord {
    entries: BTreeMap<String, Node>,
}

impl NestedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning the node previously stored under `key`
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Child record under `key`, created empty if absent
    ///
    /// Returns `None` if `key` already holds a scalar.
    pub fn child_mut(&mut self, key: &str) -> Option<&mut NestedRecord> {
        let node = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Node::Record(NestedRecord::new()));
        match node {
            Node::Record(record) => Some(record),
            Node::Scalar(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of scalar leaves in the whole tree
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                Node::Scalar(_) => 1,
                Node::Record(record) => record.leaf_count(),
            })
            .sum()
    }
}

impl<K: Into<String>, N: Into<Node>> FromIterator<(K, N)> for NestedRecord {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        let mut record = NestedRecord::new();
        for (key, node) in iter {
            record.insert(key, node);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_count_skips_empty_subtrees() {
        let record: NestedRecord = [
            ("a", Node::from(Scalar::from(1.0))),
            ("empty", Node::from(NestedRecord::new())),
            (
                "b",
                Node::from(NestedRecord::from_iter([("c", Scalar::from("x"))])),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.len(), 3);
        assert_eq!(record.leaf_count(), 2);
    }

    #[test]
    fn test_child_mut_refuses_scalar() {
        let mut record = NestedRecord::new();
        record.insert("leaf", Scalar::from(1.0));
        assert!(record.child_mut("leaf").is_none());
        assert!(record.child_mut("fresh").is_some());
        assert!(record.contains_key("fresh"));
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Number(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Text("x".into()).to_string(), "x");
        assert_eq!(Scalar::Null.to_string(), "");
    }
}
