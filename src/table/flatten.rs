//! Path flattening.
//!
//! Compresses a `NestedRecord` into a map from key paths to leaf values:
//!
//! ```text
//! {"1": 1, "2": {"2.1": 2, "2.2": {"2.2.1": 5}}}
//! => {("1"): 1, ("2", "2.1"): 2, ("2", "2.2", "2.2.1"): 5}
//! ```

use crate::parser::schema::{NestedRecord, Node, Scalar};
use crate::utils::error::TableError;
use std::collections::BTreeMap;
use std::fmt;

/// Ordered sequence of keys from the record root to a leaf
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathKey(Vec<String>);

impl PathKey {
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PathKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" / "))
    }
}

/// Flattened record: one entry per leaf
pub type FlatMap = BTreeMap<PathKey, Scalar>;

/// Flatten `record`, prepending `prefix` to every path
///
/// Empty subtrees contribute nothing.
pub fn flatten(record: &NestedRecord, prefix: &[String]) -> FlatMap {
    let mut out = FlatMap::new();
    let mut path = prefix.to_vec();
    flatten_into(record, &mut path, &mut out);
    out
}

fn flatten_into(record: &NestedRecord, path: &mut Vec<String>, out: &mut FlatMap) {
    for (key, node) in record.iter() {
        path.push(key.clone());
        match node {
            Node::Record(child) => flatten_into(child, path, out),
            Node::Scalar(value) => {
                out.insert(PathKey(path.clone()), value.clone());
            }
        }
        path.pop();
    }
}

/// Rebuild a nested record from a flattened map
///
/// # Errors
/// * `TableError::Shape` - an empty path, or a path that is both a leaf and
///   a prefix of another path
pub fn unflatten(flat: &FlatMap) -> Result<NestedRecord, TableError> {
    let mut root = NestedRecord::new();

    for (path, value) in flat {
        let Some((leaf, parents)) = path.segments().split_last() else {
            return Err(TableError::Shape("empty path key".to_string()));
        };

        let mut node = &mut root;
        for parent in parents {
            node = node.child_mut(parent).ok_or_else(|| {
                TableError::Shape(format!("'{}' is both a leaf and a subtree", path))
            })?;
        }

        if node.contains_key(leaf) {
            return Err(TableError::Shape(format!(
                "'{}' is both a leaf and a subtree",
                path
            )));
        }
        node.insert(leaf.clone(), value.clone());
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(parts: &[&str]) -> PathKey {
        parts.iter().copied().collect()
    }

    fn sample() -> NestedRecord {
        let inner: NestedRecord = [("2.2.1", Scalar::from(5.0)), ("2.2.2", Scalar::from(10.0))]
            .into_iter()
            .collect();
        let mut two = NestedRecord::new();
        two.insert("2.1", Scalar::from(2.0));
        two.insert("2.2", inner);

        let mut root = NestedRecord::new();
        root.insert("1", Scalar::from(1.0));
        root.insert("2", two);
        root.insert("3", Scalar::from(7.0));
        root
    }

    #[test]
    fn test_flatten_paths() {
        let flat = flatten(&sample(), &[]);

        let expected: FlatMap = [
            (key(&["1"]), Scalar::from(1.0)),
            (key(&["2", "2.1"]), Scalar::from(2.0)),
            (key(&["2", "2.2", "2.2.1"]), Scalar::from(5.0)),
            (key(&["2", "2.2", "2.2.2"]), Scalar::from(10.0)),
            (key(&["3"]), Scalar::from(7.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(flat, expected);
    }

    #[test]
    fn test_flatten_with_prefix() {
        let flat = flatten(&sample(), &["run".to_string()]);
        assert!(flat.contains_key(&key(&["run", "2", "2.1"])));
        assert!(flat.keys().all(|k| k.segments()[0] == "run"));
    }

    #[test]
    fn test_flatten_empty_subtree() {
        let mut record = NestedRecord::new();
        record.insert("empty", NestedRecord::new());
        record.insert("x", Scalar::from(1.0));

        let flat = flatten(&record, &[]);
        assert_eq!(flat.len(), 1);
        assert!(!flat.keys().any(|k| k.segments()[0] == "empty"));
    }

    #[test]
    fn test_unflatten_roundtrip() {
        let record = sample();
        assert_eq!(unflatten(&flatten(&record, &[])).unwrap(), record);
    }

    #[test]
    fn test_unflatten_conflict() {
        let flat: FlatMap = [
            (key(&["a"]), Scalar::from(1.0)),
            (key(&["a", "b"]), Scalar::from(2.0)),
        ]
        .into_iter()
        .collect();
        assert!(unflatten(&flat).is_err());
    }
}
