//! Path padding.
//!
//! Right-pads every path of a flattened map to the longest path length so
//! the keys can serve as a fixed-depth multi-level index:
//!
//! ```text
//! {("1"): 1, ("2", "2.1"): 2, ("2", "2.2", "2.2.1"): 5}
//! => {("1", -, -): 1, ("2", "2.1", -): 2, ("2", "2.2", "2.2.1"): 5}
//! ```
//!
//! The pad is its own `Segment` variant rather than a reserved string, so a
//! real key can never be mistaken for padding.

use super::flatten::{FlatMap, PathKey};
use crate::parser::schema::Scalar;
use crate::utils::config::PAD_LABEL;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;

/// One level of a padded path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Key(String),
    Pad,
}

impl Segment {
    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Pad => None,
        }
    }

    /// Text used when the segment is rendered
    pub fn label(&self) -> &str {
        match self {
            Segment::Key(key) => key,
            Segment::Pad => PAD_LABEL,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Path key extended with trailing pads
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaddedPathKey(Vec<Segment>);

impl PaddedPathKey {
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the path before padding
    pub fn original_len(&self) -> usize {
        self.0.iter().take_while(|s| matches!(s, Segment::Key(_))).count()
    }

    /// Drop the padding, recovering the original path
    pub fn to_path_key(&self) -> PathKey {
        self.0
            .iter()
            .filter_map(|s| s.as_key().map(str::to_string))
            .collect()
    }
}

impl fmt::Display for PaddedPathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(Segment::label).collect();
        f.write_str(&labels.join(" / "))
    }
}

/// Flattened map with uniform key length
pub type PaddedMap = BTreeMap<PaddedPathKey, Scalar>;

/// Longest path in the map (0 for an empty map)
pub fn max_depth(flat: &FlatMap) -> usize {
    flat.keys().map(PathKey::len).max().unwrap_or(0)
}

/// Pad every key of `flat` to the map's maximum depth
pub fn pad_paths(flat: &FlatMap) -> PaddedMap {
    let depth = max_depth(flat);
    debug!("Padding {} paths to depth {}", flat.len(), depth);

    flat.iter()
        .map(|(path, value)| (pad_key(path, depth), value.clone()))
        .collect()
}

fn pad_key(path: &PathKey, depth: usize) -> PaddedPathKey {
    let mut segments: Vec<Segment> = path.segments().iter().cloned().map(Segment::Key).collect();
    segments.resize(depth.max(path.len()), Segment::Pad);
    PaddedPathKey(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_sample() -> FlatMap {
        [
            (vec!["1"], 1.0),
            (vec!["2", "2.1"], 2.0),
            (vec!["2", "2.2", "2.2.1"], 5.0),
            (vec!["2", "2.2", "2.2.2"], 10.0),
            (vec!["3"], 7.0),
        ]
        .into_iter()
        .map(|(parts, v)| (parts.into_iter().collect::<PathKey>(), Scalar::from(v)))
        .collect()
    }

    #[test]
    fn test_all_keys_have_max_depth() {
        let flat = flat_sample();
        let padded = pad_paths(&flat);

        assert_eq!(padded.len(), flat.len());
        assert!(padded.keys().all(|k| k.len() == 3));
    }

    #[test]
    fn test_pad_segments() {
        let padded = pad_paths(&flat_sample());
        let key = padded
            .keys()
            .find(|k| k.segments()[0] == Segment::key("1"))
            .unwrap();

        assert_eq!(
            key.segments(),
            &[Segment::key("1"), Segment::Pad, Segment::Pad]
        );
        assert_eq!(key.to_string(), "1 / - / -");
    }

    #[test]
    fn test_truncation_recovers_original() {
        let flat = flat_sample();
        let padded = pad_paths(&flat);

        let recovered: Vec<PathKey> = padded.keys().map(PaddedPathKey::to_path_key).collect();
        let original: Vec<PathKey> = flat.keys().cloned().collect();
        assert_eq!(recovered, original);

        for key in padded.keys() {
            let n = key.original_len();
            let prefix: PathKey = key.segments()[..n]
                .iter()
                .map(|s| s.label().to_string())
                .collect();
            assert!(flat.contains_key(&prefix));
        }
    }

    #[test]
    fn test_dash_key_is_not_padding() {
        let flat: FlatMap = [
            (vec!["a", "-"], 1.0),
            (vec!["a"], 2.0),
            (vec!["b", "c", "d"], 3.0),
        ]
        .into_iter()
        .map(|(parts, v)| (parts.into_iter().collect::<PathKey>(), Scalar::from(v)))
        .collect();

        let padded = pad_paths(&flat);
        assert_eq!(padded.len(), 3);
        assert!(padded
            .keys()
            .any(|k| k.segments() == [Segment::key("a"), Segment::key("-"), Segment::Pad]));
        assert!(padded
            .keys()
            .any(|k| k.segments() == [Segment::key("a"), Segment::Pad, Segment::Pad]));
    }

    #[test]
    fn test_empty_map() {
        assert!(pad_paths(&FlatMap::new()).is_empty());
    }
}
