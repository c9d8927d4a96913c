//! Parser for a single simulator statistics document.
//!
//! Stats files are JSON objects. Their keys are joined with a separator
//! while descending until a *stop* pattern matches; the value found there
//! is kept as-is. Subtrees matching a *drop* pattern are discarded. Any
//! scalar reached by neither rule is rejected.
//!
//! Example with stop `roi-stats.{n_cpu}.L1I` and drop `roi-stats.{n_cpu}.cycle`:
//! `{"roi-stats": {"cpu0": {"cycle": 9, "L1I": {"load": {...}}}}}`
//! becomes `{"roi-stats.cpu0.L1I": {"load": {...}}}`.

use super::schema::{NestedRecord, Node, Scalar};
use super::template::KeyPattern;
use crate::utils::config::LoaderConfig;
use crate::utils::error::{LoadError, TemplateError};
use log::debug;
use serde_json::{Map, Value};
use std::path::Path;

/// Compiled stop/drop rules
#[derive(Debug, Clone)]
pub struct KeyFilter {
    separator: String,
    stop: Vec<KeyPattern>,
    drop: Vec<KeyPattern>,
}

impl KeyFilter {
    pub fn new(separator: &str, stop: &[String], drop: &[String]) -> Result<Self, TemplateError> {
        let compile = |patterns: &[String]| {
            patterns
                .iter()
                .map(|p| KeyPattern::new(p, separator))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Self {
            separator: separator.to_string(),
            stop: compile(stop)?,
            drop: compile(drop)?,
        })
    }

    pub fn from_config(config: &LoaderConfig) -> Result<Self, TemplateError> {
        Self::new(&config.separator, &config.stop, &config.drop)
    }

    /// First drop pattern matching `key`
    fn drop_rule(&self, key: &str) -> Option<&KeyPattern> {
        self.drop.iter().find(|p| p.matches(key))
    }

    fn is_stop(&self, key: &str) -> bool {
        self.stop.iter().any(|p| p.matches(key))
    }

    /// Filter a parsed JSON object into a record keyed by joined stop keys
    pub fn apply(&self, object: &Map<String, Value>) -> Result<NestedRecord, LoadError> {
        let mut out = NestedRecord::new();
        self.walk(object, None, &mut out)?;
        Ok(out)
    }

    fn walk(
        &self,
        object: &Map<String, Value>,
        prefix: Option<&str>,
        out: &mut NestedRecord,
    ) -> Result<(), LoadError> {
        for (key, value) in object {
            let joined = match prefix {
                Some(prefix) => format!("{}{}{}", prefix, self.separator, key),
                None => key.clone(),
            };

            if let Some(rule) = self.drop_rule(&joined) {
                debug!("Dropping key {} (rule '{}')", joined, rule.as_str());
                continue;
            }

            if self.is_stop(&joined) {
                let node = json_to_node(value, &joined)?;
                if out.contains_key(&joined) {
                    return Err(LoadError::DuplicateKey(joined));
                }
                out.insert(joined, node);
                continue;
            }

            match value {
                Value::Object(child) => self.walk(child, Some(&joined), out)?,
                _ => return Err(LoadError::UnexpectedKey(joined)),
            }
        }

        Ok(())
    }
}

/// Parse the text of one stats file
///
/// # Errors
/// * `LoadError::Json` - text is not valid JSON
/// * `LoadError::NotAnObject` - top-level value is not an object
/// * any error from `KeyFilter::apply`
pub fn parse_stats(text: &str, path: &Path, filter: &KeyFilter) -> Result<NestedRecord, LoadError> {
    let value: Value = serde_json::from_str(text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(object) => filter.apply(&object),
        _ => Err(LoadError::NotAnObject(path.to_path_buf())),
    }
}

/// Convert a JSON value into a record node without filtering
pub fn json_to_node(value: &Value, key: &str) -> Result<Node, LoadError> {
    let node = match value {
        Value::Object(object) => {
            let mut record = NestedRecord::new();
            for (child_key, child) in object {
                record.insert(child_key.clone(), json_to_node(child, child_key)?);
            }
            Node::Record(record)
        }
        Value::Number(n) => Node::Scalar(Scalar::Number(n.as_f64().unwrap_or(f64::NAN))),
        Value::String(s) => Node::Scalar(Scalar::Text(s.clone())),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Array(_) => return Err(LoadError::UnsupportedValue(key.to_string())),
    };
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::LoaderConfig;
    use serde_json::json;

    fn default_filter() -> KeyFilter {
        KeyFilter::from_config(&LoaderConfig::default()).unwrap()
    }

    fn sample_stats() -> Value {
        json!({
            "warmup-instr": 10,
            "sim-instr": 100,
            "trace": "app.trace1",
            "roi-stats": {
                "cpu0": {
                    "instr": 100,
                    "cycle": 50,
                    "ipc-cumulative": 2.0,
                    "L1I": {
                        "load": {"access": 40, "miss": 4},
                        "prefetch": {"access": 10, "miss": 5}
                    },
                    "L1D": {"load": {"access": 1, "miss": 1}}
                }
            },
            "dram-stats": {"rq": 3}
        })
    }

    #[test]
    fn test_apply_keeps_stop_keys_only() {
        let record = default_filter()
            .apply(sample_stats().as_object().unwrap())
            .unwrap();

        let keys: Vec<&String> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["roi-stats.cpu0.L1I", "roi-stats.cpu0.ipc-cumulative"]
        );
        assert_eq!(
            record.get("roi-stats.cpu0.ipc-cumulative"),
            Some(&Node::Scalar(Scalar::Number(2.0)))
        );
        match record.get("roi-stats.cpu0.L1I") {
            Some(Node::Record(l1i)) => assert_eq!(l1i.leaf_count(), 4),
            other => panic!("unexpected L1I node: {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_scalar_is_error() {
        let doc = json!({"roi-stats": {"cpu0": {"branch-mpki": 3.1}}});
        let err = default_filter().apply(doc.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedKey(k) if k == "roi-stats.cpu0.branch-mpki"));
    }

    #[test]
    fn test_joined_collision_is_error() {
        let filter = KeyFilter::new(".", &["a.b".to_string()], &[]).unwrap();
        let doc = json!({"a.b": 1, "a": {"b": 2}});
        let err = filter.apply(doc.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateKey(_)));
    }

    #[test]
    fn test_array_value_is_unsupported() {
        let doc = json!({"roi-stats": {"cpu0": {"ipc-cumulative": [1, 2]}}});
        let err = default_filter().apply(doc.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedValue(_)));
    }

    #[test]
    fn test_parse_stats_rejects_non_object() {
        let err = parse_stats("[1, 2]", Path::new("x.stats"), &default_filter()).unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject(_)));

        let err = parse_stats("{", Path::new("x.stats"), &default_filter()).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }
}
