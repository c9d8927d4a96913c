use pretty_assertions::assert_eq;
use simstats_summary::parser::{NestedRecord, Scalar};
use simstats_summary::table::{flatten, max_depth, pad_paths, unflatten, Segment};

/// Uneven tree: depths 1, 2, 3 and 4 under one root
fn uneven_record() -> NestedRecord {
    let deepest: NestedRecord = [("d", Scalar::from(4.0))].into_iter().collect();
    let mut deep = NestedRecord::new();
    deep.insert("c", deepest);
    deep.insert("c2", Scalar::from("text"));

    let mut mid = NestedRecord::new();
    mid.insert("b", deep);
    mid.insert("b2", Scalar::from(2.0));

    let mut root = NestedRecord::new();
    root.insert("a", mid);
    root.insert("a2", Scalar::from(1.0));
    root.insert("empty", NestedRecord::new());
    root
}

#[test]
fn test_flatten_counts_leaves() {
    let record = uneven_record();
    let flat = flatten(&record, &[]);

    assert_eq!(flat.len(), record.leaf_count());
    assert_eq!(flat.len(), 4);
}

#[test]
fn test_flatten_with_prefix() {
    let flat = flatten(&uneven_record(), &["root".to_string()]);
    assert!(flat.keys().all(|k| k.segments()[0] == "root"));
}

#[test]
fn test_unflatten_inverts_flatten_without_empty_subtrees() {
    let mut record = uneven_record();
    let flat = flatten(&record, &[]);

    // the empty subtree has no leaves to rebuild from
    record = record
        .iter()
        .filter(|(k, _)| k.as_str() != "empty")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    assert_eq!(unflatten(&flat).unwrap(), record);
}

#[test]
fn test_padding_properties() {
    let flat = flatten(&uneven_record(), &[]);
    let depth = max_depth(&flat);
    let padded = pad_paths(&flat);

    assert_eq!(depth, 4);
    assert_eq!(padded.len(), flat.len());
    assert!(padded.keys().all(|k| k.len() == depth));

    for (key, value) in &padded {
        let original = key.to_path_key();
        assert_eq!(original.len(), key.original_len());
        assert_eq!(flat.get(&original), Some(value));
        assert!(key.segments()[key.original_len()..]
            .iter()
            .all(|s| *s == Segment::Pad));
    }
}
