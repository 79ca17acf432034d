use std::collections::BTreeMap;

use kv_config::{Error, Tree, path};

/// Helper to build a mapping tree from literal entries.
fn mapping(entries: &[(&str, Tree)]) -> Tree {
    Tree::Mapping(
        entries
            .iter()
            .map(|(key, child)| (key.to_string(), child.clone()))
            .collect(),
    )
}

fn people_tree() -> Tree {
    mapping(&[(
        "people",
        mapping(&[(
            "gigi",
            mapping(&[
                ("surname", Tree::scalar("burigi")),
                ("birth", Tree::scalar("4/7/1916")),
            ]),
        )]),
    )])
}

#[test]
fn test_flatten_emits_one_entry_per_leaf() {
    let entries = path::flatten(&people_tree(), "/config/config0");

    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|entry| (entry.key.as_str(), entry.value.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("/config/config0/people/gigi/birth", "4/7/1916"),
            ("/config/config0/people/gigi/surname", "burigi"),
        ]
    );
}

#[test]
fn test_flatten_is_deterministic() {
    let tree = people_tree();
    let first = path::flatten(&tree, "/config/x");
    let second = path::flatten(&tree, "/config/x");
    assert_eq!(first, second, "flatten order must be stable");
}

#[test]
fn test_flatten_drops_empty_mappings() {
    let tree = mapping(&[
        ("empty", Tree::mapping()),
        ("kept", Tree::scalar("value")),
    ]);

    let entries = path::flatten(&tree, "/config/app");
    assert_eq!(entries.len(), 1, "empty mappings produce no entries");
    assert_eq!(entries[0].key, "/config/app/kept");
}

#[test]
fn test_flatten_no_key_is_prefix_of_another() {
    let entries = path::flatten(&people_tree(), "/config/config0");

    for left in &entries {
        for right in &entries {
            if left.key == right.key {
                continue;
            }
            assert!(
                !right.key.starts_with(&format!("{}/", left.key)),
                "'{}' is both a leaf and an ancestor of '{}'",
                left.key,
                right.key
            );
        }
    }
}

#[test]
fn test_unflatten_round_trip() {
    let tree = people_tree();
    let entries = path::flatten(&tree, "/config/config0")
        .into_iter()
        .map(|entry| (entry.key, entry.value));

    let rebuilt = path::unflatten(entries, "/config/config0").expect("Failed to unflatten");
    assert_eq!(rebuilt, tree);
}

#[test]
fn test_unflatten_empty_input_yields_empty_configuration() {
    let tree = path::unflatten(Vec::new(), "/config/app").expect("Failed to unflatten");
    assert_eq!(tree, Tree::mapping());
    assert!(tree.is_empty());
}

#[test]
fn test_unflatten_ignores_entries_with_empty_stripped_path() {
    let entries = vec![
        ("/config/app".to_string(), "stray".to_string()),
        ("/config/app/".to_string(), "stray".to_string()),
        ("/config/app/kept".to_string(), "value".to_string()),
    ];

    let tree = path::unflatten(entries, "/config/app").expect("Failed to unflatten");
    let map = tree.as_mapping().expect("Expected a mapping");
    assert_eq!(map.len(), 1);
    assert_eq!(map["kept"].as_scalar(), Some("value"));
}

#[test]
fn test_unflatten_detects_leaf_shadowed_by_folder() {
    let entries = vec![
        ("/config/app/db".to_string(), "leaf".to_string()),
        ("/config/app/db/host".to_string(), "localhost".to_string()),
    ];

    let result = path::unflatten(entries, "/config/app");
    match result {
        Err(Error::Corruption(message)) => {
            assert!(
                message.contains("db"),
                "corruption message should name the key, got: {message}"
            );
        }
        other => panic!("Expected Corruption error, got {other:?}"),
    }
}

#[test]
fn test_unflatten_detects_folder_shadowed_by_leaf() {
    let entries = vec![
        ("/config/app/db/host".to_string(), "localhost".to_string()),
        ("/config/app/db".to_string(), "leaf".to_string()),
    ];

    let result = path::unflatten(entries, "/config/app");
    assert!(
        matches!(result, Err(Error::Corruption(_))),
        "Expected Corruption error, got {result:?}"
    );
}

#[test]
fn test_unflatten_duplicate_key_last_value_wins() {
    let entries = vec![
        ("/config/app/port".to_string(), "8080".to_string()),
        ("/config/app/port".to_string(), "9090".to_string()),
    ];

    let tree = path::unflatten(entries, "/config/app").expect("Failed to unflatten");
    assert_eq!(tree.as_mapping().unwrap()["port"].as_scalar(), Some("9090"));
}

#[test]
fn test_round_trip_property_for_nested_trees() {
    let mut leaves = BTreeMap::new();
    for index in 0..10 {
        leaves.insert(format!("key{index}"), Tree::scalar(format!("value{index}")));
    }
    let tree = mapping(&[
        ("flat", Tree::scalar("top")),
        ("nested", Tree::Mapping(leaves)),
        (
            "deep",
            mapping(&[("a", mapping(&[("b", mapping(&[("c", Tree::scalar("d"))]))]))]),
        ),
    ]);

    let entries = path::flatten(&tree, "/base/label")
        .into_iter()
        .map(|entry| (entry.key, entry.value));
    let rebuilt = path::unflatten(entries, "/base/label").expect("Failed to unflatten");

    assert_eq!(rebuilt, tree);
}
