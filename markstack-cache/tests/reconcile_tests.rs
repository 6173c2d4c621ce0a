//! List-merge behaviour for folder → bookmarks and folder → children.

use markstack_cache::reconcile::{merge_child, remove_child};
use markstack_cache::{EntityCache, EntityRef, MergeOutcome, Modification, StoreValue};
use markstack_model::fragments;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};

fn new_bookmark(id: i64, folder: i64) -> Value {
    json!({
        "__typename": "Bookmark",
        "id": id,
        "title": null,
        "url": format!("https://example.com/{id}"),
        "description": null,
        "createdDate": "2024-03-01T10:00:00Z",
        "folderId": folder
    })
}

fn cache_with_folder(folder: i64, bookmark_ids: &[i64]) -> (EntityCache, EntityRef) {
    let cache = EntityCache::new();
    let bookmarks: Vec<Value> = bookmark_ids
        .iter()
        .map(|b| json!({"__typename": "Bookmark", "id": b, "title": null, "url": "https://a.dev", "description": null}))
        .collect();
    let folder = cache
        .write_fragment(
            &json!({
                "__typename": "Folder",
                "id": folder,
                "parentId": null,
                "depth": 0,
                "name": "Inbox",
                "bookmarks": bookmarks
            }),
            &fragments::folder_with_bookmarks(),
        )
        .unwrap();
    (cache, folder)
}

fn list_ids(cache: &EntityCache, folder: &EntityRef) -> Vec<i64> {
    match cache.read_field(folder, "bookmarks") {
        Some(StoreValue::List(items)) => items
            .iter()
            .map(|item| item.as_entity_ref().unwrap().id().get())
            .collect(),
        Some(other) => panic!("bookmarks is not a list: {other:?}"),
        None => Vec::new(),
    }
}

// ── Scenario: folder 5 holds bookmarks 1 and 2 ───────────────────

#[test]
fn creating_new_bookmark_appends_it() {
    let (cache, folder) = cache_with_folder(5, &[1, 2]);
    let outcome = merge_child(&cache, &folder, "bookmarks", &new_bookmark(3, 5), &fragments::bookmark()).unwrap();
    assert_eq!(outcome, MergeOutcome::Appended(cache.identify("Bookmark", 3)));
    assert_eq!(list_ids(&cache, &folder), vec![1, 2, 3]);
}

#[test]
fn creating_existing_bookmark_leaves_list_unchanged() {
    let (cache, folder) = cache_with_folder(5, &[1, 2]);
    let outcome = merge_child(&cache, &folder, "bookmarks", &new_bookmark(2, 5), &fragments::bookmark()).unwrap();
    assert_eq!(outcome, MergeOutcome::AlreadyPresent(cache.identify("Bookmark", 2)));
    assert_eq!(list_ids(&cache, &folder), vec![1, 2]);
    // The record itself still picked up the fuller payload.
    assert_eq!(
        cache.read_field(&cache.identify("Bookmark", 2), "folderId"),
        Some(StoreValue::Scalar(json!(5)))
    );
}

#[test]
fn absent_list_field_defaults_to_empty() {
    let cache = EntityCache::new();
    let folder = cache
        .write_fragment(
            &json!({"__typename": "Folder", "id": 5, "parentId": null, "depth": 0, "name": "x"}),
            &fragments::folder(),
        )
        .unwrap();
    merge_child(&cache, &folder, "bookmarks", &new_bookmark(1, 5), &fragments::bookmark()).unwrap();
    assert_eq!(list_ids(&cache, &folder), vec![1]);
}

#[test]
fn uncached_parent_still_writes_child() {
    let cache = EntityCache::new();
    let folder = cache.identify("Folder", 5);
    let outcome = merge_child(&cache, &folder, "bookmarks", &new_bookmark(1, 5), &fragments::bookmark()).unwrap();
    assert_eq!(outcome, MergeOutcome::ParentMissing(cache.identify("Bookmark", 1)));
    assert!(cache.contains(outcome.child()));
    assert!(!cache.contains(&folder));
}

#[test]
fn embedded_items_are_matched_by_id() {
    let cache = EntityCache::new();
    let folder = cache
        .write_fragment(
            &json!({"__typename": "Folder", "id": 5, "parentId": null, "depth": 0, "name": "x"}),
            &fragments::folder(),
        )
        .unwrap();
    cache.modify_field(&folder, "bookmarks", |_, _| {
        let mut item = std::collections::BTreeMap::new();
        item.insert("id".to_string(), StoreValue::Scalar(json!(4)));
        markstack_cache::Modification::Replace(StoreValue::List(vec![StoreValue::Object(item)]))
    });
    let outcome = merge_child(&cache, &folder, "bookmarks", &new_bookmark(4, 5), &fragments::bookmark()).unwrap();
    assert!(matches!(outcome, MergeOutcome::AlreadyPresent(_)));
}

#[test]
fn child_folders_merge_into_children_list() {
    let cache = EntityCache::new();
    let parent = cache
        .write_fragment(
            &json!({"__typename": "Folder", "id": 1, "parentId": null, "depth": 0, "name": "root", "children": []}),
            &fragments::folder_with_children(),
        )
        .unwrap();
    let child = json!({"__typename": "Folder", "id": 2, "parentId": 1, "depth": 1, "name": "sub"});
    merge_child(&cache, &parent, "children", &child, &fragments::folder()).unwrap();
    merge_child(&cache, &parent, "children", &child, &fragments::folder()).unwrap();
    assert_eq!(
        cache.read_field(&parent, "children"),
        Some(StoreValue::List(vec![StoreValue::Ref(cache.identify("Folder", 2))]))
    );
}

// ── remove_child ─────────────────────────────────────────────────

#[test]
fn remove_child_drops_matching_reference() {
    let (cache, folder) = cache_with_folder(5, &[1, 2, 3]);
    assert!(remove_child(&cache, &folder, "bookmarks", &cache.identify("Bookmark", 2)));
    assert_eq!(list_ids(&cache, &folder), vec![1, 3]);
    assert!(!remove_child(&cache, &folder, "bookmarks", &cache.identify("Bookmark", 2)));
}

#[test]
fn embedded_item_with_string_id_counts_as_present() {
    let (cache, folder) = cache_with_folder(5, &[]);
    let embedded = StoreValue::Object(BTreeMap::from([(
        "id".to_string(),
        StoreValue::Scalar(json!("4")),
    )]));
    cache.modify_field(&folder, "bookmarks", |_, _| {
        Modification::Replace(StoreValue::List(vec![embedded.clone()]))
    });

    let outcome = merge_child(&cache, &folder, "bookmarks", &new_bookmark(4, 5), &fragments::bookmark()).unwrap();
    assert!(matches!(outcome, MergeOutcome::AlreadyPresent(_)));
    assert_eq!(cache.read_field(&folder, "bookmarks"), Some(StoreValue::List(vec![embedded])));
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    /// Distinct ids inserted into an empty list appear once each, in
    /// insertion-completion order.
    #[test]
    fn distinct_inserts_preserve_order(ids in prop::collection::hash_set(1i64..10_000, 0..40)) {
        let ids: Vec<i64> = ids.into_iter().collect();
        let (cache, folder) = cache_with_folder(5, &[]);
        for id in &ids {
            merge_child(&cache, &folder, "bookmarks", &new_bookmark(*id, 5), &fragments::bookmark()).unwrap();
        }
        prop_assert_eq!(list_ids(&cache, &folder), ids);
    }

    /// Re-inserting any sequence, duplicates included, never yields a
    /// duplicate id, and the order is that of first appearance.
    #[test]
    fn merge_is_idempotent(ids in prop::collection::vec(1i64..20, 0..60)) {
        let (cache, folder) = cache_with_folder(5, &[]);
        for id in &ids {
            merge_child(&cache, &folder, "bookmarks", &new_bookmark(*id, 5), &fragments::bookmark()).unwrap();
        }
        let mut seen = HashSet::new();
        let expected: Vec<i64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        let listed = list_ids(&cache, &folder);
        prop_assert_eq!(&listed, &expected);

        for id in &ids {
            let outcome = merge_child(&cache, &folder, "bookmarks", &new_bookmark(*id, 5), &fragments::bookmark()).unwrap();
            prop_assert!(matches!(outcome, MergeOutcome::AlreadyPresent(_)));
        }
        prop_assert_eq!(list_ids(&cache, &folder), expected);
    }
}
