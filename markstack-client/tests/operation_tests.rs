use markstack_client::{operation, OperationKind};
use markstack_types::EntityId;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn create_bookmark_document() {
    let op = operation::create_bookmark(EntityId::new(5), "https://a.dev");
    assert_eq!(op.kind, OperationKind::Mutation);
    assert_eq!(op.root_field, "createBookmark");
    assert_eq!(op.variables, json!({"folderId": 5, "url": "https://a.dev"}));
    let expected_head = "\
mutation createBookmark($folderId: Int!, $url: String!) {
    createBookmark(data: { folderId: $folderId, url: $url }) {
        __typename
        ...Bookmark
        ...InputValidationError
        ...BaseError
    }
}
";
    assert!(op.document.starts_with(expected_head), "{}", op.document);
    assert!(op.document.contains("fragment Bookmark on Bookmark {"));
    assert!(op.document.contains("fragment InputValidationError on InputValidationError {"));
    assert!(op.document.contains("fragment BaseError on BaseError {"));
}

#[test]
fn every_spread_has_exactly_one_definition() {
    let ops = [
        operation::create_bookmark(EntityId::new(1), "https://a.dev"),
        operation::soft_delete_bookmark(EntityId::new(1)),
        operation::hard_delete_bookmark(EntityId::new(1)),
        operation::hard_delete_bookmarks(&[EntityId::new(1), EntityId::new(2)]),
        operation::move_bookmark(EntityId::new(1), EntityId::new(2)),
        operation::all_bookmarks(),
        operation::deleted_bookmarks(),
        operation::folder_bookmarks(EntityId::new(1)),
        operation::folder_children(EntityId::new(1)),
        operation::create_folder("Reading", None),
        operation::login("a@b.co", "pw"),
    ];
    for op in &ops {
        for line in op.document.lines() {
            if let Some(name) = line.trim().strip_prefix("...") {
                let definition = format!("fragment {name} on ");
                assert_eq!(op.document.matches(&definition).count(), 1, "{}: {name}", op.name);
            }
        }
    }
}

#[test]
fn query_results_are_keyed_by_arguments() {
    assert_eq!(operation::all_bookmarks().store_field_name(), r#"bookmarks({"deleted":false})"#);
    assert_eq!(operation::deleted_bookmarks().store_field_name(), r#"bookmarks({"deleted":true})"#);
    assert_eq!(operation::folder_bookmarks(EntityId::new(7)).store_field_name(), r#"folder({"id":7})"#);
    assert_eq!(operation::login("a@b.co", "pw").store_field_name(), "login");
}

#[test]
fn move_uses_update_root_field() {
    let op = operation::move_bookmark(EntityId::new(3), EntityId::new(9));
    assert_eq!(op.name, "moveBookmark");
    assert_eq!(op.root_field, "updateBookmark");
    assert_eq!(op.variables, json!({"id": 3, "folderId": 9}));
}

#[test]
fn request_body_uses_graphql_field_names() {
    let op = operation::hard_delete_bookmarks(&[EntityId::new(1), EntityId::new(2)]);
    let body = serde_json::to_value(op.body()).unwrap();
    assert_eq!(body["operationName"], "hardDeleteBookmarks");
    assert_eq!(body["variables"], json!({"ids": [1, 2]}));
    assert!(body["query"].as_str().unwrap().starts_with("mutation hardDeleteBookmarks($ids: [Int!]!)"));
}

#[test]
fn top_level_folder_sends_null_parent() {
    let op = operation::create_folder("Inbox", None);
    assert_eq!(op.variables, json!({"name": "Inbox", "parentId": null}));
}
