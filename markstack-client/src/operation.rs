//! GraphQL operation documents.
//!
//! Each constructor returns an [`Operation`]: the document text (root field
//! plus every fragment it spreads), its variables, and the name of the root
//! field whose value is the result union.

use markstack_model::{fragments, FragmentShape};
use markstack_types::EntityId;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A ready-to-send GraphQL request.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: &'static str,
    pub kind: OperationKind,
    /// Response key holding the result union.
    pub root_field: &'static str,
    /// Arguments of the root field, used to key query results in the cache.
    pub arguments: Map<String, Value>,
    pub variables: Value,
    pub document: String,
}

/// JSON body of a GraphQL-over-HTTP request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody<'a> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: &'a Value,
}

impl Operation {
    pub fn body(&self) -> RequestBody<'_> {
        RequestBody {
            query: &self.document,
            operation_name: self.name,
            variables: &self.variables,
        }
    }

    /// Cache key for the root field, e.g. `bookmarks({"deleted":false})`.
    pub fn store_field_name(&self) -> String {
        if self.arguments.is_empty() {
            self.root_field.to_string()
        } else {
            format!("{}({})", self.root_field, Value::Object(self.arguments.clone()))
        }
    }
}

struct Builder {
    name: &'static str,
    kind: OperationKind,
    root_field: &'static str,
    variable_defs: &'static str,
    call_args: &'static str,
    arguments: Map<String, Value>,
    variables: Value,
    spreads: Vec<FragmentShape>,
}

impl Builder {
    fn new(kind: OperationKind, name: &'static str, root_field: &'static str) -> Self {
        Self {
            name,
            kind,
            root_field,
            variable_defs: "",
            call_args: "",
            arguments: Map::new(),
            variables: Value::Object(Map::new()),
            spreads: Vec::new(),
        }
    }

    fn args(mut self, defs: &'static str, call: &'static str, variables: Value) -> Self {
        self.variable_defs = defs;
        self.call_args = call;
        self.variables = variables;
        self
    }

    fn keyed_by(mut self, arguments: Value) -> Self {
        if let Value::Object(map) = arguments {
            self.arguments = map;
        }
        self
    }

    fn spread(mut self, shape: FragmentShape) -> Self {
        self.spreads.push(shape);
        self
    }

    fn build(self) -> Operation {
        let keyword = match self.kind {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        };
        let mut document = String::new();
        let _ = write!(document, "{keyword} {}", self.name);
        if !self.variable_defs.is_empty() {
            let _ = write!(document, "({})", self.variable_defs);
        }
        let _ = write!(document, " {{\n    {}", self.root_field);
        if !self.call_args.is_empty() {
            let _ = write!(document, "({})", self.call_args);
        }
        document.push_str(" {\n        __typename\n");
        for shape in &self.spreads {
            let _ = writeln!(document, "        ...{}", shape.name);
        }
        document.push_str("    }\n}\n");

        let mut seen = Vec::new();
        for shape in &self.spreads {
            collect_definitions(shape, &mut seen);
        }
        for shape in seen {
            document.push('\n');
            document.push_str(&shape.to_graphql());
        }

        Operation {
            name: self.name,
            kind: self.kind,
            root_field: self.root_field,
            arguments: self.arguments,
            variables: self.variables,
            document,
        }
    }
}

fn collect_definitions(shape: &FragmentShape, seen: &mut Vec<FragmentShape>) {
    if !seen.iter().any(|s| s.name == shape.name) {
        seen.push(shape.clone());
    }
}

fn mutation(name: &'static str, root_field: &'static str) -> Builder {
    Builder::new(OperationKind::Mutation, name, root_field)
}

fn query(name: &'static str, root_field: &'static str) -> Builder {
    Builder::new(OperationKind::Query, name, root_field)
}

pub fn create_bookmark(folder_id: EntityId, url: &str) -> Operation {
    mutation("createBookmark", "createBookmark")
        .args(
            "$folderId: Int!, $url: String!",
            "data: { folderId: $folderId, url: $url }",
            json!({ "folderId": folder_id, "url": url }),
        )
        .spread(fragments::bookmark())
        .spread(fragments::input_validation_error())
        .spread(fragments::base_error())
        .build()
}

pub fn soft_delete_bookmark(id: EntityId) -> Operation {
    mutation("softDeleteBookmark", "softDeleteBookmark")
        .args("$id: Int!", "id: $id", json!({ "id": id }))
        .spread(fragments::bookmark())
        .spread(fragments::base_error())
        .build()
}

pub fn hard_delete_bookmark(id: EntityId) -> Operation {
    mutation("hardDeleteBookmark", "hardDeleteBookmark")
        .args("$id: Int!", "id: $id", json!({ "id": id }))
        .spread(fragments::bookmark())
        .spread(fragments::base_error())
        .build()
}

pub fn hard_delete_bookmarks(ids: &[EntityId]) -> Operation {
    mutation("hardDeleteBookmarks", "hardDeleteBookmarks")
        .args("$ids: [Int!]!", "ids: $ids", json!({ "ids": ids }))
        .spread(fragments::bookmarks())
        .spread(fragments::base_error())
        .build()
}

/// Moves a bookmark into another folder.
pub fn move_bookmark(id: EntityId, folder_id: EntityId) -> Operation {
    mutation("moveBookmark", "updateBookmark")
        .args(
            "$id: Int!, $folderId: Int!",
            "data: { id: $id, folderId: $folderId }",
            json!({ "id": id, "folderId": folder_id }),
        )
        .spread(fragments::bookmark())
        .spread(fragments::input_validation_error())
        .spread(fragments::base_error())
        .build()
}

pub fn all_bookmarks() -> Operation {
    query("allBookmarks", "bookmarks")
        .args("", "deleted: false", json!({}))
        .keyed_by(json!({ "deleted": false }))
        .spread(fragments::bookmarks())
        .spread(fragments::base_error())
        .build()
}

/// Bookmarks in the trash.
pub fn deleted_bookmarks() -> Operation {
    query("deletedBookmarks", "bookmarks")
        .args("", "deleted: true", json!({}))
        .keyed_by(json!({ "deleted": true }))
        .spread(fragments::bookmarks())
        .spread(fragments::base_error())
        .build()
}

pub fn folder_bookmarks(id: EntityId) -> Operation {
    query("folderBookmarks", "folder")
        .args("$id: Int!", "id: $id", json!({ "id": id }))
        .keyed_by(json!({ "id": id }))
        .spread(fragments::folder_with_bookmarks())
        .spread(fragments::base_error())
        .build()
}

pub fn folder_children(id: EntityId) -> Operation {
    query("folderChildren", "folder")
        .args("$id: Int!", "id: $id", json!({ "id": id }))
        .keyed_by(json!({ "id": id }))
        .spread(fragments::folder_with_children())
        .spread(fragments::base_error())
        .build()
}

/// Creates a folder; `parent_id` of `None` makes a top-level folder.
pub fn create_folder(name: &str, parent_id: Option<EntityId>) -> Operation {
    mutation("createFolder", "createFolder")
        .args(
            "$name: String!, $parentId: Int",
            "data: { name: $name, parentId: $parentId }",
            json!({ "name": name, "parentId": parent_id }),
        )
        .spread(fragments::folder())
        .spread(fragments::input_validation_error())
        .spread(fragments::base_error())
        .build()
}

pub fn login(email: &str, password: &str) -> Operation {
    mutation("login", "login")
        .args(
            "$email: String!, $password: String!",
            "email: $email, password: $password",
            json!({ "email": email, "password": password }),
        )
        .spread(fragments::user())
        .spread(fragments::base_error())
        .build()
}
