use chrono::{DateTime, Utc};
use markstack_types::{EntityId, EntityKey, Typename};
use serde::{Deserialize, Serialize};

/// A record the cache can normalize: it has a typename and an id.
pub trait Entity {
    const TYPENAME: &'static str;

    fn id(&self) -> EntityId;

    fn key(&self) -> EntityKey {
        EntityKey::new(Typename::new(Self::TYPENAME), self.id())
    }
}

/// A saved link.
///
/// Nested selections (e.g. a folder's bookmark list) only carry a subset of
/// the fields, so everything past `url` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: EntityId,
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub folder_id: Option<EntityId>,
}

impl Bookmark {
    /// Title if the backend resolved one, otherwise the URL.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.url)
    }
}

impl Entity for Bookmark {
    const TYPENAME: &'static str = Typename::BOOKMARK;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Wrapper type the backend returns for bookmark lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkList {
    pub bookmarks: Vec<Bookmark>,
}

/// A folder node. Root folders have no parent and depth 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: EntityId,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub depth: i32,
    pub name: String,
}

impl Entity for Folder {
    const TYPENAME: &'static str = Typename::FOLDER;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Child folder as listed under its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderSummary {
    pub id: EntityId,
    pub name: String,
}

impl Entity for FolderSummary {
    const TYPENAME: &'static str = Typename::FOLDER;

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderWithChildren {
    #[serde(flatten)]
    pub folder: Folder,
    #[serde(default)]
    pub children: Vec<FolderSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderWithBookmarks {
    #[serde(flatten)]
    pub folder: Folder,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

/// The logged-in account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
}

impl Entity for User {
    const TYPENAME: &'static str = Typename::USER;

    fn id(&self) -> EntityId {
        self.id
    }
}
