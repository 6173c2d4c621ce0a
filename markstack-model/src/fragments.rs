//! Stock fragments shared by every operation document.

use crate::FragmentShape;
use markstack_types::Typename;

/// Full bookmark record.
pub fn bookmark() -> FragmentShape {
    FragmentShape::new("Bookmark", Typename::BOOKMARK).fields(&[
        "id",
        "title",
        "url",
        "description",
        "createdDate",
        "folderId",
    ])
}

/// Bookmark as listed inside a folder.
pub fn bookmark_summary() -> FragmentShape {
    FragmentShape::new("BookmarkSummary", Typename::BOOKMARK)
        .fields(&["id", "title", "url", "description"])
}

/// The `Bookmarks` wrapper returned by list queries and bulk deletes.
pub fn bookmarks() -> FragmentShape {
    FragmentShape::new("Bookmarks", "Bookmarks").list("bookmarks", bookmark())
}

pub fn folder() -> FragmentShape {
    FragmentShape::new("Folder", Typename::FOLDER).fields(&["id", "parentId", "depth", "name"])
}

pub fn folder_summary() -> FragmentShape {
    FragmentShape::new("FolderSummary", Typename::FOLDER).fields(&["id", "name"])
}

pub fn folder_with_children() -> FragmentShape {
    FragmentShape::new("FolderWithChildren", Typename::FOLDER)
        .fields(&["id", "parentId", "depth", "name"])
        .list("children", folder_summary())
}

pub fn folder_with_bookmarks() -> FragmentShape {
    FragmentShape::new("FolderWithBookmarks", Typename::FOLDER)
        .fields(&["id", "parentId", "depth", "name"])
        .list("bookmarks", bookmark_summary())
}

pub fn user() -> FragmentShape {
    FragmentShape::new("User", Typename::USER).fields(&["id", "email"])
}

pub fn base_error() -> FragmentShape {
    FragmentShape::new("BaseError", "BaseError").fields(&["path", "message"])
}

pub fn input_validation_error() -> FragmentShape {
    FragmentShape::new("InputValidationError", "InputValidationError")
        .fields(&["path", "message"])
}
