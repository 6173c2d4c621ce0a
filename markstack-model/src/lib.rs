//! Domain model for markstack.
//!
//! Defines the types shared by the cache, the client and the forms:
//! - [`Bookmark`], [`Folder`] and friends: payloads as the backend returns them
//! - [`FragmentShape`]: a typed selection set, used both to render GraphQL
//!   fragments and to normalize payloads into the entity cache
//! - result unions ([`BookmarkResult`], [`LoginResult`], ...): one enum
//!   variant per `__typename` the backend may answer with
//!
//! Backend-reported failures are values, not errors: every union converts
//! into an [`Outcome`] that callers must match exhaustively.

mod entity;
pub mod fragments;
mod result;
mod shape;

pub use entity::{
    Bookmark, BookmarkList, Entity, Folder, FolderSummary, FolderWithBookmarks,
    FolderWithChildren, User,
};
pub use result::{
    BaseError, BookmarkResult, BookmarksResult, FieldError, FolderBookmarksResult,
    FolderChildrenResult, FolderResult, LoginResult, Outcome, ResultUnion,
};
pub use shape::{FragmentShape, Selection};
