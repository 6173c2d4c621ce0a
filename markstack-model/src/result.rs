use crate::{Bookmark, BookmarkList, Folder, FolderWithBookmarks, FolderWithChildren, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-reported input problem tied to one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending input field, if the backend knows it.
    #[serde(default)]
    pub path: Option<String>,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Backend-reported general failure (wrong credentials, not found, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseError {
    #[serde(default)]
    pub path: Option<String>,
    pub message: String,
}

impl fmt::Display for BaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Union-agnostic view of a backend answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The requested payload.
    Ok(T),
    /// The user should fix an input and resubmit.
    Invalid(FieldError),
    /// The request was understood and refused.
    Failed(BaseError),
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// Returns the payload, if any.
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Invalid(_) | Outcome::Failed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Invalid(e) => Outcome::Invalid(e),
            Outcome::Failed(e) => Outcome::Failed(e),
        }
    }
}

/// A `__typename`-discriminated answer from the backend.
pub trait ResultUnion: Sized {
    type Payload;

    fn into_outcome(self) -> Outcome<Self::Payload>;
}

/// Answer to bookmark mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum BookmarkResult {
    Bookmark(Bookmark),
    InputValidationError(FieldError),
    BaseError(BaseError),
}

impl ResultUnion for BookmarkResult {
    type Payload = Bookmark;

    fn into_outcome(self) -> Outcome<Bookmark> {
        match self {
            BookmarkResult::Bookmark(b) => Outcome::Ok(b),
            BookmarkResult::InputValidationError(e) => Outcome::Invalid(e),
            BookmarkResult::BaseError(e) => Outcome::Failed(e),
        }
    }
}

/// Answer to bookmark list queries and bulk deletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum BookmarksResult {
    Bookmarks(BookmarkList),
    BaseError(BaseError),
}

impl ResultUnion for BookmarksResult {
    type Payload = Vec<Bookmark>;

    fn into_outcome(self) -> Outcome<Vec<Bookmark>> {
        match self {
            BookmarksResult::Bookmarks(list) => Outcome::Ok(list.bookmarks),
            BookmarksResult::BaseError(e) => Outcome::Failed(e),
        }
    }
}

/// Answer to `createFolder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum FolderResult {
    Folder(Folder),
    InputValidationError(FieldError),
    BaseError(BaseError),
}

impl ResultUnion for FolderResult {
    type Payload = Folder;

    fn into_outcome(self) -> Outcome<Folder> {
        match self {
            FolderResult::Folder(f) => Outcome::Ok(f),
            FolderResult::InputValidationError(e) => Outcome::Invalid(e),
            FolderResult::BaseError(e) => Outcome::Failed(e),
        }
    }
}

/// Answer to the `folderBookmarks` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum FolderBookmarksResult {
    Folder(FolderWithBookmarks),
    BaseError(BaseError),
}

impl ResultUnion for FolderBookmarksResult {
    type Payload = FolderWithBookmarks;

    fn into_outcome(self) -> Outcome<FolderWithBookmarks> {
        match self {
            FolderBookmarksResult::Folder(f) => Outcome::Ok(f),
            FolderBookmarksResult::BaseError(e) => Outcome::Failed(e),
        }
    }
}

/// Answer to the `folderChildren` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum FolderChildrenResult {
    Folder(FolderWithChildren),
    BaseError(BaseError),
}

impl ResultUnion for FolderChildrenResult {
    type Payload = FolderWithChildren;

    fn into_outcome(self) -> Outcome<FolderWithChildren> {
        match self {
            FolderChildrenResult::Folder(f) => Outcome::Ok(f),
            FolderChildrenResult::BaseError(e) => Outcome::Failed(e),
        }
    }
}

/// Answer to `login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum LoginResult {
    User(User),
    BaseError(BaseError),
}

impl ResultUnion for LoginResult {
    type Payload = User;

    fn into_outcome(self) -> Outcome<User> {
        match self {
            LoginResult::User(u) => Outcome::Ok(u),
            LoginResult::BaseError(e) => Outcome::Failed(e),
        }
    }
}
