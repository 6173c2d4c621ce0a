//! High-level bookmark operations with cache upkeep.

use crate::error::ClientResult;
use crate::executor::MutationExecutor;
use crate::operation::{self, Operation};
use crate::transport::Transport;
use markstack_cache::reconcile::{merge_child, remove_child};
use markstack_cache::{EntityCache, EntityRef, Modification};
use markstack_model::{
    fragments, Bookmark, BookmarkResult, BookmarksResult, Folder, FolderBookmarksResult,
    FolderChildrenResult, FolderResult, FolderWithBookmarks, FolderWithChildren, FragmentShape,
    LoginResult, Outcome, ResultUnion, User,
};
use markstack_types::{EntityId, Typename};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Field on a folder listing its bookmarks.
pub const BOOKMARKS_FIELD: &str = "bookmarks";
/// Field on a folder listing its sub-folders.
pub const CHILDREN_FIELD: &str = "children";
/// Root field holding the signed-in user.
pub const VIEWER_FIELD: &str = "me";

/// Runs operations against the backend and keeps the entity cache in step
/// with every successful answer.
#[derive(Clone)]
pub struct BookmarkClient {
    executor: MutationExecutor,
    cache: Arc<EntityCache>,
}

impl BookmarkClient {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<EntityCache>) -> Self {
        Self {
            executor: MutationExecutor::new(transport),
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<EntityCache> {
        &self.cache
    }

    pub fn executor(&self) -> &MutationExecutor {
        &self.executor
    }

    async fn run<R>(&self, operation: &Operation) -> ClientResult<(Outcome<R::Payload>, Value)>
    where
        R: ResultUnion + DeserializeOwned,
    {
        let (result, payload) = self.executor.execute_with_payload::<R>(operation).await?;
        let outcome = result.into_outcome();
        match &outcome {
            Outcome::Ok(_) => debug!(operation = operation.name, "succeeded"),
            Outcome::Invalid(e) => warn!(operation = operation.name, error = %e, "input rejected"),
            Outcome::Failed(e) => warn!(operation = operation.name, error = %e, "request refused"),
        }
        Ok((outcome, payload))
    }

    fn folder_ref(&self, id: EntityId) -> EntityRef {
        self.cache.identify(Typename::FOLDER, id)
    }

    fn bookmark_ref(&self, id: EntityId) -> EntityRef {
        self.cache.identify(Typename::BOOKMARK, id)
    }

    /// Folders the cache believes `bookmark` lives in: its cached
    /// `folderId`, or else every cached folder listing it. Listings only
    /// carry bookmark summaries, so the second lookup is the common case.
    fn cached_folders_of(&self, bookmark: EntityId) -> Vec<EntityId> {
        let bookmark_ref = self.bookmark_ref(bookmark);
        if let Some(folder) = self
            .cache
            .read_field(&bookmark_ref, "folderId")
            .and_then(|value| value.as_entity_id())
        {
            return vec![folder];
        }
        self.cache
            .referrers(Typename::FOLDER, BOOKMARKS_FIELD, &bookmark_ref)
            .iter()
            .map(EntityRef::id)
            .collect()
    }

    /// Drops cached bookmark list queries so the next view refetches them.
    fn invalidate_bookmark_lists(&self) {
        let root = EntityRef::root_query();
        for op in [operation::all_bookmarks(), operation::deleted_bookmarks()] {
            self.cache
                .modify_field(&root, &op.store_field_name(), |_, _| Modification::Delete);
        }
    }

    fn detach_from_folders(&self, bookmark: EntityId, folders: &[EntityId]) {
        for &folder in folders {
            let removed = remove_child(
                &self.cache,
                &self.folder_ref(folder),
                BOOKMARKS_FIELD,
                &self.bookmark_ref(bookmark),
            );
            debug!(%bookmark, %folder, removed, "detached bookmark from folder");
        }
    }

    fn store_query(&self, operation: &Operation, payload: &Value, shape: &FragmentShape) -> ClientResult<()> {
        self.cache
            .write_root_field(&operation.store_field_name(), payload, shape)?;
        Ok(())
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Creates a bookmark and appends it to its folder's cached list.
    pub async fn create_bookmark(&self, folder_id: EntityId, url: &str) -> ClientResult<Outcome<Bookmark>> {
        let op = operation::create_bookmark(folder_id, url);
        let (outcome, payload) = self.run::<BookmarkResult>(&op).await?;
        if let Outcome::Ok(bookmark) = &outcome {
            let parent = self.folder_ref(bookmark.folder_id.unwrap_or(folder_id));
            let merged = merge_child(&self.cache, &parent, BOOKMARKS_FIELD, &payload, &fragments::bookmark())?;
            info!(bookmark = %bookmark.id, ?merged, "bookmark created");
            self.invalidate_bookmark_lists();
        }
        Ok(outcome)
    }

    /// Moves a bookmark to the trash.
    pub async fn soft_delete_bookmark(&self, id: EntityId) -> ClientResult<Outcome<Bookmark>> {
        let previous = self.cached_folders_of(id);
        let op = operation::soft_delete_bookmark(id);
        let (outcome, payload) = self.run::<BookmarkResult>(&op).await?;
        if let Outcome::Ok(bookmark) = &outcome {
            self.cache.write_fragment(&payload, &fragments::bookmark())?;
            self.detach_from_folders(id, &or_answered(previous, bookmark.folder_id));
            self.invalidate_bookmark_lists();
        }
        Ok(outcome)
    }

    /// Deletes a bookmark for good and evicts it.
    pub async fn hard_delete_bookmark(&self, id: EntityId) -> ClientResult<Outcome<Bookmark>> {
        let previous = self.cached_folders_of(id);
        let op = operation::hard_delete_bookmark(id);
        let (outcome, _) = self.run::<BookmarkResult>(&op).await?;
        if let Outcome::Ok(bookmark) = &outcome {
            self.detach_from_folders(id, &or_answered(previous, bookmark.folder_id));
            self.cache.evict(&self.bookmark_ref(id));
            self.invalidate_bookmark_lists();
        }
        Ok(outcome)
    }

    /// Deletes several bookmarks for good.
    pub async fn hard_delete_bookmarks(&self, ids: &[EntityId]) -> ClientResult<Outcome<Vec<Bookmark>>> {
        let mut previous: Vec<(EntityId, Vec<EntityId>)> =
            ids.iter().map(|id| (*id, self.cached_folders_of(*id))).collect();
        let op = operation::hard_delete_bookmarks(ids);
        let (outcome, _) = self.run::<BookmarksResult>(&op).await?;
        if let Outcome::Ok(deleted) = &outcome {
            for bookmark in deleted {
                let cached = previous
                    .iter_mut()
                    .find(|(id, _)| *id == bookmark.id)
                    .map(|(_, folders)| std::mem::take(folders))
                    .unwrap_or_default();
                self.detach_from_folders(bookmark.id, &or_answered(cached, bookmark.folder_id));
                self.cache.evict(&self.bookmark_ref(bookmark.id));
            }
            self.invalidate_bookmark_lists();
        }
        Ok(outcome)
    }

    /// Moves a bookmark into `folder_id`, updating both folders' lists.
    pub async fn move_bookmark(&self, id: EntityId, folder_id: EntityId) -> ClientResult<Outcome<Bookmark>> {
        let previous = self.cached_folders_of(id);
        let op = operation::move_bookmark(id, folder_id);
        let (outcome, payload) = self.run::<BookmarkResult>(&op).await?;
        if let Outcome::Ok(bookmark) = &outcome {
            let target = bookmark.folder_id.unwrap_or(folder_id);
            let left: Vec<EntityId> = previous.into_iter().filter(|f| *f != target).collect();
            self.detach_from_folders(id, &left);
            merge_child(&self.cache, &self.folder_ref(target), BOOKMARKS_FIELD, &payload, &fragments::bookmark())?;
        }
        Ok(outcome)
    }

    /// Creates a folder and appends it to its parent's cached children.
    pub async fn create_folder(&self, name: &str, parent_id: Option<EntityId>) -> ClientResult<Outcome<Folder>> {
        let op = operation::create_folder(name, parent_id);
        let (outcome, payload) = self.run::<FolderResult>(&op).await?;
        if let Outcome::Ok(folder) = &outcome {
            match folder.parent_id.or(parent_id) {
                Some(parent) => {
                    merge_child(&self.cache, &self.folder_ref(parent), CHILDREN_FIELD, &payload, &fragments::folder())?;
                }
                None => {
                    self.cache.write_fragment(&payload, &fragments::folder())?;
                }
            }
            info!(folder = %folder.id, "folder created");
        }
        Ok(outcome)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Outcome<User>> {
        let op = operation::login(email, password);
        let (outcome, payload) = self.run::<LoginResult>(&op).await?;
        if let Outcome::Ok(user) = &outcome {
            self.cache.write_root_field(VIEWER_FIELD, &payload, &fragments::user())?;
            info!(user = %user.id, "signed in");
        }
        Ok(outcome)
    }

    // ── Queries ──────────────────────────────────────────────────

    pub async fn all_bookmarks(&self) -> ClientResult<Outcome<Vec<Bookmark>>> {
        let op = operation::all_bookmarks();
        let (outcome, payload) = self.run::<BookmarksResult>(&op).await?;
        if outcome.is_ok() {
            self.store_query(&op, &payload, &fragments::bookmarks())?;
        }
        Ok(outcome)
    }

    /// Bookmarks in the trash.
    pub async fn deleted_bookmarks(&self) -> ClientResult<Outcome<Vec<Bookmark>>> {
        let op = operation::deleted_bookmarks();
        let (outcome, payload) = self.run::<BookmarksResult>(&op).await?;
        if outcome.is_ok() {
            self.store_query(&op, &payload, &fragments::bookmarks())?;
        }
        Ok(outcome)
    }

    pub async fn folder_bookmarks(&self, id: EntityId) -> ClientResult<Outcome<FolderWithBookmarks>> {
        let op = operation::folder_bookmarks(id);
        let (outcome, payload) = self.run::<FolderBookmarksResult>(&op).await?;
        if outcome.is_ok() {
            self.store_query(&op, &payload, &fragments::folder_with_bookmarks())?;
        }
        Ok(outcome)
    }

    pub async fn folder_children(&self, id: EntityId) -> ClientResult<Outcome<FolderWithChildren>> {
        let op = operation::folder_children(id);
        let (outcome, payload) = self.run::<FolderChildrenResult>(&op).await?;
        if outcome.is_ok() {
            self.store_query(&op, &payload, &fragments::folder_with_children())?;
        }
        Ok(outcome)
    }

    // ── Cache reads ──────────────────────────────────────────────

    /// A folder and its bookmarks as currently cached.
    pub fn cached_folder_bookmarks(&self, id: EntityId) -> ClientResult<Option<FolderWithBookmarks>> {
        Ok(self
            .cache
            .read_fragment(&self.folder_ref(id), &fragments::folder_with_bookmarks())?)
    }

    /// A folder and its sub-folders as currently cached.
    pub fn cached_folder_children(&self, id: EntityId) -> ClientResult<Option<FolderWithChildren>> {
        Ok(self
            .cache
            .read_fragment(&self.folder_ref(id), &fragments::folder_with_children())?)
    }

    /// The signed-in user, if `login` succeeded.
    pub fn viewer(&self) -> ClientResult<Option<User>> {
        Ok(self.cache.read_root_field(VIEWER_FIELD, &fragments::user())?)
    }
}

/// Cached folders, or the folder named in the answer when the cache knew
/// of none.
fn or_answered(cached: Vec<EntityId>, answered: Option<EntityId>) -> Vec<EntityId> {
    if cached.is_empty() {
        answered.into_iter().collect()
    } else {
        cached
    }
}
