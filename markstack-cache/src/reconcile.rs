//! List reconciliation for parent → children relations.
//!
//! When a mutation creates a child (a bookmark in a folder, a folder under
//! a folder), the parent's list field is extended in place instead of
//! refetching it. Query and mutation answers can overlap, so the child may
//! already be listed; membership is decided by id alone, never by deep
//! equality. New children are appended in the order their mutations
//! complete.

use crate::cache::{EntityCache, FieldReader, Modification, ModifyOutcome};
use crate::error::CacheResult;
use crate::reference::EntityRef;
use crate::value::StoreValue;
use markstack_model::FragmentShape;
use markstack_types::EntityId;
use serde_json::Value;
use tracing::debug;

/// Result of merging a child into a parent's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The child reference was appended.
    Appended(EntityRef),
    /// A list item with the same id was already there; the list is untouched.
    AlreadyPresent(EntityRef),
    /// The parent is not cached, so there is no list to extend. The child
    /// itself was still written.
    ParentMissing(EntityRef),
}

impl MergeOutcome {
    pub fn child(&self) -> &EntityRef {
        match self {
            MergeOutcome::Appended(r)
            | MergeOutcome::AlreadyPresent(r)
            | MergeOutcome::ParentMissing(r) => r,
        }
    }
}

/// Items of a list field; anything that is not a list counts as empty.
fn items(existing: Option<&StoreValue>) -> &[StoreValue] {
    existing.and_then(StoreValue::as_list).unwrap_or_default()
}

/// An item matches when it is the same reference or resolves to the same
/// id. Items whose id cannot be resolved only match by reference.
fn same_child(
    item: &StoreValue,
    child: &EntityRef,
    child_id: Option<EntityId>,
    reader: &FieldReader<'_>,
) -> bool {
    item.as_entity_ref() == Some(child)
        || (child_id.is_some() && reader.resolve_id(item) == child_id)
}

/// Decides the new value of a list field after `child` was created.
///
/// Pure: the answer depends only on the arguments, so it is safe to run
/// again if the cache retries the update.
pub fn append_unique(
    existing: Option<&StoreValue>,
    child: &EntityRef,
    reader: &FieldReader<'_>,
) -> Modification {
    let child_id = reader.resolve_id(&StoreValue::Ref(child.clone()));
    let current = items(existing);
    if current
        .iter()
        .any(|item| same_child(item, child, child_id, reader))
    {
        return Modification::Keep;
    }
    let mut next = current.to_vec();
    next.push(StoreValue::Ref(child.clone()));
    Modification::Replace(StoreValue::List(next))
}

/// Decides the new value of a list field after `child` left it.
pub fn remove_matching(
    existing: Option<&StoreValue>,
    child: &EntityRef,
    reader: &FieldReader<'_>,
) -> Modification {
    let child_id = reader.resolve_id(&StoreValue::Ref(child.clone()));
    let current = items(existing);
    let kept: Vec<StoreValue> = current
        .iter()
        .filter(|item| !same_child(item, child, child_id, reader))
        .cloned()
        .collect();
    if kept.len() == current.len() {
        Modification::Keep
    } else {
        Modification::Replace(StoreValue::List(kept))
    }
}

/// Writes `child` into the cache and appends its reference to
/// `parent.field` unless an item with the same id is already listed.
pub fn merge_child(
    cache: &EntityCache,
    parent: &EntityRef,
    field: &str,
    child: &Value,
    shape: &FragmentShape,
) -> CacheResult<MergeOutcome> {
    let child_ref = cache.write_fragment(child, shape)?;
    let outcome = cache.modify_field(parent, field, |existing, reader| {
        append_unique(existing, &child_ref, reader)
    });
    let merged = match outcome {
        ModifyOutcome::MissingEntity => MergeOutcome::ParentMissing(child_ref),
        ModifyOutcome::Replaced => MergeOutcome::Appended(child_ref),
        ModifyOutcome::Unchanged | ModifyOutcome::Deleted => MergeOutcome::AlreadyPresent(child_ref),
    };
    debug!(parent = %parent, field, ?merged, "merged child into list");
    Ok(merged)
}

/// Removes every item resolving to `child`'s id from `parent.field`.
/// Returns true if the list changed.
pub fn remove_child(cache: &EntityCache, parent: &EntityRef, field: &str, child: &EntityRef) -> bool {
    let outcome = cache.modify_field(parent, field, |existing, reader| {
        remove_matching(existing, child, reader)
    });
    outcome == ModifyOutcome::Replaced
}
