//! Normalized entity cache for markstack.
//!
//! Every record the backend returns is stored once, under its
//! `(typename, id)` key. Fields that point at other records hold an
//! [`EntityRef`] instead of a copy, so an update to a bookmark is visible in
//! every list that references it.
//!
//! # Architecture
//!
//! - [`EntityCache`] owns the records. It is an ordinary value: create one
//!   at startup, share it behind an `Arc`, drop it at shutdown.
//! - Payloads go in through [`EntityCache::write_fragment`], which walks a
//!   [`FragmentShape`](markstack_model::FragmentShape) and splits nested
//!   records out into their own entries.
//! - Fields change through [`EntityCache::modify_field`]: the updater sees
//!   the current value and a [`FieldReader`] over the same snapshot, and its
//!   answer is committed under one lock.
//! - The [`reconcile`] module merges newly created children into a parent's
//!   list field, de-duplicating by id.
//! - Subscribers receive a [`CacheEvent`] for every committed change.

mod cache;
mod error;
mod reference;
pub mod reconcile;
mod value;

pub use cache::{CacheEvent, CacheEventKind, EntityCache, FieldReader, Modification, ModifyOutcome};
pub use error::{CacheError, CacheResult};
pub use reconcile::MergeOutcome;
pub use reference::EntityRef;
pub use value::StoreValue;
