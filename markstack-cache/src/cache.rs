use crate::error::{CacheError, CacheResult};
use crate::reference::EntityRef;
use crate::value::{parse_id, StoreValue};
use markstack_model::{FragmentShape, Selection};
use markstack_types::{EntityId, EntityKey};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::debug;

/// Default number of change events buffered per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

const TYPENAME_FIELD: &str = "__typename";

type Record = BTreeMap<String, StoreValue>;
type Records = HashMap<EntityKey, Record>;

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEventKind {
    /// Fields were written from a payload.
    Written,
    /// One field was rewritten by `modify_field` or a root-field write.
    Modified,
    /// The record was removed.
    Evicted,
}

/// Change notification sent to subscribers after a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent {
    pub entity: EntityRef,
    /// The rewritten field, for [`CacheEventKind::Modified`].
    pub field: Option<String>,
    pub kind: CacheEventKind,
}

/// Answer of a `modify_field` updater.
#[derive(Debug, Clone, PartialEq)]
pub enum Modification {
    Keep,
    Replace(StoreValue),
    Delete,
}

/// What `modify_field` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOutcome {
    /// No record for the reference; the updater was not called.
    MissingEntity,
    Unchanged,
    Replaced,
    Deleted,
}

/// Read access to the snapshot a `modify_field` updater runs against.
pub struct FieldReader<'a> {
    records: &'a Records,
}

impl<'a> FieldReader<'a> {
    /// Current value of `field` on `entity`, if both exist.
    pub fn read_field(&self, entity: &EntityRef, field: &str) -> Option<&'a StoreValue> {
        self.records.get(entity.key()).and_then(|r| r.get(field))
    }

    /// Identity of a list item: the stored `id` of a referenced record, or
    /// of an embedded object.
    pub fn resolve_id(&self, value: &StoreValue) -> Option<EntityId> {
        match value {
            StoreValue::Ref(r) => Some(
                self.read_field(r, "id")
                    .and_then(StoreValue::as_entity_id)
                    .unwrap_or_else(|| r.id()),
            ),
            StoreValue::Object(fields) => fields.get("id").and_then(StoreValue::as_entity_id),
            StoreValue::Scalar(_) | StoreValue::List(_) => None,
        }
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.records.contains_key(entity.key())
    }
}

/// Process-wide store of normalized records.
///
/// All operations take `&self`; each one holds the internal lock for its
/// whole duration, so a write or modify is observed either entirely or not
/// at all. Change events are published after the lock is released.
pub struct EntityCache {
    records: RwLock<Records>,
    events: broadcast::Sender<CacheEvent>,
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("records", &self.len())
            .finish()
    }
}

impl EntityCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::with_event_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates an empty cache whose subscribers buffer up to `capacity`
    /// events before lagging.
    pub fn with_event_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            records: RwLock::new(HashMap::new()),
            events,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, events: Vec<CacheEvent>) {
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }

    /// Reference for `(typename, id)`. Equal inputs give equal references.
    pub fn identify(&self, typename: &str, id: impl Into<EntityId>) -> EntityRef {
        EntityRef::new(EntityKey::new(typename, id))
    }

    /// Reference for a payload carrying `__typename` and an integer `id`.
    pub fn identify_object(&self, data: &Value) -> Option<EntityRef> {
        let typename = data.get(TYPENAME_FIELD)?.as_str()?;
        let id = data.get("id").and_then(parse_id)?;
        Some(self.identify(typename, id))
    }

    /// Subscribes to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.read().contains_key(entity.key())
    }

    /// Number of records, including the root query record once written.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Current value of one field. `None` when the record or the field is
    /// not in the cache.
    pub fn read_field(&self, entity: &EntityRef, field: &str) -> Option<StoreValue> {
        self.read()
            .get(entity.key())
            .and_then(|r| r.get(field))
            .cloned()
    }

    /// Records of `typename` whose list field `field` holds a reference to
    /// `child`, ordered by key.
    pub fn referrers(&self, typename: &str, field: &str, child: &EntityRef) -> Vec<EntityRef> {
        let records = self.read();
        let mut found: Vec<EntityRef> = records
            .iter()
            .filter(|(key, _)| key.typename == typename)
            .filter(|(_, record)| {
                record
                    .get(field)
                    .and_then(StoreValue::as_list)
                    .is_some_and(|items| items.iter().any(|item| item.as_entity_ref() == Some(child)))
            })
            .map(|(key, _)| EntityRef::new(key.clone()))
            .collect();
        found.sort();
        found
    }

    /// Rewrites one field with `updater(current, reader)`.
    ///
    /// The updater runs under the write lock against a consistent snapshot.
    /// It must be free of side effects: callers may retry it, so it has to
    /// give the same answer for the same input.
    pub fn modify_field<F>(&self, entity: &EntityRef, field: &str, updater: F) -> ModifyOutcome
    where
        F: Fn(Option<&StoreValue>, &FieldReader<'_>) -> Modification,
    {
        let mut records = self.write();
        let modification = {
            let snapshot: &Records = &records;
            let Some(record) = snapshot.get(entity.key()) else {
                debug!(entity = %entity, field, "modify skipped: entity not cached");
                return ModifyOutcome::MissingEntity;
            };
            updater(record.get(field), &FieldReader { records: snapshot })
        };

        let Some(record) = records.get_mut(entity.key()) else {
            return ModifyOutcome::MissingEntity;
        };
        let outcome = match modification {
            Modification::Keep => ModifyOutcome::Unchanged,
            Modification::Replace(value) if record.get(field) == Some(&value) => {
                ModifyOutcome::Unchanged
            }
            Modification::Replace(value) => {
                record.insert(field.to_string(), value);
                ModifyOutcome::Replaced
            }
            Modification::Delete => match record.remove(field) {
                Some(_) => ModifyOutcome::Deleted,
                None => ModifyOutcome::Unchanged,
            },
        };
        drop(records);

        debug!(entity = %entity, field, ?outcome, "field modified");
        if matches!(outcome, ModifyOutcome::Replaced | ModifyOutcome::Deleted) {
            self.publish(vec![CacheEvent {
                entity: entity.clone(),
                field: Some(field.to_string()),
                kind: CacheEventKind::Modified,
            }]);
        }
        outcome
    }

    /// Stores a payload shaped by `shape` and returns its reference.
    ///
    /// Nested objects whose shape selects `id` are stored as records of
    /// their own and replaced by references. Existing records are merged
    /// field by field; fields absent from the payload are left untouched.
    /// Either the whole payload is committed or, on error, nothing is.
    pub fn write_fragment(&self, data: &Value, shape: &FragmentShape) -> CacheResult<EntityRef> {
        let mut staged = Records::new();
        let key = stage_entity(&mut staged, data, shape)?;
        self.commit(staged, Vec::new());
        Ok(EntityRef::new(key))
    }

    /// Stores a top-level query result under `field` on the root record.
    ///
    /// `data` may be a single object, a list of objects, or null.
    pub fn write_root_field(
        &self,
        field: &str,
        data: &Value,
        shape: &FragmentShape,
    ) -> CacheResult<()> {
        let mut staged = Records::new();
        let value = match data {
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    list.push(stage_nested(&mut staged, item, shape)?);
                }
                StoreValue::List(list)
            }
            other => stage_nested(&mut staged, other, shape)?,
        };
        let root = EntityRef::root_query();
        staged
            .entry(root.key().clone())
            .or_default()
            .insert(field.to_string(), value);
        self.commit(
            staged,
            vec![CacheEvent {
                entity: root,
                field: Some(field.to_string()),
                kind: CacheEventKind::Modified,
            }],
        );
        Ok(())
    }

    fn commit(&self, staged: Records, mut events: Vec<CacheEvent>) {
        let root = EntityRef::root_query();
        let mut records = self.write();
        for (key, fields) in staged {
            let entity = EntityRef::new(key.clone());
            let record = records.entry(key).or_default();
            record.extend(fields);
            if entity != root {
                debug!(entity = %entity, "record written");
                events.push(CacheEvent {
                    entity,
                    field: None,
                    kind: CacheEventKind::Written,
                });
            }
        }
        drop(records);
        self.publish(events);
    }

    /// Reads a record back through `shape` and deserializes it.
    ///
    /// Returns `Ok(None)` when the record, or any field the shape selects,
    /// is missing. References to evicted records are dropped from lists.
    pub fn read_fragment<T: DeserializeOwned>(
        &self,
        entity: &EntityRef,
        shape: &FragmentShape,
    ) -> CacheResult<Option<T>> {
        let records = self.read();
        match denormalize_entity(&records, entity.key(), shape) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Reads a top-level query result written by [`Self::write_root_field`].
    pub fn read_root_field<T: DeserializeOwned>(
        &self,
        field: &str,
        shape: &FragmentShape,
    ) -> CacheResult<Option<T>> {
        let records = self.read();
        let stored = records
            .get(EntityRef::root_query().key())
            .and_then(|r| r.get(field));
        match stored.and_then(|s| denormalize_value(&records, s, shape)) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Removes a record. References to it elsewhere become dangling and are
    /// skipped by reads.
    pub fn evict(&self, entity: &EntityRef) -> bool {
        let removed = self.write().remove(entity.key()).is_some();
        if removed {
            debug!(entity = %entity, "record evicted");
            self.publish(vec![CacheEvent {
                entity: entity.clone(),
                field: None,
                kind: CacheEventKind::Evicted,
            }]);
        }
        removed
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Dumps the whole cache as JSON keyed by `Typename:id`.
    pub fn extract(&self) -> Value {
        let records = self.read();
        let mut out = Map::new();
        for (key, record) in records.iter() {
            let name = EntityRef::new(key.clone()).to_string();
            let fields = record
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect();
            out.insert(name, Value::Object(fields));
        }
        Value::Object(out)
    }
}

fn stage_entity(
    staged: &mut Records,
    data: &Value,
    shape: &FragmentShape,
) -> CacheResult<EntityKey> {
    let obj = data
        .as_object()
        .ok_or_else(|| CacheError::NotAnObject(shape.typename.to_string()))?;
    let typename = match obj.get(TYPENAME_FIELD).and_then(Value::as_str) {
        Some(t) if shape.typename != t => {
            return Err(CacheError::TypenameMismatch {
                expected: shape.typename.to_string(),
                actual: t.to_string(),
            });
        }
        _ => shape.typename.clone(),
    };
    let id = match obj.get("id") {
        None | Some(Value::Null) => {
            return Err(CacheError::MissingId {
                typename: typename.to_string(),
            });
        }
        Some(raw) => parse_id(raw).ok_or_else(|| CacheError::InvalidId {
            typename: typename.to_string(),
            value: raw.to_string(),
        })?,
    };

    let mut fields = stage_fields(staged, obj, shape)?;
    fields.insert(
        TYPENAME_FIELD.to_string(),
        StoreValue::Scalar(Value::String(typename.as_str().to_string())),
    );
    let key = EntityKey::new(typename, id);
    staged.entry(key.clone()).or_default().extend(fields);
    Ok(key)
}

fn stage_fields(
    staged: &mut Records,
    obj: &Map<String, Value>,
    shape: &FragmentShape,
) -> CacheResult<Record> {
    let mut out = Record::new();
    for selection in &shape.selections {
        let Some(value) = obj.get(selection.name()) else {
            debug!(
                fragment = %shape.name,
                field = selection.name(),
                "payload is missing a selected field"
            );
            continue;
        };
        let stored = match selection {
            Selection::Field { .. } => StoreValue::Scalar(value.clone()),
            Selection::Object { shape, .. } => stage_nested(staged, value, shape)?,
            Selection::List { name, shape } => match value {
                Value::Null => StoreValue::null(),
                Value::Array(items) => {
                    let mut list = Vec::with_capacity(items.len());
                    for item in items {
                        list.push(stage_nested(staged, item, shape)?);
                    }
                    StoreValue::List(list)
                }
                _ => return Err(CacheError::NotAnObject(format!("list field {name}"))),
            },
        };
        out.insert(selection.name().to_string(), stored);
    }
    Ok(out)
}

fn stage_nested(staged: &mut Records, value: &Value, shape: &FragmentShape) -> CacheResult<StoreValue> {
    if value.is_null() {
        return Ok(StoreValue::null());
    }
    if shape.selects_id() {
        let key = stage_entity(staged, value, shape)?;
        return Ok(StoreValue::Ref(EntityRef::new(key)));
    }
    let obj = value
        .as_object()
        .ok_or_else(|| CacheError::NotAnObject(shape.typename.to_string()))?;
    let mut fields = stage_fields(staged, obj, shape)?;
    if let Some(typename) = obj.get(TYPENAME_FIELD) {
        fields.insert(TYPENAME_FIELD.to_string(), StoreValue::Scalar(typename.clone()));
    }
    Ok(StoreValue::Object(fields))
}

fn denormalize_entity(records: &Records, key: &EntityKey, shape: &FragmentShape) -> Option<Value> {
    denormalize_fields(records, records.get(key)?, shape)
}

fn denormalize_fields(records: &Records, record: &Record, shape: &FragmentShape) -> Option<Value> {
    let mut obj = Map::new();
    if let Some(typename) = record.get(TYPENAME_FIELD).and_then(StoreValue::as_scalar) {
        obj.insert(TYPENAME_FIELD.to_string(), typename.clone());
    }
    for selection in &shape.selections {
        let stored = record.get(selection.name())?;
        let value = match selection {
            Selection::Field { .. } => stored.to_json(),
            Selection::Object { shape, .. } | Selection::List { shape, .. } => {
                denormalize_value(records, stored, shape)?
            }
        };
        obj.insert(selection.name().to_string(), value);
    }
    Some(Value::Object(obj))
}

fn denormalize_value(records: &Records, stored: &StoreValue, shape: &FragmentShape) -> Option<Value> {
    match stored {
        StoreValue::Scalar(v) => Some(v.clone()),
        StoreValue::Ref(r) => denormalize_entity(records, r.key(), shape),
        StoreValue::Object(fields) => denormalize_fields(records, fields, shape),
        StoreValue::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let StoreValue::Ref(r) = item {
                    if !records.contains_key(r.key()) {
                        continue;
                    }
                }
                out.push(denormalize_value(records, item, shape)?);
            }
            Some(Value::Array(out))
        }
    }
}
