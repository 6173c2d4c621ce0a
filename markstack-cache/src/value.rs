use crate::reference::EntityRef;
use markstack_types::EntityId;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A field value as stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// Any JSON leaf (string, number, bool, null) or opaque blob.
    Scalar(Value),
    /// Pointer to another record.
    Ref(EntityRef),
    /// Ordered list, e.g. a folder's bookmarks.
    List(Vec<StoreValue>),
    /// Nested object without an identity of its own.
    Object(BTreeMap<String, StoreValue>),
}

impl StoreValue {
    pub fn null() -> Self {
        StoreValue::Scalar(Value::Null)
    }

    pub fn as_entity_ref(&self) -> Option<&EntityRef> {
        match self {
            StoreValue::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StoreValue]> {
        match self {
            StoreValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            StoreValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Scalar read as an entity id. Numbers and numeric strings both count,
    /// matching what writes accept.
    pub fn as_entity_id(&self) -> Option<EntityId> {
        self.as_scalar().and_then(parse_id)
    }

    /// Debug rendering in the usual normalized-cache notation, with
    /// references written as `{"__ref": "Typename:id"}`.
    pub fn to_json(&self) -> Value {
        match self {
            StoreValue::Scalar(v) => v.clone(),
            StoreValue::Ref(r) => {
                let mut map = Map::new();
                map.insert("__ref".into(), Value::String(r.to_string()));
                Value::Object(map)
            }
            StoreValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            StoreValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Entity id from a JSON number or numeric string.
pub(crate) fn parse_id(value: &Value) -> Option<EntityId> {
    match value {
        Value::Number(n) => n.as_i64().map(EntityId::new),
        Value::String(s) => EntityId::parse(s).ok(),
        _ => None,
    }
}

impl From<EntityRef> for StoreValue {
    fn from(r: EntityRef) -> Self {
        StoreValue::Ref(r)
    }
}

impl From<Value> for StoreValue {
    fn from(v: Value) -> Self {
        StoreValue::Scalar(v)
    }
}
