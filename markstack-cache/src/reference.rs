use markstack_types::{EntityId, EntityKey, Typename};
use std::fmt;

/// Opaque handle to a cached record.
///
/// Two references compare equal iff they address the same `(typename, id)`
/// pair; the handle says nothing about whether the record is present.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityRef(EntityKey);

impl EntityRef {
    pub(crate) fn new(key: EntityKey) -> Self {
        Self(key)
    }

    /// Reference to the synthetic record holding top-level query fields.
    pub fn root_query() -> Self {
        Self(EntityKey::new(Typename::ROOT_QUERY, 0))
    }

    pub fn key(&self) -> &EntityKey {
        &self.0
    }

    pub fn typename(&self) -> &Typename {
        &self.0.typename
    }

    pub fn id(&self) -> EntityId {
        self.0.id
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.typename == Typename::ROOT_QUERY {
            f.write_str(Typename::ROOT_QUERY)
        } else {
            self.0.fmt(f)
        }
    }
}
