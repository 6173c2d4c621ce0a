//! Identifier types used throughout markstack.
//!
//! The backend hands out integer primary keys per table, so an id alone is
//! only unique within one typename. [`EntityKey`] pairs the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend primary key of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Creates an entity ID from a raw integer.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Parses an entity ID from a string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The GraphQL `__typename` of an entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Typename(String);

impl Typename {
    pub const BOOKMARK: &'static str = "Bookmark";
    pub const FOLDER: &'static str = "Folder";
    pub const USER: &'static str = "User";
    /// Synthetic typename holding top-level query fields.
    pub const ROOT_QUERY: &'static str = "ROOT_QUERY";

    /// Creates a typename.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the typename as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Typename {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Typename {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for Typename {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Typename {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Typename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique address of an entity: `(typename, id)`.
///
/// Rendered as `Typename:id`, e.g. `Folder:5`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    pub typename: Typename,
    pub id: EntityId,
}

impl EntityKey {
    /// Creates a key from its parts.
    pub fn new(typename: impl Into<Typename>, id: impl Into<EntityId>) -> Self {
        Self {
            typename: typename.into(),
            id: id.into(),
        }
    }

    /// Parses a key of the form `Typename:id`.
    pub fn parse(s: &str) -> crate::Result<Self> {
        let (typename, id) = s
            .rsplit_once(':')
            .ok_or_else(|| crate::Error::InvalidKey(s.to_string()))?;
        if typename.is_empty() {
            return Err(crate::Error::InvalidKey(s.to_string()));
        }
        Ok(Self::new(typename, EntityId::parse(id)?))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.typename, self.id)
    }
}

impl FromStr for EntityKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
