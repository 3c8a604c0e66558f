//! Identities used on both sides of the migration
//!
//! - [`SourceId`]: legacy surrogate key, scoped per entity kind
//! - [`EntityId`]: identity minted by the target store
//! - [`Ref`]: typed handle to a target entity of a known kind

use crate::kind::EntityKind;
use crate::target::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Legacy 64-bit surrogate key
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SourceId(pub i64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SourceId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Store-assigned identity of a target entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Typed reference to a target entity
///
/// Carries only the store identity; the kind is fixed by `T`.
pub struct Ref<T> {
    id: EntityId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    /// Wrap a raw store identity
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Store identity behind this reference
    #[inline]
    #[must_use]
    pub const fn id(self) -> EntityId {
        self.id
    }
}

impl<T: Entity> Ref<T> {
    /// Forget the static kind
    #[inline]
    #[must_use]
    pub fn erase(self) -> AnyRef {
        AnyRef {
            kind: T::KIND,
            id: self.id,
        }
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.id).finish()
    }
}

/// Reference with its kind carried at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnyRef {
    /// Kind of the referenced entity
    pub kind: EntityKind,
    /// Identity of the referenced entity
    pub id: EntityId,
}
