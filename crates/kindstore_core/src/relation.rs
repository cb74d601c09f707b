//! Deferred-load relation cells.

use crate::convert::ConverterRegistry;
use crate::mapper::EntityMapper;
use crate::schema::Persistable;
use kindstore_storage::Datastore;
use std::sync::Arc;
use tracing::{debug, error};

/// A reference to another persistable object, held by key and loaded on
/// demand.
///
/// A relation cell is in one of three states:
///
/// - `Absent` - no target (never set, stored as null, or dangling)
/// - `Unloaded(id)` - the key is known but the target has not been
///   fetched yet (a field tagged lazy comes back from a read in this
///   state)
/// - `Loaded(target)` - the target is materialized
///
/// [`Relation::resolve`] performs the load-on-first-access transition:
/// an `Unloaded` cell fetches its target synchronously exactly once and
/// memoizes the outcome. A missing target or a backend failure resolves
/// to `Absent` - the failure is logged, not raised - so callers must
/// tolerate `None` after resolution.
///
/// Concurrent first access is not synchronized; share a cell across
/// threads only behind external locking.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation<T: Persistable> {
    /// No target.
    Absent,
    /// Known key, target not yet fetched.
    Unloaded(i64),
    /// Materialized target.
    Loaded(Box<T>),
}

impl<T: Persistable> Relation<T> {
    /// Creates a loaded cell.
    #[must_use]
    pub fn loaded(target: T) -> Self {
        Self::Loaded(Box::new(target))
    }

    /// Creates an unloaded cell holding the target's id.
    #[must_use]
    pub fn unloaded(id: i64) -> Self {
        Self::Unloaded(id)
    }

    /// Returns the related id: the retained key while unloaded, the
    /// target's own id once loaded, `None` when absent.
    ///
    /// This is what persists as the foreign key; a loaded target that
    /// has never been saved yields `None` and the relation stores as
    /// omitted.
    #[must_use]
    pub fn key(&self) -> Option<i64> {
        match self {
            Self::Absent => None,
            Self::Unloaded(id) => Some(*id),
            Self::Loaded(target) => target.id(),
        }
    }

    /// Returns the target if already materialized, without loading.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Loaded(target) => Some(target),
            _ => None,
        }
    }

    /// Returns `true` once the target is materialized.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Returns `true` when there is no target and no key.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Resolves the cell, fetching the target on first access.
    ///
    /// `Loaded` and `Absent` cells return immediately with no I/O.
    /// An `Unloaded` cell fetches by key, maps the result, and memoizes
    /// it; a missing target or a load failure memoizes `Absent` and the
    /// failure is logged.
    pub fn resolve(
        &mut self,
        store: &dyn Datastore,
        converters: &Arc<ConverterRegistry>,
    ) -> Option<&T> {
        if let Self::Unloaded(id) = *self {
            debug!(kind = T::kind(), id, "lazy loading relation");
            let mapper = EntityMapper::new(Arc::clone(converters));
            *self = match mapper.load_related::<T>(store, id) {
                Ok(Some(target)) => Self::loaded(target),
                Ok(None) => Self::Absent,
                Err(e) => {
                    error!(kind = T::kind(), id, error = %e, "relation load failed");
                    Self::Absent
                }
            };
        }
        self.get()
    }

    /// Replaces the cell with a loaded target.
    pub fn set(&mut self, target: T) {
        *self = Self::loaded(target);
    }
}

impl<T: Persistable> Default for Relation<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T: Persistable> From<T> for Relation<T> {
    fn from(target: T) -> Self {
        Self::loaded(target)
    }
}
