//! Persistable field descriptors.

use crate::error::CoreResult;
use crate::mapper::LoadContext;
use crate::relation::Relation;
use crate::schema::Persistable;
use crate::value::DomainValue;
use std::fmt;

/// Reads a field's domain value.
pub type GetFn<T> = fn(&T) -> DomainValue;

/// Writes a field's domain value back onto the object.
pub type SetFn<T> = fn(&mut T, DomainValue) -> CoreResult<()>;

/// Reads the related id out of a relation field.
pub type KeyFn<T> = fn(&T) -> Option<i64>;

type HydrateFn<T> =
    Box<dyn Fn(&mut T, Option<i64>, bool, &LoadContext<'_>) -> CoreResult<()> + Send + Sync>;

/// How the mapper reaches into a field.
pub enum FieldAccess<T> {
    /// A plain value field.
    Scalar {
        /// Reads the domain value.
        get: GetFn<T>,
        /// Writes the domain value.
        set: SetFn<T>,
    },
    /// A field holding a reference to another persistable type.
    Relation {
        /// Reads the related id (target's own id once loaded, the
        /// retained key while unloaded, `None` when absent).
        key: KeyFn<T>,
        /// Resolves the kind the relation points at.
        ///
        /// Deferred behind a function so that declaring a relation does
        /// not force the related type's schema; a self-referential
        /// schema would otherwise recurse into its own initialization.
        related_kind: fn() -> &'static str,
        /// Installs the hydrated relation cell on read.
        hydrate: HydrateFn<T>,
    },
}

/// Describes one persistable field of a domain type.
///
/// A descriptor carries everything the mapper needs: the storage name
/// (defaults to the field name), the indexing flag, an optional declared
/// converter, the laziness tag for relations, and the typed accessors.
///
/// Descriptors are assembled once per type inside its schema; the
/// identity field is not part of the set.
pub struct Field<T> {
    name: &'static str,
    storage_name: Option<&'static str>,
    indexed: bool,
    converter: Option<&'static str>,
    lazy: bool,
    access: FieldAccess<T>,
}

impl<T> Field<T> {
    /// Creates a plain value field descriptor, indexed by default.
    #[must_use]
    pub fn scalar(name: &'static str, get: GetFn<T>, set: SetFn<T>) -> Self {
        Self {
            name,
            storage_name: None,
            indexed: true,
            converter: None,
            lazy: false,
            access: FieldAccess::Scalar { get, set },
        }
    }

    /// Creates a relation field descriptor pointing at `R`.
    ///
    /// `key` reads the related id off the object; `assign` installs the
    /// hydrated [`Relation`] cell on read. Resolution is eager unless
    /// [`Field::lazy`] is chained on.
    #[must_use]
    pub fn relation<R: Persistable>(
        name: &'static str,
        key: KeyFn<T>,
        assign: fn(&mut T, Relation<R>),
    ) -> Self
    where
        T: 'static,
    {
        let hydrate: HydrateFn<T> =
            Box::new(move |obj, related_id, lazy, cx| {
                let cell = match related_id {
                    None => Relation::Absent,
                    Some(id) if lazy => Relation::unloaded(id),
                    Some(id) => match cx.load_related::<R>(id)? {
                        Some(target) => Relation::loaded(target),
                        // Dangling key: the target was deleted.
                        None => Relation::Absent,
                    },
                };
                assign(obj, cell);
                Ok(())
            });
        Self {
            name,
            storage_name: None,
            indexed: true,
            converter: None,
            lazy: false,
            access: FieldAccess::Relation {
                key,
                related_kind: R::kind,
                hydrate,
            },
        }
    }

    /// Overrides the storage name (defaults to the field name).
    #[must_use]
    pub fn storage_name(mut self, name: &'static str) -> Self {
        self.storage_name = Some(name);
        self
    }

    /// Stores this field through the do-not-index path.
    #[must_use]
    pub fn unindexed(mut self) -> Self {
        self.indexed = false;
        self
    }

    /// Declares a converter for this field, looked up by name in the
    /// converter registry at mapping time.
    #[must_use]
    pub fn converter(mut self, name: &'static str) -> Self {
        self.converter = Some(name);
        self
    }

    /// Defers resolution of this relation until first access.
    ///
    /// Has no effect on scalar fields.
    #[must_use]
    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Returns the domain field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the effective storage name.
    #[must_use]
    pub fn effective_storage_name(&self) -> &'static str {
        self.storage_name.unwrap_or(self.name)
    }

    /// Returns whether this field is indexed.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Returns the declared converter name, if any.
    #[must_use]
    pub fn converter_name(&self) -> Option<&'static str> {
        self.converter
    }

    /// Returns whether this relation resolves lazily.
    #[must_use]
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Returns whether this is a relation field.
    #[must_use]
    pub fn is_relation(&self) -> bool {
        matches!(self.access, FieldAccess::Relation { .. })
    }

    pub(crate) fn access(&self) -> &FieldAccess<T> {
        &self.access
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("storage_name", &self.effective_storage_name())
            .field("indexed", &self.indexed)
            .field("converter", &self.converter)
            .field("lazy", &self.lazy)
            .field("relation", &self.is_relation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        name: String,
    }

    #[test]
    fn storage_name_defaults_to_field_name() {
        let field = Field::scalar(
            "name",
            |s: &Sample| s.name.clone().into(),
            |s, v| {
                s.name = v.into_text()?;
                Ok(())
            },
        );
        assert_eq!(field.effective_storage_name(), "name");
        assert!(field.is_indexed());
        assert!(!field.is_lazy());
        assert!(!field.is_relation());
    }

    #[test]
    fn options_chain() {
        let field = Field::scalar(
            "name",
            |s: &Sample| s.name.clone().into(),
            |s, v| {
                s.name = v.into_text()?;
                Ok(())
            },
        )
        .storage_name("full_name")
        .unindexed()
        .converter("upper");

        assert_eq!(field.effective_storage_name(), "full_name");
        assert!(!field.is_indexed());
        assert_eq!(field.converter_name(), Some("upper"));
    }
}
