//! Per-type persistence schemas.
//!
//! A [`Schema`] is the explicit, registered description of a type's
//! persistable fields: built once at type-registration time, memoized in
//! a `static` per type, and read-only thereafter. The first touch pays
//! the construction cost; every later lookup is O(1). Population is pure
//! and idempotent, so a duplicate build under a racing first touch is
//! benign.

mod field;

pub use field::{Field, FieldAccess, GetFn, KeyFn, SetFn};

/// Contract for a type persisted through the mapping layer.
///
/// A persistable type owns exactly one identity field: a nullable `i64`
/// surrogate key that stays `None` until the first successful write and
/// is back-filled by the repository. All other persistable fields are
/// declared in the type's [`Schema`].
///
/// `Default` stands in for the no-argument constructor: reads build a
/// fresh default instance and assign every schema field onto it.
///
/// # Example
///
/// ```rust
/// use kindstore_core::{Field, Persistable, Schema};
/// use std::sync::LazyLock;
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Note {
///     id: Option<i64>,
///     text: String,
/// }
///
/// static SCHEMA: LazyLock<Schema<Note>> = LazyLock::new(|| {
///     Schema::builder("Note")
///         .field(Field::scalar(
///             "text",
///             |n: &Note| n.text.clone().into(),
///             |n, v| {
///                 n.text = v.into_text()?;
///                 Ok(())
///             },
///         ))
///         .build()
/// });
///
/// impl Persistable for Note {
///     fn schema() -> &'static Schema<Self> {
///         &SCHEMA
///     }
///     fn id(&self) -> Option<i64> {
///         self.id
///     }
///     fn set_id(&mut self, id: Option<i64>) {
///         self.id = id;
///     }
/// }
/// ```
pub trait Persistable: Default + Sized + 'static {
    /// The backend kind (entity-type name) this type's records group
    /// under. Defaults to the name declared on the schema.
    fn kind() -> &'static str {
        Self::schema().kind()
    }

    /// Returns the type's registered schema.
    fn schema() -> &'static Schema<Self>;

    /// Returns the identity, if this instance has been persisted.
    fn id(&self) -> Option<i64>;

    /// Sets or clears the identity. Called by the repository to
    /// back-fill backend-assigned keys.
    fn set_id(&mut self, id: Option<i64>);
}

/// The registered field descriptors of one persistable type, in
/// declaration order.
#[derive(Debug)]
pub struct Schema<T> {
    kind: &'static str,
    fields: Vec<Field<T>>,
}

impl<T> Schema<T> {
    /// Starts building a schema for the given kind.
    #[must_use]
    pub fn builder(kind: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            kind,
            fields: Vec::new(),
        }
    }

    /// Returns the backend kind name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns all field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Looks up a descriptor by domain field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Resolves a domain field name to its storage name, falling back to
    /// the input for unknown fields.
    #[must_use]
    pub fn storage_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.field(field)
            .map_or(field, |f| f.effective_storage_name())
    }
}

/// Builder for a [`Schema`]. Fields keep their insertion order.
#[derive(Debug)]
pub struct SchemaBuilder<T> {
    kind: &'static str,
    fields: Vec<Field<T>>,
}

impl<T> SchemaBuilder<T> {
    /// Appends a field descriptor.
    #[must_use]
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> Schema<T> {
        Schema {
            kind: self.kind,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        name: String,
        age: i64,
    }

    fn sample_schema() -> Schema<Sample> {
        Schema::builder("Sample")
            .field(Field::scalar(
                "name",
                |s: &Sample| s.name.clone().into(),
                |s, v| {
                    s.name = v.into_text()?;
                    Ok(())
                },
            ))
            .field(
                Field::scalar(
                    "age",
                    |s: &Sample| s.age.into(),
                    |s, v| {
                        s.age = v.into_i64()?;
                        Ok(())
                    },
                )
                .storage_name("age_years"),
            )
            .build()
    }

    #[test]
    fn fields_keep_declaration_order() {
        let schema = sample_schema();
        let names: Vec<_> = schema.fields().iter().map(Field::name).collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn field_lookup() {
        let schema = sample_schema();
        assert!(schema.field("age").is_some());
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn storage_name_resolution_falls_back() {
        let schema = sample_schema();
        assert_eq!(schema.storage_name("age"), "age_years");
        assert_eq!(schema.storage_name("name"), "name");
        assert_eq!(schema.storage_name("unknown"), "unknown");
    }
}
