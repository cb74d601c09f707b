//! Object ↔ entity translation.

use crate::convert::ConverterRegistry;
use crate::error::{CoreError, CoreResult};
use crate::schema::{Field, FieldAccess, Persistable};
use crate::temporal;
use crate::value::{DomainValue, LongText};
use kindstore_storage::{Datastore, Entity, Key, Value};
use std::sync::Arc;

/// Translates persistable objects to backend entities and back.
///
/// The mapper walks a type's registered schema in declaration order. On
/// write it reads each field, applies the declared converter or the
/// built-in translation (relation → key, temporal → timestamp, long text
/// → unindexed long text), and places the result on the indexed or
/// unindexed path. On read it instantiates a fresh default object, sets
/// the identity from the entity key, and assigns every field back,
/// resolving relations eagerly or leaving them unloaded per their
/// laziness tag.
///
/// A failure on any field aborts the whole mapping call; the
/// partially-written instance is discarded, never returned.
pub struct EntityMapper {
    converters: Arc<ConverterRegistry>,
}

/// Resolution context handed to relation hydrators during a read.
pub struct LoadContext<'a> {
    mapper: &'a EntityMapper,
    store: &'a dyn Datastore,
}

impl LoadContext<'_> {
    /// Fetches and maps a related object by id.
    ///
    /// A dangling id (target deleted) is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the target cannot be
    /// mapped.
    pub fn load_related<R: Persistable>(&self, id: i64) -> CoreResult<Option<R>> {
        self.mapper.load_related(self.store, id)
    }
}

impl EntityMapper {
    /// Creates a mapper over the given converter registry.
    #[must_use]
    pub fn new(converters: Arc<ConverterRegistry>) -> Self {
        Self { converters }
    }

    /// Maps an object to a backend entity.
    ///
    /// An object that has never been persisted produces an entity with
    /// an incomplete key; the backend assigns the id at put. A persisted
    /// object produces an entity keyed by its existing identity.
    ///
    /// # Errors
    ///
    /// Returns a mapping or conversion error naming the offending field.
    pub fn to_entity<T: Persistable>(&self, obj: &T) -> CoreResult<Entity> {
        let schema = T::schema();
        let key = match obj.id() {
            Some(id) => Key::new(schema.kind(), id),
            None => Key::incomplete(schema.kind()),
        };

        let mut entity = Entity::new(key);
        for field in schema.fields() {
            let stored = self
                .read_field(obj, field)
                .map_err(|e| e.in_field(schema.kind(), field.name()))?;
            if field.is_indexed() {
                entity.set_property(field.effective_storage_name(), stored);
            } else {
                entity.set_unindexed_property(field.effective_storage_name(), stored);
            }
        }
        Ok(entity)
    }

    /// Maps a backend entity to a fresh object of type `T`.
    ///
    /// Relation fields resolve through `store`: eagerly fetched, or left
    /// unloaded when tagged lazy. A missing related entity resolves to
    /// an absent relation rather than failing the read.
    ///
    /// # Errors
    ///
    /// Returns a mapping or conversion error naming the offending field.
    pub fn from_entity<T: Persistable>(
        &self,
        entity: &Entity,
        store: &dyn Datastore,
    ) -> CoreResult<T> {
        let schema = T::schema();
        let mut obj = T::default();
        obj.set_id(entity.key().id());

        let cx = LoadContext {
            mapper: self,
            store,
        };
        for field in schema.fields() {
            let stored = entity
                .property(field.effective_storage_name())
                .cloned()
                .unwrap_or(Value::Null);
            match field.access() {
                FieldAccess::Scalar { set, .. } => {
                    let value = self
                        .inverse_convert(field.converter_name(), stored)
                        .map_err(|e| e.in_field(schema.kind(), field.name()))?;
                    set(&mut obj, value).map_err(|e| e.in_field(schema.kind(), field.name()))?;
                }
                FieldAccess::Relation { hydrate, .. } => {
                    let related_id = match &stored {
                        Value::Null => None,
                        Value::Key(k) => k.id(),
                        other => {
                            return Err(CoreError::mapping_in(
                                schema.kind(),
                                field.name(),
                                format!("expected key or null, got {other:?}"),
                            ))
                        }
                    };
                    hydrate(&mut obj, related_id, field.is_lazy(), &cx)
                        .map_err(|e| e.in_field(schema.kind(), field.name()))?;
                }
            }
        }
        Ok(obj)
    }

    /// Fetches and maps a related object by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the target cannot be
    /// mapped.
    pub fn load_related<R: Persistable>(
        &self,
        store: &dyn Datastore,
        id: i64,
    ) -> CoreResult<Option<R>> {
        match store.get(&Key::new(R::kind(), id))? {
            Some(entity) => Ok(Some(self.from_entity(&entity, store)?)),
            None => Ok(None),
        }
    }

    fn read_field<T: Persistable>(&self, obj: &T, field: &Field<T>) -> CoreResult<Value> {
        match field.access() {
            FieldAccess::Scalar { get, .. } => {
                let value = get(obj);
                match field.converter_name() {
                    // Converters never see nulls.
                    Some(_) if matches!(value, DomainValue::Null) => Ok(Value::Null),
                    Some(name) => self.converters.get(name)?.to_storable(&value),
                    None => Ok(domain_to_storable(value)),
                }
            }
            FieldAccess::Relation {
                key, related_kind, ..
            } => Ok(match key(obj) {
                Some(id) => Value::Key(Key::new(related_kind(), id)),
                // No resolvable identity: the relation persists as
                // omitted.
                None => Value::Null,
            }),
        }
    }

    fn inverse_convert(
        &self,
        converter: Option<&'static str>,
        stored: Value,
    ) -> CoreResult<DomainValue> {
        match converter {
            Some(_) if stored.is_null() => Ok(DomainValue::Null),
            Some(name) => self.converters.get(name)?.from_storable(&stored),
            None => storable_to_domain(stored),
        }
    }
}

impl std::fmt::Debug for EntityMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityMapper")
            .field("converters", &self.converters)
            .finish()
    }
}

fn domain_to_storable(value: DomainValue) -> Value {
    match value {
        DomainValue::Null => Value::Null,
        DomainValue::Text(s) => Value::Text(s),
        DomainValue::LongText(t) => Value::LongText(t.into_string()),
        DomainValue::Integer(n) => Value::Integer(n),
        DomainValue::Float(n) => Value::Float(n),
        DomainValue::Bool(b) => Value::Bool(b),
        DomainValue::Temporal(t) => Value::Timestamp(temporal::to_timestamp(&t)),
    }
}

fn storable_to_domain(value: Value) -> CoreResult<DomainValue> {
    match value {
        Value::Null => Ok(DomainValue::Null),
        Value::Text(s) => Ok(DomainValue::Text(s)),
        Value::LongText(s) => Ok(DomainValue::LongText(LongText(s))),
        Value::Integer(n) => Ok(DomainValue::Integer(n)),
        Value::Float(n) => Ok(DomainValue::Float(n)),
        Value::Bool(b) => Ok(DomainValue::Bool(b)),
        Value::Timestamp(ts) => Ok(DomainValue::Temporal(temporal::from_timestamp(ts))),
        Value::Key(k) => Err(CoreError::mapping(format!(
            "unexpected key value {k} on scalar field"
        ))),
    }
}
