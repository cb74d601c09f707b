//! The schemaless entity record.

use crate::key::Key;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named property: a stored value plus its indexing flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// The stored value.
    pub value: Value,
    /// Whether the backend indexes this property for queries.
    pub indexed: bool,
}

/// A schemaless key/value record as seen by the backend.
///
/// An entity is a [`Key`] plus a map of storage-name → [`Property`].
/// Properties are either indexed (the default, visible to sorted queries)
/// or unindexed (stored but invisible to sorts and filters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    key: Key,
    properties: BTreeMap<String, Property>,
}

impl Entity {
    /// Creates an empty entity with the given key.
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key,
            properties: BTreeMap::new(),
        }
    }

    /// Returns the entity key.
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Replaces the entity key.
    pub fn set_key(&mut self, key: Key) {
        self.key = key;
    }

    /// Sets an indexed property.
    ///
    /// `LongText` values are unindexable by nature and are stored
    /// unindexed no matter which setter is used.
    pub fn set_property(&mut self, name: impl Into<String>, value: Value) {
        let indexed = !matches!(value, Value::LongText(_));
        self.properties
            .insert(name.into(), Property { value, indexed });
    }

    /// Sets an unindexed property.
    pub fn set_unindexed_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(
            name.into(),
            Property {
                value,
                indexed: false,
            },
        );
    }

    /// Returns the value of a property, if present.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).map(|p| &p.value)
    }

    /// Returns the full property record, including the indexing flag.
    #[must_use]
    pub fn property_record(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Iterates over all properties in storage-name order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the entity has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_property() {
        let mut entity = Entity::new(Key::incomplete("Book"));
        entity.set_property("title", Value::Text("Dune".into()));

        assert_eq!(entity.property("title"), Some(&Value::Text("Dune".into())));
        assert_eq!(entity.property("missing"), None);
        assert!(entity.property_record("title").unwrap().indexed);
    }

    #[test]
    fn unindexed_property() {
        let mut entity = Entity::new(Key::incomplete("Book"));
        entity.set_unindexed_property("notes", Value::Text("draft".into()));

        assert!(!entity.property_record("notes").unwrap().indexed);
    }

    #[test]
    fn long_text_is_never_indexed() {
        let mut entity = Entity::new(Key::incomplete("Book"));
        entity.set_property("body", Value::LongText("x".repeat(4096)));

        assert!(!entity.property_record("body").unwrap().indexed);
    }

    #[test]
    fn set_overwrites() {
        let mut entity = Entity::new(Key::incomplete("Book"));
        entity.set_property("n", Value::Integer(1));
        entity.set_property("n", Value::Integer(2));

        assert_eq!(entity.len(), 1);
        assert_eq!(entity.property("n"), Some(&Value::Integer(2)));
    }
}
