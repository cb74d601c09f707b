//! Field converters and their registry.

use crate::error::{CoreError, CoreResult};
use crate::value::DomainValue;
use kindstore_storage::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Converts a field between its domain representation and a storable
/// primitive.
///
/// Converters are declared per field by name
/// ([`crate::Field::converter`]) and resolved through the
/// [`ConverterRegistry`] at mapping time. A converter never sees `Null`:
/// absent values bypass conversion in both directions.
pub trait FieldConverter: std::fmt::Debug + Send + Sync {
    /// Converts a domain value to its storable form.
    ///
    /// # Errors
    ///
    /// Returns a conversion error when the value cannot be represented.
    fn to_storable(&self, value: &DomainValue) -> CoreResult<Value>;

    /// Converts a stored value back to its domain form.
    ///
    /// # Errors
    ///
    /// Returns a conversion error when the value cannot be read back.
    fn from_storable(&self, value: &Value) -> CoreResult<DomainValue>;
}

/// Factory producing a converter instance.
pub type ConverterFactory = fn() -> Box<dyn FieldConverter>;

/// Named registry of field converters.
///
/// Converters are registered as factories and instantiated on first
/// lookup; the instance is cached under its name for the registry's
/// lifetime. Construct one at startup and share it behind an `Arc`
/// between repositories and mappers.
#[derive(Default)]
pub struct ConverterRegistry {
    factories: RwLock<HashMap<&'static str, ConverterFactory>>,
    instances: RwLock<HashMap<&'static str, Arc<dyn FieldConverter>>>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in converters registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(TEXT_TO_FLOAT, || Box::new(TextToFloatConverter));
        registry
    }

    /// Registers a converter factory under a name.
    ///
    /// Re-registering a name replaces the factory for future first
    /// lookups but does not evict an already-built instance.
    pub fn register(&self, name: &'static str, factory: ConverterFactory) {
        self.factories.write().insert(name, factory);
    }

    /// Resolves a converter by name, instantiating it on first use.
    ///
    /// # Errors
    ///
    /// Returns a mapping error when no converter is registered under
    /// `name`.
    pub fn get(&self, name: &str) -> CoreResult<Arc<dyn FieldConverter>> {
        if let Some(instance) = self.instances.read().get(name) {
            return Ok(Arc::clone(instance));
        }

        let factory = {
            let factories = self.factories.read();
            match factories.get_key_value(name) {
                Some((key, factory)) => (*key, *factory),
                None => {
                    return Err(CoreError::mapping(format!(
                        "no converter registered under {name:?}"
                    )))
                }
            }
        };

        // A racing first lookup may build a second instance; the map
        // keeps whichever lands last.
        let instance: Arc<dyn FieldConverter> = Arc::from(factory.1());
        self.instances.write().insert(factory.0, Arc::clone(&instance));
        Ok(instance)
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("registered", &self.factories.read().len())
            .field("instantiated", &self.instances.read().len())
            .finish()
    }
}

/// Registry name of [`TextToFloatConverter`].
pub const TEXT_TO_FLOAT: &str = "text-to-float";

/// Built-in converter storing numeric text as a float.
///
/// Malformed numeric text is the canonical conversion failure: it
/// surfaces as a [`CoreError::Conversion`] carrying the offending text.
#[derive(Debug, Clone, Copy)]
pub struct TextToFloatConverter;

impl FieldConverter for TextToFloatConverter {
    fn to_storable(&self, value: &DomainValue) -> CoreResult<Value> {
        match value {
            DomainValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| CoreError::conversion(s.clone(), "float", e.to_string())),
            other => Err(CoreError::conversion(
                format!("{other:?}"),
                "float",
                "expected text",
            )),
        }
    }

    fn from_storable(&self, value: &Value) -> CoreResult<DomainValue> {
        match value {
            Value::Float(n) => Ok(DomainValue::Text(n.to_string())),
            other => Err(CoreError::conversion(
                format!("{other:?}"),
                "text",
                "expected float",
            )),
        }
    }
}
