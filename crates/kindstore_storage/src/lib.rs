//! # Kindstore Storage
//!
//! Datastore backend trait and record types for Kindstore.
//!
//! This crate defines the storage-facing half of the system: the schemaless
//! [`Entity`] record (a key plus a map of named primitive properties), the
//! [`Datastore`] trait every real backend implements, and an
//! [`InMemoryDatastore`] reference backend.
//!
//! ## Design Principles
//!
//! - Backends store **opaque property records** - they never interpret
//!   application types, schemas, or relations
//! - All operations are synchronous, blocking calls
//! - Identity is a backend-assigned `i64` surrogate, handed out at `put`
//! - Must be `Send + Sync` for shared access behind an `Arc`
//!
//! ## Example
//!
//! ```rust
//! use kindstore_storage::{Datastore, Entity, InMemoryDatastore, Key, Value};
//!
//! let store = InMemoryDatastore::new();
//! let mut entity = Entity::new(Key::incomplete("Book"));
//! entity.set_property("title", Value::Text("Dune".into()));
//!
//! let key = store.put(entity).unwrap();
//! assert!(key.is_complete());
//! let found = store.get(&key).unwrap().unwrap();
//! assert_eq!(found.property("title"), Some(&Value::Text("Dune".into())));
//! ```

mod datastore;
mod entity;
mod error;
mod key;
mod memory;
mod order;
mod value;

pub use datastore::{Datastore, TransactionId};
pub use entity::{Entity, Property};
pub use error::{StorageError, StorageResult};
pub use key::Key;
pub use memory::InMemoryDatastore;
pub use order::{Order, SortDirection};
pub use value::Value;
