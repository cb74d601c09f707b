//! # Kindstore Core
//!
//! Entity mapping and transactional persistence engine for Kindstore.
//!
//! This crate translates typed application objects into schemaless
//! key/value entities and back, on top of any
//! [`kindstore_storage::Datastore`] backend. It provides:
//!
//! - Explicit per-type [`Schema`]s describing persistable fields
//! - A [`ConverterRegistry`] for pluggable per-field value conversion
//! - The [`EntityMapper`] driving the object ↔ entity translation
//! - [`Relation`] cells for eager and deferred cross-entity references
//! - A single-slot [`TransactionManager`]
//! - A generic [`Repository`] with chunked batch writes sized to the
//!   backend's transactional-group limit
//!
//! ## Example
//!
//! ```rust
//! use kindstore_core::{
//!     ConverterRegistry, Field, Persistable, Repository, Schema,
//! };
//! use kindstore_storage::InMemoryDatastore;
//! use std::sync::{Arc, LazyLock};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Book {
//!     id: Option<i64>,
//!     title: String,
//! }
//!
//! static SCHEMA: LazyLock<Schema<Book>> = LazyLock::new(|| {
//!     Schema::builder("Book")
//!         .field(Field::scalar(
//!             "title",
//!             |b: &Book| b.title.clone().into(),
//!             |b, v| {
//!                 b.title = v.into_text()?;
//!                 Ok(())
//!             },
//!         ))
//!         .build()
//! });
//!
//! impl Persistable for Book {
//!     fn schema() -> &'static Schema<Self> {
//!         &SCHEMA
//!     }
//!     fn id(&self) -> Option<i64> {
//!         self.id
//!     }
//!     fn set_id(&mut self, id: Option<i64>) {
//!         self.id = id;
//!     }
//! }
//!
//! # fn main() -> Result<(), kindstore_core::CoreError> {
//! let store = Arc::new(InMemoryDatastore::new());
//! let converters = Arc::new(ConverterRegistry::with_builtins());
//! let books: Repository<Book> = Repository::new(store, converters);
//!
//! let mut book = Book { id: None, title: "Dune".into() };
//! books.save(&mut book)?;
//! assert!(book.id.is_some());
//!
//! let found = books.get(book.id.unwrap())?.unwrap();
//! assert_eq!(found.title, "Dune");
//! # Ok(())
//! # }
//! ```

mod config;
mod convert;
mod error;
mod mapper;
mod page;
mod relation;
mod repository;
mod schema;
pub mod temporal;
mod transaction;
mod value;

pub use config::RepositoryConfig;
pub use convert::{ConverterFactory, ConverterRegistry, FieldConverter, TextToFloatConverter, TEXT_TO_FLOAT};
pub use error::{CoreError, CoreResult};
pub use mapper::{EntityMapper, LoadContext};
pub use page::{PageRequest, PageResult};
pub use relation::Relation;
pub use repository::{EntityIter, Repository};
pub use schema::{Field, FieldAccess, GetFn, KeyFn, Persistable, Schema, SchemaBuilder, SetFn};
pub use transaction::TransactionManager;
pub use value::{DomainValue, LongText, TemporalValue};

// Storage surface re-exported for convenience.
pub use kindstore_storage::{
    Datastore, Entity, InMemoryDatastore, Key, Order, Property, SortDirection, StorageError,
    TransactionId, Value,
};
