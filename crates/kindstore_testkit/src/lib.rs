//! # Kindstore Testkit
//!
//! Test utilities for Kindstore.
//!
//! This crate provides:
//! - Fixture domain types with registered schemas
//! - A fault-injecting datastore decorator for failure-path tests
//! - A call-counting datastore decorator for observing backend traffic
//!
//! ## Usage
//!
//! ```rust
//! use kindstore_testkit::{converter_registry, Task};
//! use kindstore_core::Repository;
//! use kindstore_storage::InMemoryDatastore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryDatastore::new());
//! let tasks: Repository<Task> = Repository::new(store, converter_registry());
//! ```

pub mod counting;
pub mod fixtures;
pub mod flaky;

pub use counting::CountingDatastore;
pub use fixtures::{converter_registry, test_repository, Country, Person, Task};
pub use flaky::FlakyDatastore;
