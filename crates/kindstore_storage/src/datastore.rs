//! Datastore trait definition.

use crate::entity::Entity;
use crate::error::StorageResult;
use crate::key::Key;
use crate::order::Order;
use std::fmt;

/// Handle to a backend transaction.
///
/// Handles are opaque tickets issued by [`Datastore::begin`] and consumed
/// by `commit` or `rollback`. A handle is valid for exactly one
/// commit/rollback; reuse is a [`crate::StorageError::UnknownTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Creates a transaction handle from its raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// The external key/value store this layer maps onto.
///
/// This is the full surface the mapping engine needs from a backend:
/// point reads, (transactional) writes and deletes, a per-kind scan with
/// optional single-property sort, and begin/commit/rollback.
///
/// # Invariants
///
/// - `put` completes an incomplete key and returns it; id assignment
///   happens at put time even inside a transaction, so callers can
///   back-fill identities before the transaction commits
/// - `get` with an absent key returns `Ok(None)`, never an error
/// - a sorted `query` only returns entities carrying an *indexed* value
///   for the sort property
/// - transactional writes become visible only after `commit`
///
/// Backends must be `Send + Sync`; all calls are synchronous and blocking.
pub trait Datastore: Send + Sync {
    /// Fetches the entity stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is incomplete or the backend fails.
    fn get(&self, key: &Key) -> StorageResult<Option<Entity>>;

    /// Writes an entity, assigning an id if its key is incomplete.
    ///
    /// Returns the completed key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn put(&self, entity: Entity) -> StorageResult<Key>;

    /// Writes an entity inside a transaction.
    ///
    /// The id is assigned immediately; the write becomes visible at commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or the backend fails.
    fn put_in(&self, txn: TransactionId, entity: Entity) -> StorageResult<Key>;

    /// Deletes the entity stored under `key`. Deleting an absent key is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is incomplete or the backend fails.
    fn delete(&self, key: &Key) -> StorageResult<()>;

    /// Deletes an entity inside a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown, the key is incomplete,
    /// or the backend fails.
    fn delete_in(&self, txn: TransactionId, key: &Key) -> StorageResult<()>;

    /// Scans all entities of one kind, optionally sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn query(&self, kind: &str, order: Option<&Order>) -> StorageResult<Vec<Entity>>;

    /// Begins a backend transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn begin(&self) -> StorageResult<TransactionId>;

    /// Commits a transaction, applying its buffered writes atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or the backend fails.
    fn commit(&self, txn: TransactionId) -> StorageResult<()>;

    /// Rolls back a transaction, discarding its buffered writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or the backend fails.
    fn rollback(&self, txn: TransactionId) -> StorageResult<()>;
}
