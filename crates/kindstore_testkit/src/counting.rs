//! Call-counting datastore decorator.

use kindstore_storage::{
    Datastore, Entity, Key, Order, StorageResult, TransactionId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Wraps a datastore and counts every call through it.
///
/// Used to observe backend traffic: which operations a mapping or
/// repository call actually performed, and how many times. The counts
/// drive the lazy-versus-eager relation assertions.
pub struct CountingDatastore {
    inner: Arc<dyn Datastore>,
    gets: AtomicUsize,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    queries: AtomicUsize,
    begins: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl CountingDatastore {
    /// Wraps the given datastore.
    #[must_use]
    pub fn new(inner: Arc<dyn Datastore>) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
            begins: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
        }
    }

    /// Number of `get` calls.
    #[must_use]
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `put` and `put_in` calls.
    #[must_use]
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of `delete` and `delete_in` calls.
    #[must_use]
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Number of `query` calls.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of `begin` calls.
    #[must_use]
    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    /// Number of `commit` calls.
    #[must_use]
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of `rollback` calls.
    #[must_use]
    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

impl Datastore for CountingDatastore {
    fn get(&self, key: &Key) -> StorageResult<Option<Entity>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn put(&self, entity: Entity) -> StorageResult<Key> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(entity)
    }

    fn put_in(&self, txn: TransactionId, entity: Entity) -> StorageResult<Key> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_in(txn, entity)
    }

    fn delete(&self, key: &Key) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key)
    }

    fn delete_in(&self, txn: TransactionId, key: &Key) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_in(txn, key)
    }

    fn query(&self, kind: &str, order: Option<&Order>) -> StorageResult<Vec<Entity>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(kind, order)
    }

    fn begin(&self) -> StorageResult<TransactionId> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        self.inner.begin()
    }

    fn commit(&self, txn: TransactionId) -> StorageResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit(txn)
    }

    fn rollback(&self, txn: TransactionId) -> StorageResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.inner.rollback(txn)
    }
}
