//! Fault-injecting datastore decorator.

use kindstore_storage::{
    Datastore, Entity, Key, Order, StorageError, StorageResult, TransactionId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Wraps a datastore and fails operations after a configured count.
///
/// With `fail_puts_after(n)`, the first `n` writes succeed and every
/// write after that returns a backend error; likewise for reads with
/// `fail_gets_after`. Drives the chunked-batch failure property and the
/// relation load-failure path.
pub struct FlakyDatastore {
    inner: Arc<dyn Datastore>,
    fail_puts_after: Option<usize>,
    fail_gets_after: Option<usize>,
    puts: AtomicUsize,
    gets: AtomicUsize,
}

impl FlakyDatastore {
    /// Wraps the given datastore with no failures configured.
    #[must_use]
    pub fn new(inner: Arc<dyn Datastore>) -> Self {
        Self {
            inner,
            fail_puts_after: None,
            fail_gets_after: None,
            puts: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
        }
    }

    /// Fails every write after the first `count` writes.
    #[must_use]
    pub fn fail_puts_after(mut self, count: usize) -> Self {
        self.fail_puts_after = Some(count);
        self
    }

    /// Fails every read after the first `count` reads.
    #[must_use]
    pub fn fail_gets_after(mut self, count: usize) -> Self {
        self.fail_gets_after = Some(count);
        self
    }

    /// Number of writes attempted, including failed ones.
    #[must_use]
    pub fn put_attempts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn check(counter: &AtomicUsize, limit: Option<usize>, what: &str) -> StorageResult<()> {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        match limit {
            Some(limit) if attempt > limit => Err(StorageError::backend(format!(
                "injected {what} failure on attempt {attempt}"
            ))),
            _ => Ok(()),
        }
    }
}

impl Datastore for FlakyDatastore {
    fn get(&self, key: &Key) -> StorageResult<Option<Entity>> {
        Self::check(&self.gets, self.fail_gets_after, "get")?;
        self.inner.get(key)
    }

    fn put(&self, entity: Entity) -> StorageResult<Key> {
        Self::check(&self.puts, self.fail_puts_after, "put")?;
        self.inner.put(entity)
    }

    fn put_in(&self, txn: TransactionId, entity: Entity) -> StorageResult<Key> {
        Self::check(&self.puts, self.fail_puts_after, "put")?;
        self.inner.put_in(txn, entity)
    }

    fn delete(&self, key: &Key) -> StorageResult<()> {
        self.inner.delete(key)
    }

    fn delete_in(&self, txn: TransactionId, key: &Key) -> StorageResult<()> {
        self.inner.delete_in(txn, key)
    }

    fn query(&self, kind: &str, order: Option<&Order>) -> StorageResult<Vec<Entity>> {
        self.inner.query(kind, order)
    }

    fn begin(&self) -> StorageResult<TransactionId> {
        self.inner.begin()
    }

    fn commit(&self, txn: TransactionId) -> StorageResult<()> {
        self.inner.commit(txn)
    }

    fn rollback(&self, txn: TransactionId) -> StorageResult<()> {
        self.inner.rollback(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindstore_storage::InMemoryDatastore;

    #[test]
    fn puts_fail_after_limit() {
        let store =
            FlakyDatastore::new(Arc::new(InMemoryDatastore::new())).fail_puts_after(2);

        assert!(store.put(Entity::new(Key::incomplete("A"))).is_ok());
        assert!(store.put(Entity::new(Key::incomplete("A"))).is_ok());
        assert!(store.put(Entity::new(Key::incomplete("A"))).is_err());
        assert_eq!(store.put_attempts(), 3);
    }

    #[test]
    fn gets_fail_after_limit() {
        let store =
            FlakyDatastore::new(Arc::new(InMemoryDatastore::new())).fail_gets_after(0);
        assert!(store.get(&Key::new("A", 1)).is_err());
    }

    #[test]
    fn unconfigured_decorator_is_transparent() {
        let store = FlakyDatastore::new(Arc::new(InMemoryDatastore::new()));
        let key = store.put(Entity::new(Key::incomplete("A"))).unwrap();
        assert!(store.get(&key).unwrap().is_some());
    }
}
