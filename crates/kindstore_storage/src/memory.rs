//! In-memory datastore backend.

use crate::datastore::{Datastore, TransactionId};
use crate::entity::Entity;
use crate::error::{StorageError, StorageResult};
use crate::key::Key;
use crate::order::{Order, SortDirection};
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

enum TxnOp {
    Put(Entity),
    Delete(Key),
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, BTreeMap<i64, Entity>>,
    counters: HashMap<String, i64>,
    txns: HashMap<u64, Vec<TxnOp>>,
    next_txn: u64,
}

/// An in-memory datastore.
///
/// Suitable for unit tests, integration tests, and ephemeral embedding.
/// Entities live in per-kind tables keyed by id; ids are assigned from a
/// per-kind monotone counter starting at 1. Transactional writes are
/// buffered and applied atomically at commit.
///
/// # Thread Safety
///
/// Thread-safe; can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use kindstore_storage::{Datastore, Entity, InMemoryDatastore, Key, Value};
///
/// let store = InMemoryDatastore::new();
/// let mut e = Entity::new(Key::incomplete("Note"));
/// e.set_property("text", Value::Text("hi".into()));
/// let key = store.put(e).unwrap();
/// assert_eq!(key.id(), Some(1));
/// ```
#[derive(Default)]
pub struct InMemoryDatastore {
    inner: RwLock<Inner>,
}

impl InMemoryDatastore {
    /// Creates a new empty in-memory datastore.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entities of one kind.
    #[must_use]
    pub fn count(&self, kind: &str) -> usize {
        self.inner
            .read()
            .tables
            .get(kind)
            .map_or(0, BTreeMap::len)
    }

    fn complete_key(inner: &mut Inner, key: &Key) -> Key {
        match key.id() {
            Some(_) => key.clone(),
            None => {
                let counter = inner.counters.entry(key.kind().to_string()).or_insert(0);
                *counter += 1;
                key.with_id(*counter)
            }
        }
    }

    fn apply(inner: &mut Inner, op: TxnOp) {
        match op {
            TxnOp::Put(entity) => {
                // Keys buffered by put_in are always complete.
                if let Some(id) = entity.key().id() {
                    inner
                        .tables
                        .entry(entity.key().kind().to_string())
                        .or_default()
                        .insert(id, entity);
                }
            }
            TxnOp::Delete(key) => {
                if let (Some(table), Some(id)) = (inner.tables.get_mut(key.kind()), key.id()) {
                    table.remove(&id);
                }
            }
        }
    }

    fn require_id(key: &Key) -> StorageResult<i64> {
        key.id()
            .ok_or_else(|| StorageError::incomplete_key(key.kind()))
    }
}

impl Datastore for InMemoryDatastore {
    fn get(&self, key: &Key) -> StorageResult<Option<Entity>> {
        let id = Self::require_id(key)?;
        let inner = self.inner.read();
        Ok(inner
            .tables
            .get(key.kind())
            .and_then(|table| table.get(&id))
            .cloned())
    }

    fn put(&self, mut entity: Entity) -> StorageResult<Key> {
        let mut inner = self.inner.write();
        let key = Self::complete_key(&mut inner, entity.key());
        entity.set_key(key.clone());
        Self::apply(&mut inner, TxnOp::Put(entity));
        Ok(key)
    }

    fn put_in(&self, txn: TransactionId, mut entity: Entity) -> StorageResult<Key> {
        let mut inner = self.inner.write();
        if !inner.txns.contains_key(&txn.as_u64()) {
            return Err(StorageError::unknown_transaction(txn.as_u64()));
        }
        let key = Self::complete_key(&mut inner, entity.key());
        entity.set_key(key.clone());
        if let Some(ops) = inner.txns.get_mut(&txn.as_u64()) {
            ops.push(TxnOp::Put(entity));
        }
        Ok(key)
    }

    fn delete(&self, key: &Key) -> StorageResult<()> {
        Self::require_id(key)?;
        let mut inner = self.inner.write();
        Self::apply(&mut inner, TxnOp::Delete(key.clone()));
        Ok(())
    }

    fn delete_in(&self, txn: TransactionId, key: &Key) -> StorageResult<()> {
        Self::require_id(key)?;
        let mut inner = self.inner.write();
        let ops = inner
            .txns
            .get_mut(&txn.as_u64())
            .ok_or_else(|| StorageError::unknown_transaction(txn.as_u64()))?;
        ops.push(TxnOp::Delete(key.clone()));
        Ok(())
    }

    fn query(&self, kind: &str, order: Option<&Order>) -> StorageResult<Vec<Entity>> {
        let inner = self.inner.read();
        let mut entities: Vec<Entity> = inner
            .tables
            .get(kind)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default();

        if let Some(order) = order {
            // Index-backed sort: entities without an indexed value for the
            // sort property do not appear in the result at all.
            entities.retain(|e| e.property_record(order.field()).is_some_and(|p| p.indexed));
            entities.sort_by(|a, b| {
                let va = a.property(order.field()).unwrap_or(&Value::Null);
                let vb = b.property(order.field()).unwrap_or(&Value::Null);
                let cmp = va.sort_cmp(vb);
                match order.direction() {
                    SortDirection::Ascending => cmp,
                    SortDirection::Descending => cmp.reverse(),
                }
            });
        }

        Ok(entities)
    }

    fn begin(&self) -> StorageResult<TransactionId> {
        let mut inner = self.inner.write();
        inner.next_txn += 1;
        let id = inner.next_txn;
        inner.txns.insert(id, Vec::new());
        Ok(TransactionId::new(id))
    }

    fn commit(&self, txn: TransactionId) -> StorageResult<()> {
        let mut inner = self.inner.write();
        let ops = inner
            .txns
            .remove(&txn.as_u64())
            .ok_or_else(|| StorageError::unknown_transaction(txn.as_u64()))?;
        for op in ops {
            Self::apply(&mut inner, op);
        }
        Ok(())
    }

    fn rollback(&self, txn: TransactionId) -> StorageResult<()> {
        let mut inner = self.inner.write();
        inner
            .txns
            .remove(&txn.as_u64())
            .ok_or_else(|| StorageError::unknown_transaction(txn.as_u64()))?;
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryDatastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("InMemoryDatastore")
            .field("kinds", &inner.tables.len())
            .field("open_txns", &inner.txns.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn entity(kind: &str) -> Entity {
        Entity::new(Key::incomplete(kind))
    }

    #[test]
    fn put_assigns_monotone_ids_per_kind() {
        let store = InMemoryDatastore::new();
        let k1 = store.put(entity("A")).unwrap();
        let k2 = store.put(entity("A")).unwrap();
        let k3 = store.put(entity("B")).unwrap();

        assert_eq!(k1.id(), Some(1));
        assert_eq!(k2.id(), Some(2));
        assert_eq!(k3.id(), Some(1));
    }

    #[test]
    fn put_with_explicit_key_overwrites() {
        let store = InMemoryDatastore::new();
        let key = store.put(entity("A")).unwrap();

        let mut updated = Entity::new(key.clone());
        updated.set_property("v", Value::Integer(2));
        store.put(updated).unwrap();

        let found = store.get(&key).unwrap().unwrap();
        assert_eq!(found.property("v"), Some(&Value::Integer(2)));
        assert_eq!(store.count("A"), 1);
    }

    #[test]
    fn get_absent_is_none() {
        let store = InMemoryDatastore::new();
        assert!(store.get(&Key::new("A", 99)).unwrap().is_none());
    }

    #[test]
    fn get_incomplete_key_is_error() {
        let store = InMemoryDatastore::new();
        let result = store.get(&Key::incomplete("A"));
        assert!(matches!(result, Err(StorageError::IncompleteKey { .. })));
    }

    #[test]
    fn delete_removes() {
        let store = InMemoryDatastore::new();
        let key = store.put(entity("A")).unwrap();
        store.delete(&key).unwrap();
        assert!(store.get(&key).unwrap().is_none());
        // Deleting again is fine.
        store.delete(&key).unwrap();
    }

    #[test]
    fn transactional_put_visible_only_after_commit() {
        let store = InMemoryDatastore::new();
        let txn = store.begin().unwrap();
        let key = store.put_in(txn, entity("A")).unwrap();

        assert!(key.is_complete());
        assert!(store.get(&key).unwrap().is_none());

        store.commit(txn).unwrap();
        assert!(store.get(&key).unwrap().is_some());
    }

    #[test]
    fn rollback_discards_buffered_writes() {
        let store = InMemoryDatastore::new();
        let txn = store.begin().unwrap();
        let key = store.put_in(txn, entity("A")).unwrap();

        store.rollback(txn).unwrap();
        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn commit_unknown_transaction_is_error() {
        let store = InMemoryDatastore::new();
        let result = store.commit(TransactionId::new(42));
        assert!(matches!(
            result,
            Err(StorageError::UnknownTransaction { id: 42 })
        ));
    }

    #[test]
    fn transactional_delete_applies_at_commit() {
        let store = InMemoryDatastore::new();
        let key = store.put(entity("A")).unwrap();

        let txn = store.begin().unwrap();
        store.delete_in(txn, &key).unwrap();
        assert!(store.get(&key).unwrap().is_some());

        store.commit(txn).unwrap();
        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn query_unsorted_returns_all() {
        let store = InMemoryDatastore::new();
        for _ in 0..3 {
            store.put(entity("A")).unwrap();
        }
        assert_eq!(store.query("A", None).unwrap().len(), 3);
        assert!(store.query("B", None).unwrap().is_empty());
    }

    #[test]
    fn sorted_query_orders_by_property() {
        let store = InMemoryDatastore::new();
        for n in [3i64, 1, 2] {
            let mut e = entity("A");
            e.set_property("n", Value::Integer(n));
            store.put(e).unwrap();
        }

        let asc = store.query("A", Some(&Order::asc("n"))).unwrap();
        let values: Vec<_> = asc.iter().map(|e| e.property("n").cloned()).collect();
        assert_eq!(
            values,
            vec![
                Some(Value::Integer(1)),
                Some(Value::Integer(2)),
                Some(Value::Integer(3))
            ]
        );

        let desc = store.query("A", Some(&Order::desc("n"))).unwrap();
        assert_eq!(desc[0].property("n"), Some(&Value::Integer(3)));
    }

    #[test]
    fn sorted_query_excludes_unindexed_and_missing() {
        let store = InMemoryDatastore::new();

        let mut indexed = entity("A");
        indexed.set_property("n", Value::Integer(1));
        store.put(indexed).unwrap();

        let mut unindexed = entity("A");
        unindexed.set_unindexed_property("n", Value::Integer(2));
        store.put(unindexed).unwrap();

        store.put(entity("A")).unwrap();

        let sorted = store.query("A", Some(&Order::asc("n"))).unwrap();
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].property("n"), Some(&Value::Integer(1)));

        // The unsorted scan still sees everything.
        assert_eq!(store.query("A", None).unwrap().len(), 3);
    }
}
