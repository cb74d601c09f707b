//! Generic CRUD repository.

use crate::config::RepositoryConfig;
use crate::convert::ConverterRegistry;
use crate::error::{CoreError, CoreResult};
use crate::mapper::EntityMapper;
use crate::page::{PageRequest, PageResult};
use crate::schema::Persistable;
use crate::transaction::TransactionManager;
use kindstore_storage::{Datastore, Entity, Key, Order, SortDirection, TransactionId};
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread;
use tracing::info;

/// CRUD façade over one persistable type.
///
/// A repository owns an [`EntityMapper`], its own single-slot
/// [`TransactionManager`], and a [`RepositoryConfig`] for batch tuning.
/// Reads always produce fresh instances; there is no identity map or
/// object cache across reads.
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(InMemoryDatastore::new());
/// let converters = Arc::new(ConverterRegistry::with_builtins());
/// let people: Repository<Person> = Repository::new(store, converters);
///
/// let mut person = Person { name: "Ann".into(), ..Person::default() };
/// people.save(&mut person)?;
/// let found = people.get(person.id.unwrap())?;
/// ```
pub struct Repository<T: Persistable> {
    store: Arc<dyn Datastore>,
    mapper: EntityMapper,
    txns: TransactionManager,
    config: RepositoryConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Persistable> Repository<T> {
    /// Creates a repository with the default batch configuration.
    #[must_use]
    pub fn new(store: Arc<dyn Datastore>, converters: Arc<ConverterRegistry>) -> Self {
        Self::with_config(store, converters, RepositoryConfig::default())
    }

    /// Creates a repository with an explicit batch configuration.
    #[must_use]
    pub fn with_config(
        store: Arc<dyn Datastore>,
        converters: Arc<ConverterRegistry>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            store: Arc::clone(&store),
            mapper: EntityMapper::new(converters),
            txns: TransactionManager::new(store),
            config,
            _marker: PhantomData,
        }
    }

    /// Returns this repository's transaction manager, for caller-managed
    /// transactions around [`Repository::save_in`] and friends.
    #[must_use]
    pub fn transactions(&self) -> &TransactionManager {
        &self.txns
    }

    /// Fetches an object by id. An absent key is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the entity cannot be
    /// mapped.
    pub fn get(&self, id: i64) -> CoreResult<Option<T>> {
        info!(kind = T::kind(), id, "get");
        match self.store.get(&Key::new(T::kind(), id))? {
            Some(entity) => Ok(Some(self.mapper.from_entity(&entity, self.store.as_ref())?)),
            None => Ok(None),
        }
    }

    /// Saves an object standalone and back-fills its assigned identity.
    ///
    /// # Errors
    ///
    /// Returns an error if mapping or the write fails.
    pub fn save(&self, obj: &mut T) -> CoreResult<()> {
        info!(kind = T::kind(), id = obj.id(), "save");
        let entity = self.mapper.to_entity(obj)?;
        let key = self.store.put(entity)?;
        obj.set_id(key.id());
        Ok(())
    }

    /// Saves an object inside a caller-supplied transaction.
    ///
    /// The identity is back-filled immediately; the write becomes
    /// visible at commit.
    ///
    /// # Errors
    ///
    /// Returns an error if mapping or the write fails.
    pub fn save_in(&self, txn: TransactionId, obj: &mut T) -> CoreResult<()> {
        let entity = self.mapper.to_entity(obj)?;
        let key = self.store.put_in(txn, entity)?;
        obj.set_id(key.id());
        Ok(())
    }

    /// Saves a batch in transactional chunks.
    ///
    /// Writes run one at a time inside a repository-managed transaction;
    /// after every `chunk_size` writes the chunk commits, the repository
    /// pauses for `chunk_pause`, and a fresh transaction opens for the
    /// remainder. The final partial chunk commits last.
    ///
    /// **Not atomic across the whole batch**: on failure only the
    /// currently open chunk rolls back; chunks already committed stay
    /// committed, and their items keep their back-filled ids.
    ///
    /// # Errors
    ///
    /// Returns the first mapping or backend error encountered.
    pub fn save_all(&self, objs: &mut [T]) -> CoreResult<()> {
        info!(kind = T::kind(), count = objs.len(), "save_all");
        if objs.is_empty() {
            return Ok(());
        }
        let result = self.save_chunks(objs);
        if result.is_err() && self.txns.is_active() {
            // Keep the original error even if the rollback itself fails.
            let _ = self.txns.rollback();
        }
        result
    }

    fn save_chunks(&self, objs: &mut [T]) -> CoreResult<()> {
        let total = objs.len();
        let mut txn = self.txns.begin()?;
        for (i, obj) in objs.iter_mut().enumerate() {
            self.save_in(txn, obj)?;
            let written = i + 1;
            if written % self.config.chunk_size == 0 && written < total {
                self.txns.commit()?;
                // Let backend contention on the entity group settle
                // before the next chunk.
                thread::sleep(self.config.chunk_pause);
                txn = self.txns.begin()?;
            }
        }
        self.txns.commit()
    }

    /// Saves a batch inside a caller-supplied transaction, unchunked.
    ///
    /// The caller assumes responsibility for the backend's
    /// per-transaction write limits.
    ///
    /// # Errors
    ///
    /// Returns the first mapping or backend error encountered.
    pub fn save_all_in(&self, txn: TransactionId, objs: &mut [T]) -> CoreResult<()> {
        for obj in objs {
            self.save_in(txn, obj)?;
        }
        Ok(())
    }

    /// Fetches all objects of this kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or an entity cannot be
    /// mapped.
    pub fn find_all(&self) -> CoreResult<Vec<T>> {
        info!(kind = T::kind(), "find_all");
        let entities = self.store.query(T::kind(), None)?;
        self.map_all(entities)
    }

    /// Fetches all objects of this kind, sorted by a field.
    ///
    /// The order names a *domain* field; it is resolved to the storage
    /// name through the schema. Only objects carrying an indexed value
    /// for the sort field appear in the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or an entity cannot be
    /// mapped.
    pub fn find_all_ordered(&self, order: &Order) -> CoreResult<Vec<T>> {
        info!(kind = T::kind(), field = order.field(), "find_all_ordered");
        let entities = self.store.query(T::kind(), Some(&self.storage_order(order)))?;
        self.map_all(entities)
    }

    /// Returns a forward iterator over all objects of this kind,
    /// mapping entities on demand.
    ///
    /// The scan is snapshot at call time; each `next` pays the mapping
    /// (and eager relation) cost for one object.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend scan fails.
    pub fn iter_all(&self) -> CoreResult<EntityIter<'_, T>> {
        info!(kind = T::kind(), "iter_all");
        let entities = self.store.query(T::kind(), None)?;
        Ok(EntityIter {
            entities: entities.into_iter(),
            mapper: &self.mapper,
            store: self.store.as_ref(),
            _marker: PhantomData,
        })
    }

    /// Fetches one page of a scan.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid cursor, backend failure, or
    /// mapping failure.
    pub fn find_page(&self, request: &PageRequest) -> CoreResult<PageResult<T>> {
        info!(kind = T::kind(), page_size = request.page_size(), "find_page");
        let offset: usize = match request.cursor() {
            None => 0,
            Some(cursor) => cursor
                .parse()
                .map_err(|_| CoreError::mapping(format!("invalid page cursor {cursor:?}")))?,
        };

        let order = request.order().map(|o| self.storage_order(o));
        let entities = self.store.query(T::kind(), order.as_ref())?;
        let total = entities.len();
        let end = total.min(offset.saturating_add(request.page_size()));

        let items = self.map_all(entities.into_iter().take(end).skip(offset).collect())?;
        let cursor = (end < total).then(|| end.to_string());
        Ok(PageResult::new(items, cursor))
    }

    /// Deletes the object stored under `id`. Deleting an absent id is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn delete(&self, id: i64) -> CoreResult<()> {
        info!(kind = T::kind(), id, "delete");
        self.store.delete(&Key::new(T::kind(), id))?;
        Ok(())
    }

    /// Deletes inside a caller-supplied transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn delete_in(&self, txn: TransactionId, id: i64) -> CoreResult<()> {
        info!(kind = T::kind(), id, "delete");
        self.store.delete_in(txn, &Key::new(T::kind(), id))?;
        Ok(())
    }

    /// Deletes an object by its identity. A never-saved object (id still
    /// unassigned) is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn delete_object(&self, obj: &T) -> CoreResult<()> {
        match obj.id() {
            Some(id) => self.delete(id),
            None => Ok(()),
        }
    }

    /// Deletes a batch of ids in a single transaction.
    ///
    /// Unlike [`Repository::save_all`], batch deletes are **not**
    /// chunked; the whole batch commits or rolls back as one
    /// transaction. Callers deleting more ids than the backend's
    /// transactional-group limit must chunk the id list themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails; the transaction is rolled
    /// back.
    pub fn delete_all(&self, ids: &[i64]) -> CoreResult<()> {
        info!(kind = T::kind(), count = ids.len(), "delete_all");
        let txn = self.txns.begin()?;
        for id in ids {
            if let Err(e) = self.store.delete_in(txn, &Key::new(T::kind(), *id)) {
                let _ = self.txns.rollback();
                return Err(e.into());
            }
        }
        self.txns.commit()
    }

    fn storage_order(&self, order: &Order) -> Order {
        let name = T::schema().storage_name(order.field());
        match order.direction() {
            SortDirection::Ascending => Order::asc(name),
            SortDirection::Descending => Order::desc(name),
        }
    }

    fn map_all(&self, entities: Vec<Entity>) -> CoreResult<Vec<T>> {
        entities
            .iter()
            .map(|e| self.mapper.from_entity(e, self.store.as_ref()))
            .collect()
    }
}

impl<T: Persistable> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("kind", &T::kind())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Forward iterator over a scan, mapping one entity per step.
///
/// Produced by [`Repository::iter_all`].
pub struct EntityIter<'a, T: Persistable> {
    entities: std::vec::IntoIter<Entity>,
    mapper: &'a EntityMapper,
    store: &'a dyn Datastore,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Persistable> Iterator for EntityIter<'_, T> {
    type Item = CoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entities
            .next()
            .map(|e| self.mapper.from_entity(&e, self.store))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entities.size_hint()
    }
}
