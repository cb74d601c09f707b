//! Single-slot transaction management.

use crate::error::{CoreError, CoreResult};
use kindstore_storage::{Datastore, TransactionId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Owns at most one active backend transaction.
///
/// The manager is a guard over the backend's begin/commit/rollback:
/// beginning while a transaction is already open is a programming error
/// and fails fast with [`CoreError::TransactionOpen`]; committing or
/// rolling back while idle is a no-op. Nested and concurrent
/// transactions are deliberately unsupported by this layer.
pub struct TransactionManager {
    store: Arc<dyn Datastore>,
    current: Mutex<Option<TransactionId>>,
}

impl TransactionManager {
    /// Creates a manager over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self {
            store,
            current: Mutex::new(None),
        }
    }

    /// Begins a backend transaction and occupies the slot.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TransactionOpen`] if a transaction is
    /// already active, or the backend's error if begin fails.
    pub fn begin(&self) -> CoreResult<TransactionId> {
        let mut slot = self.current.lock();
        if slot.is_some() {
            return Err(CoreError::TransactionOpen);
        }
        let txn = self.store.begin()?;
        *slot = Some(txn);
        Ok(txn)
    }

    /// Commits the active transaction, if any, and frees the slot.
    ///
    /// The slot is freed even when the commit itself fails; a failed
    /// commit leaves nothing to roll back.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the commit fails.
    pub fn commit(&self) -> CoreResult<()> {
        let taken = self.current.lock().take();
        if let Some(txn) = taken {
            self.store.commit(txn)?;
        }
        Ok(())
    }

    /// Rolls back the active transaction, if any, and frees the slot.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the rollback fails.
    pub fn rollback(&self) -> CoreResult<()> {
        let taken = self.current.lock().take();
        if let Some(txn) = taken {
            self.store.rollback(txn)?;
        }
        Ok(())
    }

    /// Returns `true` while a transaction is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Returns the active transaction handle, if any.
    #[must_use]
    pub fn current(&self) -> Option<TransactionId> {
        *self.current.lock()
    }
}

impl std::fmt::Debug for TransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
