//! Transactions over object stores.
//!
//! A [`Transaction`] is scoped to a fixed set of stores and a mode. It is
//! committed explicitly; dropping it without a commit rolls back every
//! request made through it.

use crate::error::{Result, StorageError};
use crate::storage::object_store::ObjectStore;
use crate::storage::schema::StoreSchema;
use rusqlite::{Connection, TransactionBehavior};
use std::fmt;

/// Access mode of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionMode {
    /// Reads only; write requests are rejected.
    #[default]
    ReadOnly,
    /// Reads and writes.
    ReadWrite,
}

impl TransactionMode {
    /// True for [`TransactionMode::ReadWrite`].
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }

    const fn behavior(self) -> TransactionBehavior {
        match self {
            Self::ReadOnly => TransactionBehavior::Deferred,
            // Take the write lock up front so the first write cannot hit SQLITE_BUSY
            Self::ReadWrite => TransactionBehavior::Immediate,
        }
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => f.write_str("readonly"),
            Self::ReadWrite => f.write_str("readwrite"),
        }
    }
}

/// An open transaction.
pub struct Transaction<'db> {
    tx: rusqlite::Transaction<'db>,
    mode: TransactionMode,
    scope: Vec<&'static StoreSchema>,
}

impl<'db> Transaction<'db> {
    pub(crate) fn begin(
        conn: &'db mut Connection,
        mode: TransactionMode,
        scope: Vec<&'static StoreSchema>,
    ) -> Result<Self> {
        let tx = conn
            .transaction_with_behavior(mode.behavior())
            .map_err(|e| StorageError::Transaction(e.to_string()))?;
        tracing::debug!(%mode, stores = scope.len(), "transaction started");
        Ok(Self { tx, mode, scope })
    }

    /// Returns the transaction mode.
    #[must_use]
    pub const fn mode(&self) -> TransactionMode {
        self.mode
    }

    /// Returns the names of the stores in scope.
    #[must_use]
    pub fn store_names(&self) -> Vec<&'static str> {
        self.scope.iter().map(|s| s.name).collect()
    }

    /// Gets a handle to a store in this transaction's scope.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::StoreNotInScope`] if the store was not named
    /// when the transaction was created.
    pub fn object_store(&self, name: &str) -> Result<ObjectStore<'_>> {
        let schema = self
            .scope
            .iter()
            .copied()
            .find(|s| s.name == name)
            .ok_or_else(|| StorageError::StoreNotInScope {
                name: name.to_string(),
            })?;
        Ok(ObjectStore::new(&self.tx, schema, self.mode))
    }

    /// Commits every request made in this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails; nothing
    /// from this transaction is persisted in that case.
    pub fn commit(self) -> Result<()> {
        let mode = self.mode;
        match self.tx.commit() {
            Ok(()) => {
                tracing::info!(%mode, "transaction completed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(%mode, error = %e, "transaction failed");
                Err(StorageError::Transaction(e.to_string()).into())
            }
        }
    }

    /// Discards every request made in this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    pub fn abort(self) -> Result<()> {
        let mode = self.mode;
        self.tx
            .rollback()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;
        tracing::debug!(%mode, "transaction aborted");
        Ok(())
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("mode", &self.mode)
            .field("stores", &self.store_names())
            .finish()
    }
}
