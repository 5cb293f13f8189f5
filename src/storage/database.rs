//! Versioned database handle.
//!
//! Wraps a `SQLite` connection and applies the upgrade steps from
//! [`schema`](crate::storage::schema) when a database is opened with a newer
//! version than the one stored in the file.

// SQLite stores all integers as i64. Record counts are never negative.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::error::{IoError, Result, StorageError};
use crate::storage::schema::{
    self, CHECK_SCHEMA_SQL, DATABASE_NAME, GET_VERSION_SQL, SCHEMA_INFO_SQL, SET_NAME_SQL,
    SET_VERSION_SQL, STORES, StoreSchema,
};
use crate::storage::transaction::{Transaction, TransactionMode};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A named, versioned object database.
///
/// # Examples
///
/// ```no_run
/// use postdb::core::NewPost;
/// use postdb::storage::{Database, TransactionMode, POSTS_STORE};
///
/// let mut db = Database::open("blog.db", 1).unwrap();
/// let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadWrite).unwrap();
/// let id = tx.object_store(POSTS_STORE).unwrap()
///     .add(&NewPost::new("Hello", "First post"))
///     .unwrap();
/// tx.commit().unwrap();
/// assert!(id > 0);
/// ```
pub struct Database {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
    /// Version the schema is currently at.
    version: u32,
}

impl Database {
    /// Opens a database file and upgrades it to `version`.
    ///
    /// A fresh file gets every upgrade step from version 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, if an upgrade step
    /// fails, or if the file is already at a newer version.
    pub fn open<P: AsRef<Path>>(path: P, version: u32) -> Result<Self> {
        let mut db = Self::connect(path)?;
        db.upgrade(version)?;
        tracing::info!(name = DATABASE_NAME, version = db.version, "database opened");
        Ok(db)
    }

    /// Opens a database file without touching its schema.
    ///
    /// Creates the parent directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the database cannot be opened.
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;

        // WAL keeps readers working while a write transaction is open
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        let mut db = Self {
            conn,
            path: Some(path),
            version: 0,
        };
        db.version = db.stored_version()?.unwrap_or(0);
        Ok(db)
    }

    /// Creates an in-memory database at `version`.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory(version: u32) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let mut db = Self {
            conn,
            path: None,
            version: 0,
        };
        db.upgrade(version)?;
        Ok(db)
    }

    /// Brings the schema up to `version`.
    ///
    /// All pending steps run in a single transaction, so a failed step
    /// leaves the database at its previous version. A version past the last
    /// defined step is recorded as-is with the schema unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VersionMismatch`] if the stored version is
    /// newer than `version`, or [`StorageError::Migration`] if a step fails.
    pub fn upgrade(&mut self, version: u32) -> Result<()> {
        if version == 0 {
            return Err(StorageError::Migration("version must be at least 1".to_string()).into());
        }

        let stored = if self.is_initialized()? {
            self.stored_version()?.unwrap_or(0)
        } else {
            0
        };

        if stored > version {
            return Err(StorageError::VersionMismatch {
                requested: version,
                stored,
            }
            .into());
        }
        if stored == version {
            self.version = stored;
            return Ok(());
        }

        tracing::debug!(from = stored, to = version, "upgrade needed");

        let tx = self.conn.transaction().map_err(StorageError::from)?;
        tx.execute_batch(SCHEMA_INFO_SQL)
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        for step in schema::upgrade_steps(stored, version) {
            tracing::debug!(
                from = step.from_version,
                to = step.to_version,
                "applying upgrade step"
            );
            tx.execute_batch(step.sql)
                .map_err(|e| StorageError::Migration(e.to_string()))?;
        }
        tx.execute(SET_NAME_SQL, params![DATABASE_NAME])
            .map_err(StorageError::from)?;
        tx.execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from)?;
        tx.commit()
            .map_err(|e| StorageError::Migration(e.to_string()))?;

        self.version = version;
        tracing::info!(version, "database setup complete");
        Ok(())
    }

    /// Checks whether the schema bookkeeping table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot be performed.
    pub fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    /// Returns the logical database name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        DATABASE_NAME
    }

    /// Returns the schema version the database is at.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the names of the object stores present at this version.
    #[must_use]
    pub fn object_store_names(&self) -> Vec<&'static str> {
        self.stores().map(|s| s.name).collect()
    }

    /// Starts a transaction over the named stores.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::StoreNotFound`] if a name is unknown, or a
    /// database error if the transaction cannot begin.
    pub fn transaction(
        &mut self,
        stores: &[&str],
        mode: TransactionMode,
    ) -> Result<Transaction<'_>> {
        let scope = stores
            .iter()
            .map(|name| {
                self.stores()
                    .find(|s| s.name == *name)
                    .ok_or_else(|| StorageError::StoreNotFound {
                        name: (*name).to_string(),
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Transaction::begin(&mut self.conn, mode, scope)
    }

    /// Gathers per-store record counts and file size.
    ///
    /// # Errors
    ///
    /// Returns an error if a count query fails.
    pub fn stats(&self) -> Result<DatabaseStats> {
        let mut stores = Vec::new();
        for store in self.stores() {
            let record_count: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", store.name), [], |row| {
                    row.get(0)
                })
                .map_err(StorageError::from)?;

            let last_key: Option<i64> = self
                .conn
                .query_row(
                    "SELECT seq FROM sqlite_sequence WHERE name = ?",
                    params![store.name],
                    |row| row.get(0),
                )
                .optional()
                .map_err(StorageError::from)?;

            stores.push(StoreStats {
                name: store.name.to_string(),
                key_path: store.key_path.to_string(),
                auto_increment: store.auto_increment,
                indexes: store.indexes.iter().map(|i| i.name.to_string()).collect(),
                record_count: record_count as usize,
                last_key,
            });
        }

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(DatabaseStats {
            name: DATABASE_NAME.to_string(),
            version: self.version,
            stores,
            db_size,
        })
    }

    fn stores(&self) -> impl Iterator<Item = &'static StoreSchema> + '_ {
        STORES.iter().filter(|s| s.since_version <= self.version)
    }

    fn stored_version(&self) -> Result<Option<u32>> {
        if !self.is_initialized()? {
            return Ok(None);
        }
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }
}

/// Database statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseStats {
    /// Logical database name.
    pub name: String,
    /// Schema version.
    pub version: u32,
    /// Per-store details.
    pub stores: Vec<StoreStats>,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}

/// Statistics for one object store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Store name.
    pub name: String,
    /// Primary key field.
    pub key_path: String,
    /// Whether keys are generated.
    pub auto_increment: bool,
    /// Index names.
    pub indexes: Vec<String>,
    /// Number of records.
    pub record_count: usize,
    /// Highest key ever generated, if any.
    pub last_key: Option<i64>,
}
