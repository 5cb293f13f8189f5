//! Error types for postdb operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! object database layer, file I/O and CLI commands.

use thiserror::Error;

/// Result type alias for postdb operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage-related errors (database operations).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Errors raised by the object database.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Database has no schema yet (init command not run).
    #[error("database not initialized. Run: postdb init")]
    NotInitialized,

    /// The stored version is newer than the one requested.
    #[error("cannot open version {requested}: database is already at version {stored}")]
    VersionMismatch {
        /// Version passed to open.
        requested: u32,
        /// Version recorded in the database.
        stored: u32,
    },

    /// No object store with this name exists.
    #[error("object store not found: {name}")]
    StoreNotFound {
        /// Name of the missing store.
        name: String,
    },

    /// The store exists but was not listed when the transaction was created.
    #[error("object store {name} is not in the transaction scope")]
    StoreNotInScope {
        /// Name of the store.
        name: String,
    },

    /// No index with this name exists on the store.
    #[error("index not found: {store}.{name}")]
    IndexNotFound {
        /// Store the index was looked up on.
        store: String,
        /// Name of the missing index.
        name: String,
    },

    /// Post not found by primary key.
    #[error("post not found: {id}")]
    PostNotFound {
        /// Primary key that was not found.
        id: i64,
    },

    /// Write attempted inside a read-only transaction.
    #[error("{operation} is not allowed in a read-only transaction")]
    ReadOnly {
        /// Operation that was rejected.
        operation: &'static str,
    },

    /// Schema upgrade error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to remove a file.
    #[error("failed to remove file: {path}: {reason}")]
    RemoveFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}
