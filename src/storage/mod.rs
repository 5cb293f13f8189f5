//! Object database layer for postdb.
//!
//! A versioned `SQLite` database exposing object stores, secondary indexes,
//! cursors and explicit read-only / read-write transactions.

pub mod cursor;
pub mod database;
pub mod index;
pub mod object_store;
pub mod schema;
pub mod transaction;

pub use cursor::{Cursor, CursorDirection};
pub use database::{Database, DatabaseStats, StoreStats};
pub use index::Index;
pub use object_store::ObjectStore;
pub use schema::{CONTENT_INDEX, DATABASE_NAME, DATABASE_VERSION, POSTS_STORE, TITLE_INDEX};
pub use transaction::{Transaction, TransactionMode};

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".postdb/blog.db";
