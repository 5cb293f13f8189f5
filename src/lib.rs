//! # postdb
//!
//! A small embedded object database for blog posts.
//!
//! postdb opens a named, versioned database (`blog`, version 1), defines a
//! `posts` object store with a generated primary key and two non-unique
//! indexes, and runs add / list / delete requests inside explicit
//! transactions.
//!
//! ## Features
//!
//! - **Versioned schema**: upgrade steps run when a database is opened with
//!   a newer version; opening with an older version is refused
//! - **Transactions**: read-only and read-write, rolled back unless committed
//! - **Cursors**: walk a store in ascending or descending key order
//! - **Indexes**: exact-match lookups on `title` and `content`
//!
//! ```
//! use postdb::core::NewPost;
//! use postdb::storage::{Database, TransactionMode, DATABASE_VERSION, POSTS_STORE};
//!
//! let mut db = Database::in_memory(DATABASE_VERSION).unwrap();
//!
//! let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadWrite).unwrap();
//! let id = tx.object_store(POSTS_STORE).unwrap()
//!     .add(&NewPost::new("Hello", "First post"))
//!     .unwrap();
//! tx.commit().unwrap();
//!
//! let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadOnly).unwrap();
//! let posts = tx.object_store(POSTS_STORE).unwrap().get_all().unwrap();
//! assert_eq!(posts[0].id, id);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod error;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use crate::core::{NewPost, Post};

// Re-export storage types
pub use storage::{
    Cursor, CursorDirection, DEFAULT_DB_PATH, Database, DatabaseStats, Index, ObjectStore,
    Transaction, TransactionMode,
};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
