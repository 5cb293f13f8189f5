//! Secondary index lookups.

// SQLite stores all integers as i64. Counts are never negative.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::core::Post;
use crate::error::{Result, StorageError};
use crate::storage::object_store::post_from_row;
use crate::storage::schema::IndexSchema;
use rusqlite::{Connection, OptionalExtension, params};

/// A handle to one index of a store.
///
/// Indexes are non-unique, so lookups can match several records; matches
/// come back in primary-key order.
#[derive(Debug)]
pub struct Index<'a> {
    conn: &'a Connection,
    table: &'static str,
    schema: &'static IndexSchema,
}

impl<'a> Index<'a> {
    pub(crate) const fn new(
        conn: &'a Connection,
        table: &'static str,
        schema: &'static IndexSchema,
    ) -> Self {
        Self {
            conn,
            table,
            schema,
        }
    }

    /// Returns the index name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.schema.name
    }

    /// Returns the record field the index covers.
    #[must_use]
    pub const fn key_path(&self) -> &'static str {
        self.schema.key_path
    }

    /// Whether the index enforces unique keys.
    #[must_use]
    pub const fn unique(&self) -> bool {
        self.schema.unique
    }

    /// Returns the first record (lowest primary key) whose field equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, value: &str) -> Result<Option<Post>> {
        let post = self
            .conn
            .query_row(
                &format!(
                    "SELECT id, title, content FROM {} WHERE {} = ? ORDER BY id LIMIT 1",
                    self.table, self.schema.key_path
                ),
                params![value],
                post_from_row,
            )
            .optional()
            .map_err(StorageError::from)?;
        Ok(post)
    }

    /// Returns every record whose field equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_all(&self, value: &str) -> Result<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT id, title, content FROM {} WHERE {} = ? ORDER BY id",
                self.table, self.schema.key_path
            ))
            .map_err(StorageError::from)?;

        let posts = stmt
            .query_map(params![value], post_from_row)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(posts)
    }

    /// Counts records whose field equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub fn count(&self, value: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                &format!(
                    "SELECT COUNT(*) FROM {} WHERE {} = ?",
                    self.table, self.schema.key_path
                ),
                params![value],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::NewPost;
    use crate::storage::schema::{CONTENT_INDEX, DATABASE_VERSION, POSTS_STORE, TITLE_INDEX};
    use crate::storage::{Database, TransactionMode};

    fn setup() -> Database {
        let mut db = Database::in_memory(DATABASE_VERSION).unwrap();
        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadWrite)
            .unwrap();
        {
            let store = tx.object_store(POSTS_STORE).unwrap();
            store.add(&NewPost::new("rust", "ownership")).unwrap();
            store.add(&NewPost::new("sqlite", "ownership")).unwrap();
            store.add(&NewPost::new("rust", "lifetimes")).unwrap();
        }
        tx.commit().unwrap();
        db
    }

    #[test]
    fn test_non_unique_matches() {
        let mut db = setup();
        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadOnly)
            .unwrap();
        let store = tx.object_store(POSTS_STORE).unwrap();
        let index = store.index(TITLE_INDEX).unwrap();

        assert!(!index.unique());
        assert_eq!(index.key_path(), "title");

        let posts = index.get_all("rust").unwrap();
        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(index.count("rust").unwrap(), 2);
        assert_eq!(index.get("rust").unwrap().unwrap().id, 1);
    }

    #[test]
    fn test_content_index() {
        let mut db = setup();
        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadOnly)
            .unwrap();
        let store = tx.object_store(POSTS_STORE).unwrap();
        let index = store.index(CONTENT_INDEX).unwrap();

        assert_eq!(index.name(), "content");
        assert_eq!(index.count("ownership").unwrap(), 2);
        assert_eq!(index.get_all("lifetimes").unwrap()[0].title, "rust");
    }

    #[test]
    fn test_no_match() {
        let mut db = setup();
        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadOnly)
            .unwrap();
        let store = tx.object_store(POSTS_STORE).unwrap();
        let index = store.index(TITLE_INDEX).unwrap();

        assert!(index.get("go").unwrap().is_none());
        assert!(index.get_all("go").unwrap().is_empty());
        assert_eq!(index.count("go").unwrap(), 0);
    }
}
