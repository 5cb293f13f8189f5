//! Record operations on a single object store.

use crate::core::{NewPost, Post};
use crate::error::{Result, StorageError};
use crate::storage::cursor::{Cursor, CursorDirection};
use crate::storage::index::Index;
use crate::storage::schema::StoreSchema;
use crate::storage::transaction::TransactionMode;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Maps a `(id, title, content)` row to a [`Post`].
pub(crate) fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
    })
}

/// A store handle obtained from a [`Transaction`](crate::storage::Transaction).
///
/// Every request runs inside the owning transaction and becomes durable
/// only when that transaction commits.
#[derive(Debug)]
pub struct ObjectStore<'a> {
    conn: &'a Connection,
    schema: &'static StoreSchema,
    mode: TransactionMode,
}

impl<'a> ObjectStore<'a> {
    pub(crate) const fn new(
        conn: &'a Connection,
        schema: &'static StoreSchema,
        mode: TransactionMode,
    ) -> Self {
        Self { conn, schema, mode }
    }

    /// Returns the store name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.schema.name
    }

    /// Returns the primary key field.
    #[must_use]
    pub const fn key_path(&self) -> &'static str {
        self.schema.key_path
    }

    /// Returns the names of this store's indexes.
    #[must_use]
    pub fn index_names(&self) -> Vec<&'static str> {
        self.schema.indexes.iter().map(|i| i.name).collect()
    }

    /// Inserts a post and returns the key the store generated for it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] in a read-only transaction, or a
    /// database error if the insert fails.
    pub fn add(&self, post: &NewPost) -> Result<i64> {
        self.require_writable("add")?;

        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (title, content) VALUES (?, ?)",
                    self.schema.name
                ),
                params![post.title, post.content],
            )
            .map_err(|e| self.request_failed("add", e))?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(store = self.schema.name, id, "record added");
        Ok(id)
    }

    /// Retrieves a post by primary key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<Post>> {
        let post = self
            .conn
            .query_row(
                &format!(
                    "SELECT id, title, content FROM {} WHERE id = ?",
                    self.schema.name
                ),
                params![id],
                post_from_row,
            )
            .optional()
            .map_err(StorageError::from)?;
        Ok(post)
    }

    /// Deletes the post with this primary key.
    ///
    /// Returns whether a record was removed. Deleting a key that is not
    /// present is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] in a read-only transaction, or a
    /// database error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        self.require_writable("delete")?;

        let removed = self
            .conn
            .execute(
                &format!("DELETE FROM {} WHERE id = ?", self.schema.name),
                params![id],
            )
            .map_err(|e| self.request_failed("delete", e))?;

        tracing::debug!(store = self.schema.name, id, removed, "record deleted");
        Ok(removed > 0)
    }

    /// Removes every record. Generated keys keep counting from where they were.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] in a read-only transaction, or a
    /// database error if the delete fails.
    pub fn clear(&self) -> Result<usize> {
        self.require_writable("clear")?;

        let removed = self
            .conn
            .execute(&format!("DELETE FROM {}", self.schema.name), [])
            .map_err(|e| self.request_failed("clear", e))?;

        tracing::debug!(store = self.schema.name, removed, "store cleared");
        Ok(removed)
    }

    /// Returns the number of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", self.schema.name),
                [],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;
        Ok(count as usize)
    }

    /// Returns every record in primary-key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_all(&self) -> Result<Vec<Post>> {
        self.open_cursor(CursorDirection::Next).collect()
    }

    /// Opens a cursor over the whole store.
    ///
    /// The cursor is not positioned until it is first advanced.
    #[must_use]
    pub const fn open_cursor(&self, direction: CursorDirection) -> Cursor<'a> {
        Cursor::new(self.conn, self.schema.name, direction)
    }

    /// Gets a handle to a secondary index.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::IndexNotFound`] if the store has no such index.
    pub fn index(&self, name: &str) -> Result<Index<'a>> {
        let schema = self
            .schema
            .index(name)
            .ok_or_else(|| StorageError::IndexNotFound {
                store: self.schema.name.to_string(),
                name: name.to_string(),
            })?;
        Ok(Index::new(self.conn, self.schema.name, schema))
    }

    fn require_writable(&self, operation: &'static str) -> Result<()> {
        if self.mode.is_writable() {
            Ok(())
        } else {
            tracing::error!(
                store = self.schema.name,
                operation,
                "write rejected in readonly transaction"
            );
            Err(StorageError::ReadOnly { operation }.into())
        }
    }

    fn request_failed(&self, operation: &'static str, err: rusqlite::Error) -> StorageError {
        tracing::error!(store = self.schema.name, operation, error = %err, "request failed");
        StorageError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::storage::schema::{DATABASE_VERSION, POSTS_STORE};

    fn setup() -> Database {
        Database::in_memory(DATABASE_VERSION).unwrap()
    }

    fn seed(db: &mut Database, posts: &[(&str, &str)]) -> Vec<i64> {
        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadWrite)
            .unwrap();
        let ids = {
            let store = tx.object_store(POSTS_STORE).unwrap();
            posts
                .iter()
                .map(|(t, c)| store.add(&NewPost::new(*t, *c)).unwrap())
                .collect()
        };
        tx.commit().unwrap();
        ids
    }

    #[test]
    fn test_add_and_get() {
        let mut db = setup();
        let ids = seed(&mut db, &[("Hello", "First post")]);

        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadOnly)
            .unwrap();
        let store = tx.object_store(POSTS_STORE).unwrap();
        let post = store.get(ids[0]).unwrap().unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "First post");
        assert!(store.get(ids[0] + 100).unwrap().is_none());
    }

    #[test]
    fn test_generated_keys_unique_and_increasing() {
        let mut db = setup();
        let ids = seed(&mut db, &[("a", "1"), ("b", "2"), ("c", "3")]);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_keys_not_reused_after_delete() {
        let mut db = setup();
        let ids = seed(&mut db, &[("a", ""), ("b", "")]);

        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadWrite)
            .unwrap();
        assert!(tx.object_store(POSTS_STORE).unwrap().delete(ids[1]).unwrap());
        tx.commit().unwrap();

        let next = seed(&mut db, &[("c", "")]);
        assert!(next[0] > ids[1]);
    }

    #[test]
    fn test_delete_only_target() {
        let mut db = setup();
        let ids = seed(&mut db, &[("a", ""), ("b", ""), ("c", "")]);

        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadWrite)
            .unwrap();
        let store = tx.object_store(POSTS_STORE).unwrap();
        assert!(store.delete(ids[1]).unwrap());
        assert!(!store.delete(ids[1]).unwrap());

        let remaining: Vec<i64> = store.get_all().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_readonly_rejects_writes() {
        let mut db = setup();
        let ids = seed(&mut db, &[("a", "")]);

        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadOnly)
            .unwrap();
        let store = tx.object_store(POSTS_STORE).unwrap();
        assert!(matches!(
            store.add(&NewPost::new("b", "")),
            Err(crate::Error::Storage(StorageError::ReadOnly { operation: "add" }))
        ));
        assert!(store.delete(ids[0]).is_err());
        assert!(store.clear().is_err());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_clear() {
        let mut db = setup();
        seed(&mut db, &[("a", ""), ("b", "")]);

        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadWrite)
            .unwrap();
        let store = tx.object_store(POSTS_STORE).unwrap();
        assert_eq!(store.clear().unwrap(), 2);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_index_lookup_unknown() {
        let mut db = setup();
        let tx = db
            .transaction(&[POSTS_STORE], TransactionMode::ReadOnly)
            .unwrap();
        let store = tx.object_store(POSTS_STORE).unwrap();
        assert!(store.index("title").is_ok());
        assert!(matches!(
            store.index("author"),
            Err(crate::Error::Storage(StorageError::IndexNotFound { .. }))
        ));
        assert_eq!(store.index_names(), vec!["title", "content"]);
        assert_eq!(store.key_path(), "id");
    }
}
