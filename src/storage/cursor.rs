//! Sequential iteration over a store in primary-key order.

use crate::core::Post;
use crate::error::{Result, StorageError};
use crate::storage::object_store::post_from_row;
use rusqlite::{Connection, OptionalExtension, params};

/// Order in which a cursor visits keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorDirection {
    /// Ascending keys.
    #[default]
    Next,
    /// Descending keys.
    Prev,
}

/// A cursor over every record of a store.
///
/// Each step seeks to the first key past the one last visited, so the
/// cursor never holds a statement open and sees deletes made through the
/// same transaction while it is walking.
///
/// # Examples
///
/// ```
/// use postdb::core::NewPost;
/// use postdb::storage::{CursorDirection, Database, TransactionMode, POSTS_STORE};
///
/// let mut db = Database::in_memory(1).unwrap();
/// let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadWrite).unwrap();
/// let store = tx.object_store(POSTS_STORE).unwrap();
/// store.add(&NewPost::new("a", "1")).unwrap();
/// store.add(&NewPost::new("b", "2")).unwrap();
///
/// let mut cursor = store.open_cursor(CursorDirection::Next);
/// while let Some(post) = cursor.advance().unwrap() {
///     assert!(!post.title.is_empty());
/// }
/// assert!(cursor.value().is_none());
/// ```
#[derive(Debug)]
pub struct Cursor<'a> {
    conn: &'a Connection,
    table: &'static str,
    direction: CursorDirection,
    last_key: Option<i64>,
    current: Option<Post>,
    done: bool,
}

impl<'a> Cursor<'a> {
    pub(crate) const fn new(
        conn: &'a Connection,
        table: &'static str,
        direction: CursorDirection,
    ) -> Self {
        Self {
            conn,
            table,
            direction,
            last_key: None,
            current: None,
            done: false,
        }
    }

    /// Returns the direction this cursor walks in.
    #[must_use]
    pub const fn direction(&self) -> CursorDirection {
        self.direction
    }

    /// Returns the record the cursor is positioned on.
    #[must_use]
    pub const fn value(&self) -> Option<&Post> {
        self.current.as_ref()
    }

    /// Returns the primary key the cursor is positioned on.
    #[must_use]
    pub fn primary_key(&self) -> Option<i64> {
        self.current.as_ref().map(|p| p.id)
    }

    /// Moves to the next record and returns it, or `None` once the store
    /// is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the seek query fails.
    pub fn advance(&mut self) -> Result<Option<&Post>> {
        if self.done {
            return Ok(None);
        }

        let sql = match self.direction {
            CursorDirection::Next => format!(
                "SELECT id, title, content FROM {} WHERE id > ? ORDER BY id ASC LIMIT 1",
                self.table
            ),
            CursorDirection::Prev => format!(
                "SELECT id, title, content FROM {} WHERE id < ? ORDER BY id DESC LIMIT 1",
                self.table
            ),
        };
        let bound = self.last_key.unwrap_or(match self.direction {
            CursorDirection::Next => i64::MIN,
            CursorDirection::Prev => i64::MAX,
        });

        let next = self
            .conn
            .query_row(&sql, params![bound], post_from_row)
            .optional()
            .map_err(StorageError::from)?;

        match next {
            Some(post) => {
                self.last_key = Some(post.id);
                self.current = Some(post);
            }
            None => {
                self.current = None;
                self.done = true;
            }
        }
        Ok(self.current.as_ref())
    }
}

impl Iterator for Cursor<'_> {
    type Item = Result<Post>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(post) => post.cloned().map(Ok),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
