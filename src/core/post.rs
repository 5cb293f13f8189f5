//! Blog post records.
//!
//! A [`Post`] is the single entity held by the `posts` object store. Its
//! primary key is generated by the store, so inserts go through
//! [`NewPost`], which has no id field at all.

use serde::{Deserialize, Serialize};

/// A stored blog post.
///
/// # Examples
///
/// ```
/// use postdb::core::Post;
///
/// let post = Post::new(1, "Hello".to_string(), "First post".to_string());
/// assert_eq!(post.id, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Primary key assigned by the store.
    pub id: i64,

    /// Post title (indexed, not unique).
    pub title: String,

    /// Post body (indexed, not unique).
    pub content: String,
}

impl Post {
    /// Creates a post from its stored fields.
    #[must_use]
    pub const fn new(id: i64, title: String, content: String) -> Self {
        Self { id, title, content }
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewPost {
    /// Post title.
    pub title: String,

    /// Post body.
    pub content: String,
}

impl NewPost {
    /// Creates a new unsaved post.
    ///
    /// # Examples
    ///
    /// ```
    /// use postdb::core::NewPost;
    ///
    /// let draft = NewPost::new("Title", "Body");
    /// assert!(!draft.is_blank());
    /// ```
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// True when both fields are empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}
