//! Core domain models for postdb.
//!
//! Pure data types with no I/O dependencies.

pub mod post;

pub use post::{NewPost, Post};
