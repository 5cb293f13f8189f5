//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::Post;
use crate::error::Error;
use crate::storage::DatabaseStats;
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &DatabaseStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &DatabaseStats) -> String {
    let mut output = String::new();
    output.push_str("postdb Status\n");
    output.push_str("=============\n\n");
    let _ = writeln!(output, "  Database:      {}", stats.name);
    let _ = writeln!(output, "  Version:       v{}", stats.version);
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {size} bytes");
    }
    for store in &stats.stores {
        output.push('\n');
        let _ = writeln!(output, "  Store:         {}", store.name);
        let _ = writeln!(
            output,
            "  Key path:      {}{}",
            store.key_path,
            if store.auto_increment {
                " (auto increment)"
            } else {
                ""
            }
        );
        let _ = writeln!(output, "  Indexes:       {}", store.indexes.join(", "));
        let _ = writeln!(output, "  Records:       {}", store.record_count);
        if let Some(key) = store.last_key {
            let _ = writeln!(output, "  Last key:      {key}");
        }
    }
    output
}

/// Formats the post list.
///
/// In text mode each post is a block with its title, its content and the
/// command that removes it.
#[must_use]
pub fn format_post_list(posts: &[Post], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_post_list_text(posts),
        OutputFormat::Json => format_json(&posts),
    }
}

fn format_post_list_text(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "No posts found.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(output, "Posts ({}):", posts.len());
    for post in posts {
        output.push_str(&"-".repeat(70));
        output.push('\n');
        write_post_block(&mut output, post);
    }
    output
}

fn write_post_block(output: &mut String, post: &Post) {
    let _ = writeln!(output, "[{}] {}", post.id, post.title);
    for line in post.content.lines() {
        let _ = writeln!(output, "    {line}");
    }
    let _ = writeln!(output, "    (remove: postdb delete {})", post.id);
}

/// Formats a single post.
#[must_use]
pub fn format_post(post: &Post, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            write_post_block(&mut output, post);
            output
        }
        OutputFormat::Json => format_json(post),
    }
}

/// Formats the result of adding a post, followed by the refreshed list.
#[must_use]
pub fn format_added(id: i64, posts: &[Post], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = format!("Added post {id}\n\n");
            output.push_str(&format_post_list_text(posts));
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct AddOutput<'a> {
                id: i64,
                posts: &'a [Post],
            }
            format_json(&AddOutput { id, posts })
        }
    }
}

/// Formats the result of deleting a post.
#[must_use]
pub fn format_deleted(id: i64, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("Deleted post {id}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct DeleteOutput {
                id: i64,
                deleted: bool,
            }
            format_json(&DeleteOutput { id, deleted: true })
        }
    }
}

/// Formats index search results.
#[must_use]
pub fn format_matches(index: &str, value: &str, posts: &[Post], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if posts.is_empty() {
                return format!("No posts with {index} = {value:?}\n");
            }
            let mut output = format!("{} posts with {index} = {value:?}:\n", posts.len());
            for post in posts {
                output.push_str(&"-".repeat(70));
                output.push('\n');
                write_post_block(&mut output, post);
            }
            output
        }
        OutputFormat::Json => format_json(&posts),
    }
}

/// Formats the result of clearing the store.
#[must_use]
pub fn format_cleared(removed: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("Removed {removed} posts\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ClearOutput {
                removed: usize,
            }
            format_json(&ClearOutput { removed })
        }
    }
}

/// Formats an error for the chosen output format.
#[must_use]
pub fn format_error(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: err.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}
