//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// postdb: a small object database for blog posts.
///
/// Stores posts with a generated id and indexed title/content fields.
#[derive(Parser, Debug)]
#[command(name = "postdb")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file.
    ///
    /// Defaults to `.postdb/blog.db` in the current directory.
    #[arg(short, long, env = "POSTDB_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Enable verbose (debug) logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and its posts store.
    Init {
        /// Recreate the database file (destroys existing data).
        #[arg(short, long)]
        force: bool,
    },

    /// Show database name, version and store counts.
    Status,

    /// Add a post.
    Add {
        /// Post title.
        #[arg(short, long, default_value = "")]
        title: String,

        /// Post content.
        #[arg(short, long, default_value = "")]
        content: String,
    },

    /// List every post in key order.
    #[command(name = "list", alias = "ls")]
    List {
        /// Walk keys from highest to lowest.
        #[arg(short, long)]
        reverse: bool,
    },

    /// Show one post.
    Show {
        /// Post id.
        id: i64,
    },

    /// Delete a post.
    #[command(name = "delete", alias = "rm")]
    Delete {
        /// Post id.
        id: i64,
    },

    /// Find posts through the title or content index.
    Find {
        /// Index to search.
        #[arg(short, long, value_enum, default_value_t = IndexArg::Title)]
        index: IndexArg,

        /// Exact value to match.
        value: String,
    },

    /// Delete every post.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Index selectable from the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexArg {
    /// The `title` index.
    Title,
    /// The `content` index.
    Content,
}

impl IndexArg {
    /// Returns the index name in the posts store.
    #[must_use]
    pub const fn index_name(self) -> &'static str {
        match self {
            Self::Title => crate::storage::TITLE_INDEX,
            Self::Content => crate::storage::CONTENT_INDEX,
        }
    }
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_db_path() {
        let cli = Cli {
            db_path: None,
            verbose: false,
            format: "text".to_string(),
            command: Commands::Status,
        };
        assert_eq!(
            cli.get_db_path(),
            PathBuf::from(crate::storage::DEFAULT_DB_PATH)
        );
    }

    #[test]
    fn test_custom_db_path() {
        let cli = Cli {
            db_path: Some(PathBuf::from("/custom/path.db")),
            verbose: false,
            format: "text".to_string(),
            command: Commands::Status,
        };
        assert_eq!(cli.get_db_path(), PathBuf::from("/custom/path.db"));
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["postdb", "add", "--title", "Hi", "--content", "Body"])
            .unwrap();
        match cli.command {
            Commands::Add { title, content } => {
                assert_eq!(title, "Hi");
                assert_eq!(content, "Body");
            }
            other => unreachable!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_find_defaults_to_title() {
        let cli = Cli::try_parse_from(["postdb", "find", "Hi"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Find {
                index: IndexArg::Title,
                ..
            }
        ));
        assert_eq!(IndexArg::Content.index_name(), "content");
    }

    #[test]
    fn test_parse_aliases() {
        let cli = Cli::try_parse_from(["postdb", "rm", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete { id: 3 }));
        let cli = Cli::try_parse_from(["postdb", "ls", "--reverse"]).unwrap();
        assert!(matches!(cli.command, Commands::List { reverse: true }));
    }
}
