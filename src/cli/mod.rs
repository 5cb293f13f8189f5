//! CLI layer for postdb.
//!
//! Provides the command-line interface using clap, with commands for
//! creating the database and adding, listing, finding and deleting posts.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, IndexArg};
