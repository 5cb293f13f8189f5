//! CLI command implementations.
//!
//! Each command opens the database, runs its transactions and renders the
//! result.

use crate::cli::output::{
    OutputFormat, format_added, format_cleared, format_deleted, format_matches, format_post,
    format_post_list, format_status,
};
use crate::cli::parser::{Cli, Commands, IndexArg};
use crate::core::{NewPost, Post};
use crate::error::{CommandError, Error, IoError, Result, StorageError};
use crate::storage::{CursorDirection, DATABASE_VERSION, Database, POSTS_STORE, TransactionMode};
use std::path::Path;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();
    if db_path.is_dir() {
        return Err(Error::Config {
            message: format!("database path is a directory: {}", db_path.display()),
        });
    }

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force, format),
        Commands::Status => cmd_status(&db_path, format),
        Commands::Add { title, content } => cmd_add(&db_path, title, content, format),
        Commands::List { reverse } => cmd_list(&db_path, *reverse, format),
        Commands::Show { id } => cmd_show(&db_path, *id, format),
        Commands::Delete { id } => cmd_delete(&db_path, *id, format),
        Commands::Find { index, value } => cmd_find(&db_path, *index, value, format),
        Commands::Clear { yes } => cmd_clear(&db_path, *yes, format),
    }
}

/// Opens an existing database and brings it to the current version.
fn open_database(db_path: &Path) -> Result<Database> {
    if !db_path.exists() {
        return Err(StorageError::NotInitialized.into());
    }

    let mut db = Database::connect(db_path)?;
    if !db.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }
    db.upgrade(DATABASE_VERSION)?;

    Ok(db)
}

/// Reads every post with a read-only cursor.
fn read_posts(db: &mut Database, direction: CursorDirection) -> Result<Vec<Post>> {
    let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadOnly)?;
    let posts = tx
        .object_store(POSTS_STORE)?
        .open_cursor(direction)
        .collect::<Result<Vec<_>>>()?;
    tx.commit()?;
    Ok(posts)
}

/// Removes the database file and any WAL side files next to it.
fn remove_database_files(db_path: &Path) -> Result<()> {
    let mut paths = vec![db_path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        paths.push(side.into());
    }

    for path in paths.iter().filter(|p| p.exists()) {
        std::fs::remove_file(path).map_err(|e| IoError::RemoveFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool, _format: OutputFormat) -> Result<String> {
    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if force && db_path.exists() {
        remove_database_files(db_path)?;
    }

    let db = Database::open(db_path, DATABASE_VERSION)?;

    Ok(format!(
        "Initialized database '{}' v{} at: {}\n",
        db.name(),
        db.version(),
        db_path.display()
    ))
}

fn cmd_status(db_path: &Path, format: OutputFormat) -> Result<String> {
    let db = open_database(db_path)?;
    let stats = db.stats()?;
    Ok(format_status(&stats, format))
}

fn cmd_add(db_path: &Path, title: &str, content: &str, format: OutputFormat) -> Result<String> {
    let mut db = open_database(db_path)?;
    let post = NewPost::new(title, content);
    if post.is_blank() {
        tracing::warn!("adding a post with an empty title and content");
    }

    let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadWrite)?;
    let id = tx.object_store(POSTS_STORE)?.add(&post)?;
    tx.commit()?;

    // Re-render once the write is durable
    let posts = read_posts(&mut db, CursorDirection::Next)?;
    Ok(format_added(id, &posts, format))
}

fn cmd_list(db_path: &Path, reverse: bool, format: OutputFormat) -> Result<String> {
    let mut db = open_database(db_path)?;
    let direction = if reverse {
        CursorDirection::Prev
    } else {
        CursorDirection::Next
    };
    let posts = read_posts(&mut db, direction)?;
    Ok(format_post_list(&posts, format))
}

fn cmd_show(db_path: &Path, id: i64, format: OutputFormat) -> Result<String> {
    let mut db = open_database(db_path)?;
    let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadOnly)?;
    let post = tx
        .object_store(POSTS_STORE)?
        .get(id)?
        .ok_or(StorageError::PostNotFound { id })?;
    tx.commit()?;
    Ok(format_post(&post, format))
}

fn cmd_delete(db_path: &Path, id: i64, format: OutputFormat) -> Result<String> {
    let mut db = open_database(db_path)?;
    let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadWrite)?;
    let removed = tx.object_store(POSTS_STORE)?.delete(id)?;
    if !removed {
        tx.abort()?;
        return Err(StorageError::PostNotFound { id }.into());
    }
    tx.commit()?;
    Ok(format_deleted(id, format))
}

fn cmd_find(db_path: &Path, index: IndexArg, value: &str, format: OutputFormat) -> Result<String> {
    let mut db = open_database(db_path)?;
    let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadOnly)?;
    let posts = tx
        .object_store(POSTS_STORE)?
        .index(index.index_name())?
        .get_all(value)?;
    tx.commit()?;
    Ok(format_matches(index.index_name(), value, &posts, format))
}

fn cmd_clear(db_path: &Path, yes: bool, format: OutputFormat) -> Result<String> {
    if !yes {
        return Err(CommandError::ExecutionFailed(
            "Use --yes to confirm clear. This will delete all posts.".to_string(),
        )
        .into());
    }

    let mut db = open_database(db_path)?;
    let tx = db.transaction(&[POSTS_STORE], TransactionMode::ReadWrite)?;
    let removed = tx.object_store(POSTS_STORE)?.clear()?;
    tx.commit()?;
    Ok(format_cleared(removed, format))
}
