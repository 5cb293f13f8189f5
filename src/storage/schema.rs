//! Database schema definitions.
//!
//! Contains the object store layout and the upgrade steps that bring a
//! database file from one version to the next.

/// Logical database name.
pub const DATABASE_NAME: &str = "blog";

/// Current database version.
pub const DATABASE_VERSION: u32 = 1;

/// Name of the posts object store.
pub const POSTS_STORE: &str = "posts";

/// Name of the non-unique index over post titles.
pub const TITLE_INDEX: &str = "title";

/// Name of the non-unique index over post content.
pub const CONTENT_INDEX: &str = "content";

/// Describes a secondary index on an object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSchema {
    /// Index name.
    pub name: &'static str,
    /// Record field the index is built over.
    pub key_path: &'static str,
    /// Whether two records may share a key.
    pub unique: bool,
    /// Backing SQL index.
    pub sql_name: &'static str,
}

/// Describes an object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSchema {
    /// Store name.
    pub name: &'static str,
    /// Primary key field.
    pub key_path: &'static str,
    /// Whether keys are generated by the store.
    pub auto_increment: bool,
    /// Secondary indexes.
    pub indexes: &'static [IndexSchema],
    /// Database version that introduced the store.
    pub since_version: u32,
}

impl StoreSchema {
    /// Looks up an index by name.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&'static IndexSchema> {
        self.indexes.iter().find(|i| i.name == name)
    }
}

/// All object stores known to this build.
pub const STORES: &[StoreSchema] = &[StoreSchema {
    name: POSTS_STORE,
    key_path: "id",
    auto_increment: true,
    indexes: &[
        IndexSchema {
            name: TITLE_INDEX,
            key_path: "title",
            unique: false,
            sql_name: "idx_posts_title",
        },
        IndexSchema {
            name: CONTENT_INDEX,
            key_path: "content",
            unique: false,
            sql_name: "idx_posts_content",
        },
    ],
    since_version: 1,
}];

/// Looks up a store schema by name.
#[must_use]
pub fn store(name: &str) -> Option<&'static StoreSchema> {
    STORES.iter().find(|s| s.name == name)
}

/// SQL for the bookkeeping table that records name and version.
pub const SCHEMA_INFO_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_info (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// SQL to check if schema is initialized.
pub const CHECK_SCHEMA_SQL: &str = r"
SELECT COUNT(*) FROM sqlite_master
WHERE type='table' AND name='schema_info';
";

/// SQL to get the stored version.
pub const GET_VERSION_SQL: &str = r"
SELECT value FROM schema_info WHERE key = 'version';
";

/// SQL to set the stored version.
pub const SET_VERSION_SQL: &str = r"
INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?);
";

/// SQL to record the logical database name.
pub const SET_NAME_SQL: &str = r"
INSERT OR REPLACE INTO schema_info (key, value) VALUES ('name', ?);
";

/// A schema change applied when opening with a newer version.
pub struct UpgradeStep {
    /// Version this step upgrades from.
    pub from_version: u32,
    /// Version this step upgrades to.
    pub to_version: u32,
    /// SQL statements to execute.
    pub sql: &'static str,
}

/// Creates the posts store: generated `id` key, `title` and `content` indexes.
const UPGRADE_V0_TO_V1: &str = r"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_title ON posts(title);

CREATE INDEX IF NOT EXISTS idx_posts_content ON posts(content);
";

/// Available upgrade steps, ordered by version.
pub const UPGRADE_STEPS: &[UpgradeStep] = &[UpgradeStep {
    from_version: 0,
    to_version: 1,
    sql: UPGRADE_V0_TO_V1,
}];

/// Gets the steps needed to go from `current` to `target`.
#[must_use]
pub fn upgrade_steps(current: u32, target: u32) -> Vec<&'static UpgradeStep> {
    UPGRADE_STEPS
        .iter()
        .filter(|s| s.from_version >= current && s.to_version <= target)
        .collect()
}
