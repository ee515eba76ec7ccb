//! Database Migrations
//!
//! Schema migration definitions for the persistent store (spec.md §6: four
//! logical collections — identity, experience, knowledge, router).

/// Migration definitions.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Initial schema: identity facts, experience entries, knowledge entries, router state",
    up: MIGRATION_V1_UP,
}];

/// A database migration.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub up: &'static str,
}

const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS identity_facts (
    id TEXT PRIMARY KEY,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    category TEXT NOT NULL,
    confidence REAL NOT NULL,
    confirmation_count INTEGER NOT NULL,
    last_confirmed TEXT NOT NULL,
    created_at TEXT NOT NULL,
    source TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_identity_facts_key ON identity_facts(key);

CREATE TABLE IF NOT EXISTS experience_entries (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    context TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    importance REAL NOT NULL,
    original_importance REAL NOT NULL,
    role TEXT NOT NULL,
    embedding BLOB
);

CREATE INDEX IF NOT EXISTS idx_experience_context ON experience_entries(context);
CREATE INDEX IF NOT EXISTS idx_experience_timestamp ON experience_entries(timestamp);

CREATE TABLE IF NOT EXISTS knowledge_entries (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    category TEXT NOT NULL,
    embedding BLOB NOT NULL,
    confidence REAL NOT NULL,
    reinforcement_count INTEGER NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_knowledge_category ON knowledge_entries(category);

-- Router collection: two named blobs, `weights` and `corrections` (spec.md §6).
CREATE TABLE IF NOT EXISTS router_state (
    name TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations, recording each applied version.
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                version = migration.version,
                description = migration.description,
                "applying migration"
            );
            conn.execute_batch(migration.up)?;
            conn.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![migration.version, chrono::Utc::now().to_rfc3339()],
            )?;
            applied += 1;
        }
    }

    Ok(applied)
}
