//! SQLite-backed persistent store (C3, spec.md §6): the four logical
//! collections — identity, experience, knowledge, router — behind
//! transactional put/get/delete/clear/count plus the secondary lookups each
//! layer needs. Connection management follows the teacher's storage layer:
//! a `ProjectDirs`-derived default path, WAL mode, and migrations applied on
//! open.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::model::{
    Context, CorrectionEntry, FactCategory, FactSource, IdentityFact, KnowledgeCategory,
    KnowledgeEntry, Role, RouterWeights,
};

/// SQLite-backed implementation of the persistent store.
///
/// All methods take `&self`; the single connection is guarded by a mutex so
/// `Storage` is `Send + Sync` and can be shared behind an `Arc` across the
/// stores layer (spec.md §5: operations suspend only at store reads/writes,
/// never mid-write, so a coarse lock is acceptable at this scale).
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    fn configure_connection(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (and migrate) the store at `db_path`, or the platform default
    /// data directory when `None` (overridable via `TRIAD_DATA_DIR`).
    pub fn new(db_path: Option<PathBuf>) -> StoreResult<Self> {
        let path = match db_path.or_else(crate::config::TriadConfig::data_dir_from_env) {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "triad", "core")
                    .ok_or_else(|| StoreError::Init("could not determine project directories".into()))?;
                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let perms = std::fs::Permissions::from_mode(0o700);
                    let _ = std::fs::set_permissions(data_dir, perms);
                }
                data_dir.join("triad.db")
            }
        };

        let is_dir = path.is_dir();
        let db_file = if is_dir { path.join("triad.db") } else { path };

        let conn = Connection::open(&db_file)?;

        #[cfg(unix)]
        if db_file.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_file, perms);
        }

        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)
            .map_err(|e| StoreError::Init(format!("migration failed: {e}")))?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    /// In-memory store, used in tests and by the CLI's `--ephemeral` mode.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)
            .map_err(|e| StoreError::Init(format!("migration failed: {e}")))?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("storage connection lock poisoned")
    }

    // ---- identity ---------------------------------------------------

    pub fn put_identity_fact(&self, fact: &IdentityFact) -> StoreResult<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO identity_facts
                (id, key, value, category, confidence, confirmation_count, last_confirmed, created_at, source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                key = excluded.key,
                value = excluded.value,
                category = excluded.category,
                confidence = excluded.confidence,
                confirmation_count = excluded.confirmation_count,
                last_confirmed = excluded.last_confirmed,
                source = excluded.source",
            params![
                fact.id,
                fact.key,
                fact.value,
                category_to_str(fact.category),
                fact.confidence,
                fact.confirmation_count,
                fact.last_confirmed.to_rfc3339(),
                fact.created_at.to_rfc3339(),
                source_to_str(fact.source),
            ],
        )?;
        Ok(())
    }

    pub fn list_identity_facts(&self) -> StoreResult<Vec<IdentityFact>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT * FROM identity_facts")?;
        let rows = stmt.query_map([], row_to_identity_fact)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All facts sharing `key`, highest confidence first — `get_by_key`
    /// (spec.md §4.5) takes `.first()` of this.
    pub fn facts_by_key(&self, key: &str) -> StoreResult<Vec<IdentityFact>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM identity_facts WHERE key = ?1 ORDER BY confidence DESC",
        )?;
        let rows = stmt.query_map(params![key], row_to_identity_fact)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_identity_fact(&self, id: &str) -> StoreResult<Option<IdentityFact>> {
        let conn = self.lock();
        conn.query_row("SELECT * FROM identity_facts WHERE id = ?1", params![id], row_to_identity_fact)
            .optional()
            .map_err(StoreError::from)
    }

    pub fn delete_identity_fact(&self, id: &str) -> StoreResult<()> {
        self.lock().execute("DELETE FROM identity_facts WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn clear_identity(&self) -> StoreResult<()> {
        self.lock().execute("DELETE FROM identity_facts", [])?;
        Ok(())
    }

    pub fn count_identity(&self) -> StoreResult<u64> {
        let conn = self.lock();
        Ok(conn.query_row("SELECT COUNT(*) FROM identity_facts", [], |r| r.get::<_, i64>(0))? as u64)
    }

    // ---- experience ---------------------------------------------------

    pub fn put_experience_entry(&self, entry: &crate::model::ExperienceEntry) -> StoreResult<()> {
        let conn = self.lock();
        let embedding_json = entry.embedding.as_ref().map(|e| serde_json::to_string(e)).transpose()?;
        conn.execute(
            "INSERT INTO experience_entries
                (id, content, context, timestamp, importance, original_importance, role, embedding)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                importance = excluded.importance,
                embedding = excluded.embedding",
            params![
                entry.id,
                entry.content,
                entry.context.to_string(),
                entry.timestamp.to_rfc3339(),
                entry.importance,
                entry.original_importance,
                role_to_str(entry.role),
                embedding_json,
            ],
        )?;
        Ok(())
    }

    pub fn list_experience_entries(&self) -> StoreResult<Vec<crate::model::ExperienceEntry>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT * FROM experience_entries")?;
        let rows = stmt.query_map([], row_to_experience_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn experience_entries_by_context(&self, context: Context) -> StoreResult<Vec<crate::model::ExperienceEntry>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT * FROM experience_entries WHERE context = ?1")?;
        let rows = stmt.query_map(params![context.to_string()], row_to_experience_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn delete_experience_entry(&self, id: &str) -> StoreResult<()> {
        self.lock().execute("DELETE FROM experience_entries WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn clear_experience(&self) -> StoreResult<()> {
        self.lock().execute("DELETE FROM experience_entries", [])?;
        Ok(())
    }

    pub fn count_experience(&self) -> StoreResult<u64> {
        let conn = self.lock();
        Ok(conn.query_row("SELECT COUNT(*) FROM experience_entries", [], |r| r.get::<_, i64>(0))? as u64)
    }

    // ---- knowledge ---------------------------------------------------

    pub fn put_knowledge_entry(&self, entry: &KnowledgeEntry) -> StoreResult<()> {
        let conn = self.lock();
        let embedding_json = serde_json::to_string(&entry.embedding)?;
        conn.execute(
            "INSERT INTO knowledge_entries
                (id, content, category, embedding, confidence, reinforcement_count, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                confidence = excluded.confidence,
                reinforcement_count = excluded.reinforcement_count",
            params![
                entry.id,
                entry.content,
                knowledge_category_to_str(entry.category),
                embedding_json,
                entry.confidence,
                entry.reinforcement_count,
                entry.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_knowledge_entries(&self) -> StoreResult<Vec<KnowledgeEntry>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT * FROM knowledge_entries")?;
        let rows = stmt.query_map([], row_to_knowledge_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn knowledge_entries_by_category(&self, category: KnowledgeCategory) -> StoreResult<Vec<KnowledgeEntry>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT * FROM knowledge_entries WHERE category = ?1")?;
        let rows = stmt.query_map(params![knowledge_category_to_str(category)], row_to_knowledge_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_knowledge_entry(&self, id: &str) -> StoreResult<Option<KnowledgeEntry>> {
        let conn = self.lock();
        conn.query_row("SELECT * FROM knowledge_entries WHERE id = ?1", params![id], row_to_knowledge_entry)
            .optional()
            .map_err(StoreError::from)
    }

    pub fn delete_knowledge_entry(&self, id: &str) -> StoreResult<()> {
        self.lock().execute("DELETE FROM knowledge_entries WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn clear_knowledge(&self) -> StoreResult<()> {
        self.lock().execute("DELETE FROM knowledge_entries", [])?;
        Ok(())
    }

    pub fn count_knowledge(&self) -> StoreResult<u64> {
        let conn = self.lock();
        Ok(conn.query_row("SELECT COUNT(*) FROM knowledge_entries", [], |r| r.get::<_, i64>(0))? as u64)
    }

    // ---- router ---------------------------------------------------

    pub fn load_router_weights(&self) -> StoreResult<Option<RouterWeights>> {
        self.load_router_blob("weights")
    }

    pub fn save_router_weights(&self, weights: &RouterWeights) -> StoreResult<()> {
        self.save_router_blob("weights", weights)
    }

    pub fn load_corrections(&self) -> StoreResult<Vec<CorrectionEntry>> {
        Ok(self.load_router_blob("corrections")?.unwrap_or_default())
    }

    pub fn save_corrections(&self, corrections: &[CorrectionEntry]) -> StoreResult<()> {
        self.save_router_blob("corrections", corrections)
    }

    fn load_router_blob<T: serde::de::DeserializeOwned>(&self, name: &str) -> StoreResult<Option<T>> {
        let conn = self.lock();
        let payload: Option<String> = conn
            .query_row("SELECT payload FROM router_state WHERE name = ?1", params![name], |r| r.get(0))
            .optional()?;
        Ok(payload.map(|p| serde_json::from_str(&p)).transpose()?)
    }

    fn save_router_blob<T: serde::Serialize>(&self, name: &str, value: &T) -> StoreResult<()> {
        let conn = self.lock();
        let payload = serde_json::to_string(value)?;
        conn.execute(
            "INSERT INTO router_state (name, payload, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![name, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

fn category_to_str(category: FactCategory) -> &'static str {
    match category {
        FactCategory::Identity => "identity",
        FactCategory::Preference => "preference",
        FactCategory::Trait => "trait",
        FactCategory::Boundary => "boundary",
    }
}

fn category_from_str(s: &str) -> FactCategory {
    match s {
        "identity" => FactCategory::Identity,
        "trait" => FactCategory::Trait,
        "boundary" => FactCategory::Boundary,
        _ => FactCategory::Preference,
    }
}

fn source_to_str(source: FactSource) -> &'static str {
    match source {
        FactSource::Explicit => "explicit",
        FactSource::Inferred => "inferred",
    }
}

fn source_from_str(s: &str) -> FactSource {
    match s {
        "inferred" => FactSource::Inferred,
        _ => FactSource::Explicit,
    }
}

fn role_to_str(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn role_from_str(s: &str) -> Role {
    match s {
        "assistant" => Role::Assistant,
        _ => Role::User,
    }
}

fn knowledge_category_to_str(category: KnowledgeCategory) -> &'static str {
    match category {
        KnowledgeCategory::Skill => "skill",
        KnowledgeCategory::Concept => "concept",
        KnowledgeCategory::Fact => "fact",
    }
}

fn knowledge_category_from_str(s: &str) -> KnowledgeCategory {
    match s {
        "concept" => KnowledgeCategory::Concept,
        "fact" => KnowledgeCategory::Fact,
        _ => KnowledgeCategory::Skill,
    }
}

fn parse_timestamp(s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
}

fn row_to_identity_fact(row: &rusqlite::Row) -> rusqlite::Result<IdentityFact> {
    Ok(IdentityFact {
        id: row.get("id")?,
        key: row.get("key")?,
        value: row.get("value")?,
        category: category_from_str(&row.get::<_, String>("category")?),
        confidence: row.get("confidence")?,
        confirmation_count: row.get("confirmation_count")?,
        last_confirmed: parse_timestamp(row.get("last_confirmed")?)?,
        created_at: parse_timestamp(row.get("created_at")?)?,
        source: source_from_str(&row.get::<_, String>("source")?),
    })
}

fn row_to_experience_entry(row: &rusqlite::Row) -> rusqlite::Result<crate::model::ExperienceEntry> {
    let embedding_json: Option<String> = row.get("embedding")?;
    let embedding = embedding_json
        .map(|json| serde_json::from_str::<Vec<f32>>(&json))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
    let context: String = row.get("context")?;
    Ok(crate::model::ExperienceEntry {
        id: row.get("id")?,
        content: row.get("content")?,
        context: context.parse().unwrap_or_default(),
        timestamp: parse_timestamp(row.get("timestamp")?)?,
        importance: row.get("importance")?,
        original_importance: row.get("original_importance")?,
        role: role_from_str(&row.get::<_, String>("role")?),
        embedding,
    })
}

fn row_to_knowledge_entry(row: &rusqlite::Row) -> rusqlite::Result<KnowledgeEntry> {
    let embedding_json: String = row.get("embedding")?;
    let embedding: Vec<f32> = serde_json::from_str(&embedding_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
    Ok(KnowledgeEntry {
        id: row.get("id")?,
        content: row.get("content")?,
        category: knowledge_category_from_str(&row.get::<_, String>("category")?),
        embedding,
        confidence: row.get("confidence")?,
        reinforcement_count: row.get("reinforcement_count")?,
        timestamp: parse_timestamp(row.get("timestamp")?)?,
    })
}
