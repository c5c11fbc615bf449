//! Database Connection and Setup
//!
//! Opens the SQLite connection, runs migrations, and hands out scoped
//! transactions. Every ordering operation runs inside exactly one of them.

use std::sync::Arc;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tokio::sync::Mutex;

use crate::config::BoardConfig;
use crate::domain::{DomainError, DomainResult};

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA_V1: &str = "
    CREATE TABLE IF NOT EXISTS boards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        color TEXT NOT NULL,
        background_image TEXT,
        owner_id INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_boards_owner ON boards(owner_id);

    CREATE TABLE IF NOT EXISTS board_columns (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        board_id INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        position INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_columns_board_position ON board_columns(board_id, position);

    CREATE TABLE IF NOT EXISTS cards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        column_id INTEGER NOT NULL REFERENCES board_columns(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        cover_image TEXT,
        due_date INTEGER,
        task_id INTEGER,
        position INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_cards_column_position ON cards(column_id, position);

    CREATE TABLE IF NOT EXISTS checklists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        card_id INTEGER NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
        title TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_checklists_card ON checklists(card_id);

    CREATE TABLE IF NOT EXISTS checklist_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        checklist_id INTEGER NOT NULL REFERENCES checklists(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        completed INTEGER NOT NULL DEFAULT 0,
        position INTEGER NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_items_checklist_position ON checklist_items(checklist_id, position);

    CREATE TABLE IF NOT EXISTS attachments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        card_id INTEGER NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
        file_name TEXT NOT NULL,
        mime_type TEXT NOT NULL,
        size_bytes INTEGER NOT NULL,
        url TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_attachments_card ON attachments(card_id);
";

/// Database state wrapper
///
/// Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Connection>>,
}

impl DbState {
    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Shared handle for repositories that lock per call
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    /// Run `f` in a write transaction.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock before the first read, so
    /// read-then-shift sequences never interleave with another writer.
    /// Commits when `f` returns `Ok`; any error or panic rolls back.
    pub async fn write<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DomainResult<T>,
    {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run `f` against one consistent read snapshot
    pub async fn read<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DomainResult<T>,
    {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Open and migrate the database described by `config`
pub async fn init_db(config: &BoardConfig) -> DomainResult<DbState> {
    let mut conn = if config.is_in_memory() {
        Connection::open_in_memory()?
    } else {
        Connection::open(&config.database_path)?
    };

    conn.busy_timeout(config.busy_timeout())?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    if !config.is_in_memory() {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    }

    run_migrations(&mut conn)?;
    log::info!(
        "database ready at {} (schema v{})",
        config.database_path.display(),
        SCHEMA_VERSION
    );

    Ok(DbState::from_connection(conn))
}

/// Fresh private in-memory database
pub async fn open_in_memory() -> DomainResult<DbState> {
    init_db(&BoardConfig::in_memory()).await
}

fn schema_version(conn: &Connection) -> DomainResult<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Run database migrations
fn run_migrations(conn: &mut Connection) -> DomainResult<()> {
    let version = schema_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(DomainError::Storage(format!(
            "database schema v{} is newer than supported v{}",
            version, SCHEMA_VERSION
        )));
    }

    if version < 1 {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_V1)?;
        tx.execute_batch("PRAGMA user_version = 1;")?;
        tx.commit()?;
        log::debug!("migrated schema to v1");
    }

    Ok(())
}

/// Rowid of the last insert on `conn`, refused when it does not fit an id
pub(crate) fn inserted_id(conn: &Connection) -> DomainResult<u32> {
    let rowid = conn.last_insert_rowid();
    u32::try_from(rowid).map_err(|_| DomainError::Storage(format!("rowid {} is out of id range", rowid)))
}

/// Current time in Unix milliseconds
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
