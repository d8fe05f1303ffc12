//! SQLite-backed record store.
//!
//! One table, move and type lists stored as JSON text columns. The
//! type-membership delete leans on SQLite's `json_each` table-valued
//! function. The connection sits behind a mutex; every call is a short
//! critical section and per-call atomicity is all the port promises.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::Connection;

use crate::domain::{Record, RecordStore};
use crate::error::{Error, Result};

/// Durable `RecordStore` adapter over SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// `:memory:` is accepted for ephemeral runs.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS pokemon (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                moves TEXT NOT NULL,
                types TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_pokemon_name ON pokemon (name)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn decode(id: i64, name: String, moves: String, types: String) -> Result<Record> {
        let moves: Vec<String> = serde_json::from_str(&moves)
            .map_err(|e| Error::Persistence(format!("corrupt moves column for id {}: {}", id, e)))?;
        let types: Vec<String> = serde_json::from_str(&types)
            .map_err(|e| Error::Persistence(format!("corrupt types column for id {}: {}", id, e)))?;
        Ok(Record {
            id,
            name,
            moves,
            types,
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert(&self, record: &Record) -> Result<()> {
        let moves = serde_json::to_string(&record.moves)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        let types = serde_json::to_string(&record.types)
            .map_err(|e| Error::Persistence(e.to_string()))?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO pokemon (id, name, moves, types) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![record.id, record.name, moves, types],
        )?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Record>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, name, moves, types FROM pokemon ORDER BY id")?;
        let rows = stmt.query_map([], Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, name, moves, types) = row?;
            records.push(Self::decode(id, name, moves, types)?);
        }
        Ok(records)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Record>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT id, name, moves, types FROM pokemon WHERE name = ?1")?;
        let result = stmt.query_row(rusqlite::params![name], Self::row_to_record);

        match result {
            Ok((id, name, moves, types)) => Ok(Some(Self::decode(id, name, moves, types)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64> {
        let conn = self.conn.lock();
        let count = conn.execute("DELETE FROM pokemon WHERE id = ?1", rusqlite::params![id])?;
        Ok(count as u64)
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64> {
        let conn = self.conn.lock();
        let count = conn.execute(
            "DELETE FROM pokemon WHERE name = ?1",
            rusqlite::params![name],
        )?;
        Ok(count as u64)
    }

    async fn delete_by_type(&self, type_name: &str) -> Result<u64> {
        let conn = self.conn.lock();
        let count = conn.execute(
            "DELETE FROM pokemon WHERE EXISTS (
                SELECT 1 FROM json_each(pokemon.types) WHERE json_each.value = ?1
            )",
            rusqlite::params![type_name],
        )?;
        Ok(count as u64)
    }
}

// =============================================================================
// Tests
// =============================================================================
