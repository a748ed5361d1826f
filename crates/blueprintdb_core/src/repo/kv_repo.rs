//! Flat key-value persistence substrate.
//!
//! # Responsibility
//! - Define the `get/set/remove/keys` contract the document store runs on.
//! - Provide an in-memory implementation and a SQLite-backed one.
//!
//! # Invariants
//! - Each call touches exactly one key (or lists keys); there is no
//!   multi-key transaction at this layer.
//! - `remove` of a missing key succeeds.
//! - `keys` returns every key, sorted ascending.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type KvResult<T> = Result<T, KvError>;

/// Substrate-level failure.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    /// Substrate refused the write or read (quota, permissions, offline).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "store schema is missing table `{table}`")
            }
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string-to-string store.
pub trait KeyValueRepository {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    /// Creates or fully replaces the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> KvResult<()>;
    /// Removes `key`; missing keys are not an error.
    fn remove(&mut self, key: &str) -> KvResult<()>;
    /// Lists every key in ascending order.
    fn keys(&self) -> KvResult<Vec<String>>;
}

impl<T: KeyValueRepository + ?Sized> KeyValueRepository for &mut T {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> KvResult<Vec<String>> {
        (**self).keys()
    }
}

/// Process-local store, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueRepository {
    entries: BTreeMap<String, String>,
}

impl MemoryKeyValueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueRepository for MemoryKeyValueRepository {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> KvResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// SQLite-backed store over the `kv_entries` table.
pub struct SqliteKeyValueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueRepository<'conn> {
    /// Wraps a migrated connection (see `crate::db::open_db`).
    ///
    /// # Errors
    /// - `MissingRequiredTable` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> KvResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(KvError::MissingRequiredTable("kv_entries"));
        }
        Ok(Self { conn })
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys(&self) -> KvResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueRepository, KvError, MemoryKeyValueRepository, SqliteKeyValueRepository};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    fn exercise(store: &mut dyn KeyValueRepository) {
        assert_eq!(store.get("a").unwrap(), None);
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        store.set("a", "one").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("one"));
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

        store.remove("a").unwrap();
        store.remove("never-existed").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn memory_store_honors_contract() {
        let mut store = MemoryKeyValueRepository::new();
        exercise(&mut store);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sqlite_store_honors_contract() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SqliteKeyValueRepository::try_new(&conn).unwrap();
        exercise(&mut store);
    }

    #[test]
    fn sqlite_store_requires_migrated_schema() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKeyValueRepository::try_new(&conn).err().unwrap();
        assert!(matches!(err, KvError::MissingRequiredTable("kv_entries")));
    }
}
