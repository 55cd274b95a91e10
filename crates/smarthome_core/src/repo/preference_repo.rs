//! Key-value preference store.
//!
//! # Responsibility
//! - Persist small typed values under string keys in `preferences`.
//!
//! # Invariants
//! - Values are stored as text; integers in decimal, booleans as
//!   `true`/`false`.
//! - `put_all` writes the whole batch in one transaction; last write wins.
//! - A missing key reads as `None`; callers decide the default.

use crate::repo::{ensure_table_shape, RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

/// Typed value written to the preference set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl PreferenceValue {
    fn encode(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

/// Repository interface for the preference set.
pub trait PreferenceRepository {
    fn get_string(&self, key: &str) -> RepoResult<Option<String>>;
    fn get_i64(&self, key: &str) -> RepoResult<Option<i64>>;
    fn get_bool(&self, key: &str) -> RepoResult<Option<bool>>;
    /// Overwrites every listed key atomically.
    fn put_all(&mut self, entries: &[(&str, PreferenceValue)]) -> RepoResult<()>;
}

/// SQLite-backed preference repository.
pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_table_shape(conn, "preferences", &["key", "value"])?;
        Ok(Self { conn })
    }

    fn raw(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn get_string(&self, key: &str) -> RepoResult<Option<String>> {
        self.raw(key)
    }

    fn get_i64(&self, key: &str) -> RepoResult<Option<i64>> {
        match self.raw(key)? {
            Some(text) => text.trim().parse::<i64>().map(Some).map_err(|_| {
                RepoError::InvalidData(format!("preference `{key}` is not an integer"))
            }),
            None => Ok(None),
        }
    }

    fn get_bool(&self, key: &str) -> RepoResult<Option<bool>> {
        match self.raw(key)?.as_deref().map(str::trim) {
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(_) => Err(RepoError::InvalidData(format!(
                "preference `{key}` is not a boolean"
            ))),
            None => Ok(None),
        }
    }

    fn put_all(&mut self, entries: &[(&str, PreferenceValue)]) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
                [*key, value.encode().as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
