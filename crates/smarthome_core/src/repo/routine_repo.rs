//! Routine store contract and SQLite implementation.
//!
//! # Responsibility
//! - Single-statement create/read/update/delete over the `routines` table.
//!
//! # Invariants
//! - `create_routine` ignores the caller's id; the table assigns it.
//! - `list_routines` returns rows in id order (insertion order).
//! - `update_routine`/`delete_routine` return affected row counts and treat a
//!   missing id as a zero-row no-op.
//! - No field validation happens here; the editor owns the non-blank rule.

use crate::model::routine::{
    format_storage_time, parse_storage_time, Recurrence, RoutineId, RoutineTask,
};
use crate::repo::{ensure_table_shape, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const ROUTINE_SELECT_SQL: &str = "SELECT id, name, time, recurrence FROM routines";

/// Repository interface for routine persistence.
pub trait RoutineRepository {
    /// Inserts a routine and returns the store-assigned id.
    fn create_routine(&self, task: &RoutineTask) -> RepoResult<RoutineId>;
    /// Returns every stored routine.
    fn list_routines(&self) -> RepoResult<Vec<RoutineTask>>;
    /// Returns one routine by id.
    fn get_routine(&self, id: RoutineId) -> RepoResult<Option<RoutineTask>>;
    /// Overwrites name/time/recurrence of the row with `task.id`.
    fn update_routine(&self, task: &RoutineTask) -> RepoResult<usize>;
    /// Removes the row with `id`.
    fn delete_routine(&self, id: RoutineId) -> RepoResult<usize>;
}

/// SQLite-backed routine repository.
pub struct SqliteRoutineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoutineRepository<'conn> {
    /// Constructs a repository over a connection returned by `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_shape(conn, "routines", &["id", "name", "time", "recurrence"])?;
        Ok(Self { conn })
    }
}

impl RoutineRepository for SqliteRoutineRepository<'_> {
    fn create_routine(&self, task: &RoutineTask) -> RepoResult<RoutineId> {
        self.conn.execute(
            "INSERT INTO routines (name, time, recurrence) VALUES (?1, ?2, ?3);",
            params![
                task.name.as_str(),
                format_storage_time(task.time),
                task.recurrence.label(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_routines(&self) -> RepoResult<Vec<RoutineTask>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROUTINE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut routines = Vec::new();
        while let Some(row) = rows.next()? {
            routines.push(parse_routine_row(row)?);
        }
        Ok(routines)
    }

    fn get_routine(&self, id: RoutineId) -> RepoResult<Option<RoutineTask>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROUTINE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_routine_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_routine(&self, task: &RoutineTask) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE routines
             SET
                name = ?1,
                time = ?2,
                recurrence = ?3
             WHERE id = ?4;",
            params![
                task.name.as_str(),
                format_storage_time(task.time),
                task.recurrence.label(),
                task.id,
            ],
        )?;
        Ok(changed)
    }

    fn delete_routine(&self, id: RoutineId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM routines WHERE id = ?1;", [id])?;
        Ok(changed)
    }
}

/// Counts stored routines. Used by diagnostics that should not materialize rows.
pub fn count_routines(conn: &Connection) -> RepoResult<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM routines;", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

fn parse_routine_row(row: &Row<'_>) -> RepoResult<RoutineTask> {
    let id: RoutineId = row.get("id")?;
    let time_text: String = row.get("time")?;
    let time = parse_storage_time(&time_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid time value `{time_text}` in routines.time (id {id})"
        ))
    })?;
    let recurrence_text: String = row.get("recurrence")?;

    Ok(RoutineTask {
        id,
        name: row.get("name")?,
        time,
        recurrence: Recurrence::from_label(&recurrence_text),
    })
}
