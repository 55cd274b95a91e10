//! Schema lifecycle for the routines database.
//!
//! # Responsibility
//! - Create the `routines` and `preferences` tables on first use.
//! - Reset `routines` when the stored schema version is older than the
//!   version this binary expects.
//!
//! # Invariants
//! - `SCHEMA_VERSION` only ever increases.
//! - There is no migration path for routine rows: an upgrade drops them.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - A database newer than this binary is rejected, never downgraded.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const ROUTINES_SQL: &str = include_str!("routines.sql");
const PREFERENCES_SQL: &str = include_str!("preferences.sql");

/// What the lifecycle did to bring a database to the target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// Fresh database: tables were created.
    Created,
    /// Older database: `routines` was dropped and recreated.
    Reset { from: u32 },
    /// Database was already at the target version.
    Unchanged,
}

/// Brings the connection to `SCHEMA_VERSION`.
pub fn apply_schema(conn: &mut Connection) -> DbResult<()> {
    upgrade_to(conn, SCHEMA_VERSION).map(|_| ())
}

/// Brings the connection to `target`, dropping routine rows on upgrade.
///
/// Exposed separately from [`apply_schema`] so a version bump can be driven
/// against an existing database without rebuilding the binary.
pub fn upgrade_to(conn: &mut Connection, target: u32) -> DbResult<SchemaAction> {
    if current_version(conn)? == target {
        return Ok(SchemaAction::Unchanged);
    }

    // Re-read under the write lock: another handle may have upgraded meanwhile.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = current_version(&tx)?;
    if current > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            supported: target,
        });
    }
    if current == target {
        return Ok(SchemaAction::Unchanged);
    }

    let action = if current == 0 {
        tx.execute_batch(ROUTINES_SQL)?;
        SchemaAction::Created
    } else {
        tx.execute_batch("DROP TABLE IF EXISTS routines;")?;
        tx.execute_batch(ROUTINES_SQL)?;
        SchemaAction::Reset { from: current }
    };
    tx.execute_batch(PREFERENCES_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {target};"))?;
    tx.commit()?;

    match action {
        SchemaAction::Reset { from } => {
            warn!("event=schema_reset module=db status=ok from_version={from} to_version={target}")
        }
        _ => info!("event=schema_create module=db status=ok version={target}"),
    }

    Ok(action)
}

/// Reads `PRAGMA user_version`.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
