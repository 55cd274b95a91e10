use rusqlite::Connection;
use smarthome_core::db::migrations::{current_version, upgrade_to, SchemaAction};
use smarthome_core::db::{open_db, open_db_in_memory, DbError, SCHEMA_VERSION};
use smarthome_core::{
    time_from_hm, PreferenceRepository, PreferenceValue, Recurrence, RoutineRepository, RoutineTask,
    SqlitePreferenceRepository, SqliteRoutineRepository,
};

#[test]
fn open_db_in_memory_creates_tables_at_current_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), SCHEMA_VERSION);
    assert_table_exists(&conn, "routines");
    assert_table_exists(&conn, "preferences");
}

#[test]
fn reopening_same_file_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routines.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
        repo.create_routine(&water_plants()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    assert_eq!(repo.list_routines().unwrap().len(), 1);
}

#[test]
fn version_bump_discards_all_routines_but_keeps_preferences() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
        repo.create_routine(&water_plants()).unwrap();
        repo.create_routine(&water_plants()).unwrap();
    }
    {
        let mut prefs = SqlitePreferenceRepository::try_new(&mut conn).unwrap();
        prefs
            .put_all(&[("user_name", PreferenceValue::Text("Ada".to_string()))])
            .unwrap();
    }

    let action = upgrade_to(&mut conn, SCHEMA_VERSION + 1).unwrap();
    assert_eq!(
        action,
        SchemaAction::Reset {
            from: SCHEMA_VERSION
        }
    );
    assert_eq!(current_version(&conn).unwrap(), SCHEMA_VERSION + 1);

    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    assert!(repo.list_routines().unwrap().is_empty());
    let id = repo.create_routine(&water_plants()).unwrap();
    assert_eq!(id, 1, "ids restart after the table is recreated");

    let prefs = SqlitePreferenceRepository::try_new(&mut conn).unwrap();
    assert_eq!(
        prefs.get_string("user_name").unwrap().as_deref(),
        Some("Ada")
    );
}

#[test]
fn upgrade_to_current_version_is_a_no_op() {
    let mut conn = open_db_in_memory().unwrap();
    assert_eq!(
        upgrade_to(&mut conn, SCHEMA_VERSION).unwrap(),
        SchemaAction::Unchanged
    );
}

#[test]
fn fresh_connection_reports_created() {
    let mut conn = Connection::open_in_memory().unwrap();
    assert_eq!(
        upgrade_to(&mut conn, SCHEMA_VERSION).unwrap(),
        SchemaAction::Created
    );
}

#[test]
fn first_use_keeps_a_preexisting_routines_table() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE routines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            time TEXT NOT NULL,
            recurrence TEXT NOT NULL
        );
        INSERT INTO routines (name, time, recurrence) VALUES ('Feed cat', '07:15:00', 'Daily');",
    )
    .unwrap();

    upgrade_to(&mut conn, SCHEMA_VERSION).unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    assert_eq!(repo.list_routines().unwrap().len(), 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn water_plants() -> RoutineTask {
    RoutineTask::new(
        "Water plants",
        time_from_hm(8, 0).unwrap(),
        Recurrence::Daily,
    )
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
