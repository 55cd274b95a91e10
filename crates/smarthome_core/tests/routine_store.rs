use rusqlite::Connection;
use smarthome_core::db::open_db_in_memory;
use smarthome_core::repo::routine_repo::count_routines;
use smarthome_core::{
    time_from_hm, Recurrence, RepoError, RoutineRepository, RoutineService, RoutineTask,
    SqliteRoutineRepository,
};
use std::collections::HashSet;

fn routine(name: &str, hour: u32, minute: u32, recurrence: Recurrence) -> RoutineTask {
    RoutineTask::new(name, time_from_hm(hour, minute).unwrap(), recurrence)
}

#[test]
fn create_update_delete_walkthrough() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();

    let id = repo
        .create_routine(&routine("Water plants", 8, 0, Recurrence::Daily))
        .unwrap();
    assert_eq!(id, 1);
    assert_eq!(
        repo.list_routines().unwrap(),
        vec![RoutineTask {
            id: 1,
            name: "Water plants".to_string(),
            time: time_from_hm(8, 0).unwrap(),
            recurrence: Recurrence::Daily,
        }]
    );

    let mut edited = routine("Water plants", 9, 0, Recurrence::Weekly);
    edited.id = id;
    assert_eq!(repo.update_routine(&edited).unwrap(), 1);
    let listed = repo.list_routines().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].time, time_from_hm(9, 0).unwrap());
    assert_eq!(listed[0].recurrence, Recurrence::Weekly);

    assert_eq!(repo.delete_routine(id).unwrap(), 1);
    assert!(repo.list_routines().unwrap().is_empty());
}

#[test]
fn create_ignores_caller_id_and_assigns_unique_positive_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();

    let mut ids = HashSet::new();
    for idx in 0..5 {
        let mut task = routine(&format!("routine {idx}"), 7, idx, Recurrence::Daily);
        task.id = 42;
        let id = repo.create_routine(&task).unwrap();
        assert!(id > 0);
        assert!(ids.insert(id), "id {id} assigned twice");
    }
    assert_eq!(ids, (1..=5).collect::<HashSet<i64>>());
    assert_eq!(count_routines(&conn).unwrap(), 5);
}

#[test]
fn list_returns_rows_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    for name in ["first", "second", "third"] {
        repo.create_routine(&routine(name, 6, 30, Recurrence::Weekdays))
            .unwrap();
    }

    let names: Vec<String> = repo
        .list_routines()
        .unwrap()
        .into_iter()
        .map(|task| task.name)
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn update_touches_only_the_target_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    let keep_id = repo
        .create_routine(&routine("Lock doors", 22, 0, Recurrence::Daily))
        .unwrap();
    let edit_id = repo
        .create_routine(&routine("Lights off", 23, 0, Recurrence::Daily))
        .unwrap();

    let mut edited = routine("Lights off early", 21, 30, Recurrence::Weekend);
    edited.id = edit_id;
    repo.update_routine(&edited).unwrap();

    let kept = repo.get_routine(keep_id).unwrap().unwrap();
    assert_eq!(kept.name, "Lock doors");
    assert_eq!(kept.time, time_from_hm(22, 0).unwrap());
    assert_eq!(repo.get_routine(edit_id).unwrap().unwrap(), edited);
}

#[test]
fn update_and_delete_of_missing_id_are_silent_no_ops() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    repo.create_routine(&routine("Vacuum", 10, 0, Recurrence::Weekly))
        .unwrap();
    let before = repo.list_routines().unwrap();

    let mut ghost = routine("Ghost", 1, 1, Recurrence::Yearly);
    ghost.id = 999;
    assert_eq!(repo.update_routine(&ghost).unwrap(), 0);
    assert_eq!(repo.delete_routine(999).unwrap(), 0);
    assert_eq!(repo.list_routines().unwrap(), before);
}

#[test]
fn store_accepts_blank_names() {
    let conn = open_db_in_memory().unwrap();
    let service = RoutineService::new(SqliteRoutineRepository::try_new(&conn).unwrap());

    let id = service
        .create_routine(&routine("   ", 12, 0, Recurrence::Monthly))
        .unwrap();
    assert_eq!(service.get_routine(id).unwrap().unwrap().name, "   ");
}

#[test]
fn time_is_stored_as_iso_local_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    let id = repo
        .create_routine(&routine("Coffee", 6, 5, Recurrence::Weekdays))
        .unwrap();

    let (time, recurrence): (String, String) = conn
        .query_row(
            "SELECT time, recurrence FROM routines WHERE id = ?1;",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(time, "06:05:00");
    assert_eq!(recurrence, "Weekdays");
}

#[test]
fn foreign_recurrence_labels_load_as_custom() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO routines (name, time, recurrence) VALUES ('Bins', '19:00', 'Fortnightly');",
        [],
    )
    .unwrap();

    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    let listed = repo.list_routines().unwrap();
    assert_eq!(
        listed[0].recurrence,
        Recurrence::Custom("Fortnightly".to_string())
    );
    assert_eq!(listed[0].time, time_from_hm(19, 0).unwrap());
}

#[test]
fn unparsable_time_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO routines (name, time, recurrence) VALUES ('Bad', 'noon', 'Daily');",
        [],
    )
    .unwrap();

    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    match repo.list_routines().unwrap_err() {
        RepoError::InvalidData(message) => assert!(message.contains("noon")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn try_new_rejects_connection_without_schema() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteRoutineRepository::try_new(&conn) {
        Err(RepoError::MissingRequiredTable(table)) => assert_eq!(table, "routines"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected missing table error"),
    }
}
