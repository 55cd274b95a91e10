//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose routine and settings use-cases to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + `message`.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens its own database handle and drops it before returning.
//! - Every routine mutation answers with the full re-read routine list.

use log::warn;
use once_cell::sync::Lazy;
use smarthome_core::db::open_db;
use smarthome_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    time_from_hm, AccentColor, Recurrence, RepoResult, RoutineService, RoutineTask, SettingsService,
    SqlitePreferenceRepository, SqliteRoutineRepository, ThemeHandle, UserSettings,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "smarthome.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static THEME: Lazy<ThemeHandle> = Lazy::new(ThemeHandle::default);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Routine row as shown on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineItem {
    pub id: i64,
    pub name: String,
    /// Storage form, `HH:MM:SS`.
    pub time: String,
    /// Card form, `hh:mm AM`.
    pub display_time: String,
    pub recurrence: String,
}

/// Routine list envelope returned by every routine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutinesResponse {
    pub ok: bool,
    /// Full list after the call; empty on failure.
    pub items: Vec<RoutineItem>,
    /// Rows touched by a mutation (0 for list calls and no-op updates).
    pub affected_rows: u32,
    pub message: String,
}

impl RoutinesResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            affected_rows: 0,
            message: message.into(),
        }
    }
}

/// Settings envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResponse {
    pub ok: bool,
    pub user_name: String,
    pub user_email: String,
    /// Packed ARGB.
    pub accent_color: u32,
    pub security_alarm: bool,
    pub notifications: bool,
    pub message: String,
}

impl SettingsResponse {
    fn success(settings: UserSettings) -> Self {
        Self {
            ok: true,
            user_name: settings.user_name,
            user_email: settings.user_email,
            accent_color: settings.accent_color.argb(),
            security_alarm: settings.security_alarm,
            notifications: settings.notifications,
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ok: false,
            ..Self::success(UserSettings::default())
        }
    }
}

/// Recurrence labels offered by the picker, in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn recurrence_options() -> Vec<String> {
    Recurrence::OPTIONS
        .iter()
        .map(|option| option.label().to_string())
        .collect()
}

/// Accent palette offered by the color picker (packed ARGB).
#[flutter_rust_bridge::frb(sync)]
pub fn accent_palette() -> Vec<u32> {
    AccentColor::PALETTE
        .iter()
        .map(|color| color.argb())
        .collect()
}

/// Lists every routine.
#[flutter_rust_bridge::frb(sync)]
pub fn routines_list() -> RoutinesResponse {
    match with_routine_service(|_| Ok(0)) {
        Ok(response) => response,
        Err(err) => RoutinesResponse::failure(format!("routines_list failed: {err}")),
    }
}

/// Creates a routine from the add sheet.
///
/// Blank names are rejected without touching the store.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_create(
    name: String,
    hour: u32,
    minute: u32,
    recurrence: String,
) -> RoutinesResponse {
    let task = match build_task(0, name, hour, minute, &recurrence) {
        Ok(task) => task,
        Err(message) => return RoutinesResponse::failure(message),
    };
    match with_routine_service(|service| service.create_routine(&task).map(|_| 1)) {
        Ok(response) => response.with_message("Routine created."),
        Err(err) => RoutinesResponse::failure(format!("routine_create failed: {err}")),
    }
}

/// Overwrites a routine from the edit sheet. Unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_update(
    id: i64,
    name: String,
    hour: u32,
    minute: u32,
    recurrence: String,
) -> RoutinesResponse {
    let task = match build_task(id, name, hour, minute, &recurrence) {
        Ok(task) => task,
        Err(message) => return RoutinesResponse::failure(message),
    };
    match with_routine_service(|service| service.update_routine(&task)) {
        Ok(response) => response.with_message("Routine updated."),
        Err(err) => RoutinesResponse::failure(format!("routine_update failed: {err}")),
    }
}

/// Deletes a routine. Unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_delete(id: i64) -> RoutinesResponse {
    match with_routine_service(|service| service.delete_routine(id)) {
        Ok(response) => response.with_message("Routine deleted."),
        Err(err) => RoutinesResponse::failure(format!("routine_delete failed: {err}")),
    }
}

/// Loads user settings and publishes the stored accent to the shared theme.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_load() -> SettingsResponse {
    settings_call("settings_load", |_| Ok(()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_save_profile(name: String, email: String) -> SettingsResponse {
    settings_call("settings_save_profile", |service| {
        service.save_profile(name.as_str(), email.as_str())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_accent_color(argb: u32) -> SettingsResponse {
    settings_call("settings_set_accent_color", |service| {
        service.save_accent_color(AccentColor(argb))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_security_alarm(enabled: bool) -> SettingsResponse {
    settings_call("settings_set_security_alarm", |service| {
        service.save_security_alarm(enabled)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_notifications(enabled: bool) -> SettingsResponse {
    settings_call("settings_set_notifications", |service| {
        service.save_notifications(enabled)
    })
}

/// Current accent color of the shared theme (packed ARGB).
#[flutter_rust_bridge::frb(sync)]
pub fn theme_accent_color() -> u32 {
    THEME.current().accent.argb()
}

impl RoutinesResponse {
    fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

fn build_task(
    id: i64,
    name: String,
    hour: u32,
    minute: u32,
    recurrence: &str,
) -> Result<RoutineTask, String> {
    let time = time_from_hm(hour, minute).map_err(|err| err.to_string())?;
    let mut task = RoutineTask::new(name, time, Recurrence::from_label(recurrence));
    task.id = id;
    task.validate().map_err(|err| err.to_string())?;
    Ok(task)
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("SMARTHOME_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

/// Runs one routine mutation, then re-reads the full list on the same handle.
fn with_routine_service(
    mutate: impl FnOnce(&RoutineService<SqliteRoutineRepository<'_>>) -> RepoResult<usize>,
) -> Result<RoutinesResponse, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    let repo = SqliteRoutineRepository::try_new(&conn)
        .map_err(|err| format!("routine repo init failed: {err}"))?;
    let service = RoutineService::new(repo);

    let affected = mutate(&service).map_err(|err| err.to_string())?;
    let items = service
        .list_routines()
        .map_err(|err| err.to_string())?
        .iter()
        .map(to_routine_item)
        .collect();

    Ok(RoutinesResponse {
        ok: true,
        items,
        affected_rows: u32::try_from(affected).unwrap_or(u32::MAX),
        message: String::new(),
    })
}

fn settings_call(
    op: &str,
    write: impl FnOnce(&mut SettingsService<SqlitePreferenceRepository<'_>>) -> RepoResult<()>,
) -> SettingsResponse {
    let result = (|| -> Result<UserSettings, String> {
        let mut conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
        let repo = SqlitePreferenceRepository::try_new(&mut conn)
            .map_err(|err| format!("preference repo init failed: {err}"))?;
        let mut service = SettingsService::new(repo);
        write(&mut service).map_err(|err| err.to_string())?;
        service.load().map_err(|err| err.to_string())
    })();

    match result {
        Ok(settings) => {
            THEME.set_accent(settings.accent_color);
            SettingsResponse::success(settings)
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={op}");
            SettingsResponse::failure(format!("{op} failed: {err}"))
        }
    }
}

fn to_routine_item(task: &RoutineTask) -> RoutineItem {
    RoutineItem {
        id: task.id,
        name: task.name.clone(),
        time: smarthome_core::format_storage_time(task.time),
        display_time: task.display_time(),
        recurrence: task.recurrence.label().to_string(),
    }
}
