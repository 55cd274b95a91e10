//! Core domain logic for the Smart Home app.
//! Routine storage, user settings and screen view-models live here; the UI
//! only renders snapshots and forwards intents.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod viewmodel;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::routine::{
    format_display_time, format_storage_time, parse_storage_time, time_from_hm, Recurrence,
    RoutineId, RoutineTask, RoutineValidationError,
};
pub use model::settings::{AccentColor, Theme, UserSettings};
pub use repo::preference_repo::{PreferenceRepository, PreferenceValue, SqlitePreferenceRepository};
pub use repo::routine_repo::{RoutineRepository, SqliteRoutineRepository};
pub use repo::{RepoError, RepoResult};
pub use service::routine_service::RoutineService;
pub use service::settings_service::SettingsService;
pub use service::theme::ThemeHandle;
pub use viewmodel::routines::{
    EditorState, RoutineForm, RoutinesError, RoutinesIntent, RoutinesState, RoutinesViewModel,
};
pub use viewmodel::settings::{
    ProfileForm, SettingsError, SettingsIntent, SettingsState, SettingsViewModel,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
