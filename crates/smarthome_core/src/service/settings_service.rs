//! User settings use-case service.
//!
//! # Responsibility
//! - Map `UserSettings` onto the key-value preference set.
//! - Apply per-field defaults when keys are absent.
//!
//! # Invariants
//! - `load` never fails on a missing key, only on storage or malformed data.
//! - Partial saves only touch their own keys.

use crate::model::settings::{AccentColor, UserSettings};
use crate::repo::preference_repo::{PreferenceRepository, PreferenceValue};
use crate::repo::{RepoError, RepoResult};
use log::info;

pub const PREF_USER_NAME: &str = "user_name";
pub const PREF_USER_EMAIL: &str = "user_email";
pub const PREF_APP_COLOR: &str = "app_color";
pub const PREF_SECURITY_ALARM: &str = "security_alarm";
pub const PREF_NOTIFICATIONS: &str = "notifications";

pub struct SettingsService<R: PreferenceRepository> {
    repo: R,
}

impl<R: PreferenceRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Reads every setting, falling back to defaults per missing key.
    pub fn load(&self) -> RepoResult<UserSettings> {
        let defaults = UserSettings::default();
        let accent_color = match self.repo.get_i64(PREF_APP_COLOR)? {
            Some(packed) => accent_from_stored(packed)?,
            None => defaults.accent_color,
        };

        Ok(UserSettings {
            user_name: self
                .repo
                .get_string(PREF_USER_NAME)?
                .unwrap_or(defaults.user_name),
            user_email: self
                .repo
                .get_string(PREF_USER_EMAIL)?
                .unwrap_or(defaults.user_email),
            accent_color,
            security_alarm: self
                .repo
                .get_bool(PREF_SECURITY_ALARM)?
                .unwrap_or(defaults.security_alarm),
            notifications: self
                .repo
                .get_bool(PREF_NOTIFICATIONS)?
                .unwrap_or(defaults.notifications),
        })
    }

    /// Overwrites every setting.
    pub fn save(&mut self, settings: &UserSettings) -> RepoResult<()> {
        self.put(
            "all",
            &[
                (
                    PREF_USER_NAME,
                    PreferenceValue::Text(settings.user_name.clone()),
                ),
                (
                    PREF_USER_EMAIL,
                    PreferenceValue::Text(settings.user_email.clone()),
                ),
                (PREF_APP_COLOR, packed_color(settings.accent_color)),
                (
                    PREF_SECURITY_ALARM,
                    PreferenceValue::Bool(settings.security_alarm),
                ),
                (
                    PREF_NOTIFICATIONS,
                    PreferenceValue::Bool(settings.notifications),
                ),
            ],
        )
    }

    pub fn save_profile(&mut self, name: &str, email: &str) -> RepoResult<()> {
        self.put(
            "profile",
            &[
                (PREF_USER_NAME, PreferenceValue::Text(name.to_string())),
                (PREF_USER_EMAIL, PreferenceValue::Text(email.to_string())),
            ],
        )
    }

    pub fn save_accent_color(&mut self, color: AccentColor) -> RepoResult<()> {
        self.put("accent_color", &[(PREF_APP_COLOR, packed_color(color))])
    }

    pub fn save_security_alarm(&mut self, enabled: bool) -> RepoResult<()> {
        self.put(
            "security_alarm",
            &[(PREF_SECURITY_ALARM, PreferenceValue::Bool(enabled))],
        )
    }

    pub fn save_notifications(&mut self, enabled: bool) -> RepoResult<()> {
        self.put(
            "notifications",
            &[(PREF_NOTIFICATIONS, PreferenceValue::Bool(enabled))],
        )
    }

    fn put(&mut self, scope: &str, entries: &[(&str, PreferenceValue)]) -> RepoResult<()> {
        self.repo.put_all(entries)?;
        info!(
            "event=settings_save module=service status=ok scope={scope} keys={}",
            entries.len()
        );
        Ok(())
    }
}

fn packed_color(color: AccentColor) -> PreferenceValue {
    PreferenceValue::Integer(i64::from(color.to_packed_i32()))
}

/// Stored colors are Android-style signed 32-bit ARGB values.
fn accent_from_stored(value: i64) -> RepoResult<AccentColor> {
    let packed = i32::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "preference `{PREF_APP_COLOR}` is out of color range: {value}"
        ))
    })?;
    Ok(AccentColor::from_packed_i32(packed))
}
