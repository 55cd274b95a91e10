//! Settings screen view-model.
//!
//! Every control writes through to the preference set as soon as it changes;
//! the profile dialog is the only buffered edit and is committed on save.
//! Picking an accent color also updates the shared [`ThemeHandle`].

use crate::model::settings::{AccentColor, UserSettings};
use crate::repo::preference_repo::PreferenceRepository;
use crate::repo::RepoError;
use crate::service::settings_service::SettingsService;
use crate::service::theme::ThemeHandle;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Buffered input of the profile dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsState {
    pub settings: UserSettings,
    pub profile_dialog: Option<ProfileForm>,
    pub color_dialog: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsIntent {
    Load,
    OpenProfile,
    SetProfileName(String),
    SetProfileEmail(String),
    SaveProfile,
    CloseProfile,
    OpenColorPicker,
    PickColor(AccentColor),
    CloseColorPicker,
    SetSecurityAlarm(bool),
    SetNotifications(bool),
}

#[derive(Debug)]
pub enum SettingsError {
    Repo(RepoError),
    /// Intent needs the profile dialog to be open.
    ProfileDialogClosed,
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::ProfileDialogClosed => write!(f, "profile dialog is not open"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::ProfileDialogClosed => None,
        }
    }
}

impl From<RepoError> for SettingsError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct SettingsViewModel<R: PreferenceRepository> {
    service: SettingsService<R>,
    theme: ThemeHandle,
    state: SettingsState,
}

impl<R: PreferenceRepository> SettingsViewModel<R> {
    pub fn new(repo: R, theme: ThemeHandle) -> Self {
        Self {
            service: SettingsService::new(repo),
            theme,
            state: SettingsState::default(),
        }
    }

    pub fn state(&self) -> &SettingsState {
        &self.state
    }

    pub fn dispatch(&mut self, intent: SettingsIntent) -> Result<&SettingsState, SettingsError> {
        match intent {
            SettingsIntent::Load => {
                self.state.settings = self.service.load()?;
                self.theme.set_accent(self.state.settings.accent_color);
            }
            SettingsIntent::OpenProfile => {
                self.state.profile_dialog = Some(ProfileForm {
                    name: self.state.settings.user_name.clone(),
                    email: self.state.settings.user_email.clone(),
                });
            }
            SettingsIntent::SetProfileName(name) => self.profile_mut()?.name = name,
            SettingsIntent::SetProfileEmail(email) => self.profile_mut()?.email = email,
            SettingsIntent::SaveProfile => {
                let form = self
                    .state
                    .profile_dialog
                    .clone()
                    .ok_or(SettingsError::ProfileDialogClosed)?;
                self.service.save_profile(&form.name, &form.email)?;
                self.state.settings.user_name = form.name;
                self.state.settings.user_email = form.email;
                self.state.profile_dialog = None;
            }
            SettingsIntent::CloseProfile => self.state.profile_dialog = None,
            SettingsIntent::OpenColorPicker => self.state.color_dialog = true,
            SettingsIntent::PickColor(color) => {
                self.service.save_accent_color(color)?;
                self.state.settings.accent_color = color;
                self.state.color_dialog = false;
                self.theme.set_accent(color);
            }
            SettingsIntent::CloseColorPicker => self.state.color_dialog = false,
            SettingsIntent::SetSecurityAlarm(enabled) => {
                self.service.save_security_alarm(enabled)?;
                self.state.settings.security_alarm = enabled;
            }
            SettingsIntent::SetNotifications(enabled) => {
                self.service.save_notifications(enabled)?;
                self.state.settings.notifications = enabled;
            }
        }
        Ok(&self.state)
    }

    fn profile_mut(&mut self) -> Result<&mut ProfileForm, SettingsError> {
        self.state
            .profile_dialog
            .as_mut()
            .ok_or(SettingsError::ProfileDialogClosed)
    }
}
