//! Process-wide theme handle.
//!
//! Views never read a global accent color. They are handed a `ThemeHandle`
//! (or a `Theme` snapshot taken from one) and the settings flow is the only
//! writer.

use crate::model::settings::{AccentColor, Theme, UserSettings};
use std::sync::{Arc, RwLock};

/// Shared, cloneable access to the current theme.
#[derive(Debug, Clone, Default)]
pub struct ThemeHandle {
    inner: Arc<RwLock<Theme>>,
}

impl ThemeHandle {
    pub fn new(theme: Theme) -> Self {
        Self {
            inner: Arc::new(RwLock::new(theme)),
        }
    }

    pub fn from_settings(settings: &UserSettings) -> Self {
        Self::new(settings.theme())
    }

    /// Returns a copy of the current theme.
    pub fn current(&self) -> Theme {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set_accent(&self, accent: AccentColor) {
        self.replace(Theme { accent });
    }

    pub fn replace(&self, theme: Theme) {
        match self.inner.write() {
            Ok(mut guard) => *guard = theme,
            Err(poisoned) => *poisoned.into_inner() = theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ThemeHandle;
    use crate::model::settings::AccentColor;

    #[test]
    fn clones_observe_the_same_theme() {
        let handle = ThemeHandle::default();
        let view_copy = handle.clone();
        assert_eq!(view_copy.current().accent, AccentColor::YELLOW);

        handle.set_accent(AccentColor::GREEN);
        assert_eq!(view_copy.current().accent, AccentColor::GREEN);
    }
}
