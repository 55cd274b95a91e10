//! User settings and theme values.
//!
//! # Invariants
//! - Every field has a default used when the key-value store has no entry.
//! - `AccentColor` is a packed ARGB value; its signed 32-bit bit pattern is
//!   what gets persisted.

use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_NAME: &str = "John Doe";
pub const DEFAULT_USER_EMAIL: &str = "john@someorg.com";

/// Packed ARGB accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccentColor(pub u32);

impl AccentColor {
    pub const YELLOW: AccentColor = AccentColor(0xFFFF_EB3B);
    pub const BLUE: AccentColor = AccentColor(0xFF90_CAF9);
    pub const GREEN: AccentColor = AccentColor(0xFFA5_D6A7);

    /// Colors offered by the picker, default first.
    pub const PALETTE: [AccentColor; 3] = [Self::YELLOW, Self::BLUE, Self::GREEN];

    pub fn argb(self) -> u32 {
        self.0
    }

    /// Bit pattern as stored in the preference set.
    pub fn to_packed_i32(self) -> i32 {
        self.0 as i32
    }

    pub fn from_packed_i32(value: i32) -> Self {
        Self(value as u32)
    }

    /// `#AARRGGBB` form for diagnostics.
    pub fn hex(self) -> String {
        format!("#{:08X}", self.0)
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self::YELLOW
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_name: String,
    pub user_email: String,
    pub accent_color: AccentColor,
    pub security_alarm: bool,
    pub notifications: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            user_email: DEFAULT_USER_EMAIL.to_string(),
            accent_color: AccentColor::default(),
            security_alarm: false,
            notifications: false,
        }
    }
}

impl UserSettings {
    pub fn theme(&self) -> Theme {
        Theme {
            accent: self.accent_color,
        }
    }
}

/// Theme value handed to every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Theme {
    pub accent: AccentColor,
}

#[cfg(test)]
mod tests {
    use super::AccentColor;

    #[test]
    fn packed_form_round_trips_high_alpha_colors() {
        let packed = AccentColor::YELLOW.to_packed_i32();
        assert!(packed < 0);
        assert_eq!(AccentColor::from_packed_i32(packed), AccentColor::YELLOW);
    }

    #[test]
    fn hex_is_uppercase_argb() {
        assert_eq!(AccentColor::BLUE.hex(), "#FF90CAF9");
    }
}
