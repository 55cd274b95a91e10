//! Routine domain model.
//!
//! # Responsibility
//! - Define the only persisted entity of the app: a recurring reminder.
//! - Own the time-of-day storage/display forms and the recurrence vocabulary.
//!
//! # Invariants
//! - `id == 0` means the routine has not been stored yet; the store assigns
//!   positive ids and never reuses them.
//! - Stored time text is ISO-8601 local time (`HH:MM:SS`).
//! - Recurrence labels outside the picker vocabulary are preserved as
//!   `Recurrence::Custom`, never rejected.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned routine identifier.
pub type RoutineId = i64;

const STORAGE_TIME_FORMAT: &str = "%H:%M:%S";
const DISPLAY_TIME_FORMAT: &str = "%I:%M %p";

/// Repetition cadence attached to a routine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Recurrence {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Weekdays,
    Weekend,
    /// Label written by something other than the picker.
    Custom(String),
}

impl Recurrence {
    /// Picker options, in display order.
    pub const OPTIONS: [Recurrence; 6] = [
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
        Recurrence::Yearly,
        Recurrence::Weekdays,
        Recurrence::Weekend,
    ];

    pub fn label(&self) -> &str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
            Self::Weekdays => "Weekdays",
            Self::Weekend => "Weekend",
            Self::Custom(label) => label.as_str(),
        }
    }

    /// Maps a stored label back to a recurrence. Exact, case-sensitive match
    /// for the known vocabulary; anything else becomes `Custom`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Daily" => Self::Daily,
            "Weekly" => Self::Weekly,
            "Monthly" => Self::Monthly,
            "Yearly" => Self::Yearly,
            "Weekdays" => Self::Weekdays,
            "Weekend" => Self::Weekend,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl Display for Recurrence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Recurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Validation failures raised before a routine is handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineValidationError {
    /// Name is empty after trimming.
    BlankName,
    /// Picker produced an hour/minute outside the clock range.
    InvalidTime { hour: u32, minute: u32 },
}

impl Display for RoutineValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "routine name must not be blank"),
            Self::InvalidTime { hour, minute } => {
                write!(f, "invalid time of day {hour:02}:{minute:02}")
            }
        }
    }
}

impl Error for RoutineValidationError {}

/// A user-defined recurring reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineTask {
    pub id: RoutineId,
    pub name: String,
    #[serde(with = "storage_time")]
    pub time: NaiveTime,
    pub recurrence: Recurrence,
}

impl RoutineTask {
    /// Builds a routine that has not been stored yet (`id == 0`).
    pub fn new(name: impl Into<String>, time: NaiveTime, recurrence: Recurrence) -> Self {
        Self {
            id: 0,
            name: name.into(),
            time,
            recurrence,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id > 0
    }

    /// Checks the rules the editor enforces before saving.
    ///
    /// The store does not call this; it persists whatever it is given.
    pub fn validate(&self) -> Result<(), RoutineValidationError> {
        if self.name.trim().is_empty() {
            return Err(RoutineValidationError::BlankName);
        }
        Ok(())
    }

    /// Card label for the time, e.g. `08:00 AM`.
    pub fn display_time(&self) -> String {
        format_display_time(self.time)
    }
}

/// Builds a time of day from picker values.
pub fn time_from_hm(hour: u32, minute: u32) -> Result<NaiveTime, RoutineValidationError> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or(RoutineValidationError::InvalidTime { hour, minute })
}

/// Formats a time in storage form (`HH:MM:SS`, sub-seconds dropped).
pub fn format_storage_time(time: NaiveTime) -> String {
    time.with_nanosecond(0)
        .unwrap_or(time)
        .format(STORAGE_TIME_FORMAT)
        .to_string()
}

/// Parses stored time text. Accepts `HH:MM`, `HH:MM:SS` and a fractional
/// seconds suffix.
pub fn parse_storage_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Formats a time for display in 12-hour form.
pub fn format_display_time(time: NaiveTime) -> String {
    time.format(DISPLAY_TIME_FORMAT).to_string()
}

mod storage_time {
    use super::{format_storage_time, parse_storage_time};
    use chrono::NaiveTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_storage_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_storage_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid time of day `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_time_drops_subseconds() {
        let time = NaiveTime::from_hms_milli_opt(7, 5, 9, 250).unwrap();
        assert_eq!(format_storage_time(time), "07:05:09");
    }

    #[test]
    fn parse_storage_time_accepts_short_and_fractional_forms() {
        let expected = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        assert_eq!(parse_storage_time("08:30"), Some(expected));
        assert_eq!(parse_storage_time("08:30:00"), Some(expected));
        assert_eq!(parse_storage_time("08:30:00.5").map(|t| t.second()), Some(0));
        assert_eq!(parse_storage_time("8 in the morning"), None);
        assert_eq!(parse_storage_time("25:00"), None);
    }

    #[test]
    fn display_time_uses_twelve_hour_clock() {
        let morning = RoutineTask::new("a", time_from_hm(8, 0).unwrap(), Recurrence::Daily);
        let evening = RoutineTask::new("b", time_from_hm(21, 45).unwrap(), Recurrence::Daily);
        assert_eq!(morning.display_time(), "08:00 AM");
        assert_eq!(evening.display_time(), "09:45 PM");
    }

    #[test]
    fn unknown_label_is_kept_as_custom() {
        let parsed = Recurrence::from_label("Every other Tuesday");
        assert!(parsed.is_custom());
        assert_eq!(parsed.label(), "Every other Tuesday");
        assert_eq!(Recurrence::from_label("daily").label(), "daily");
    }

    #[test]
    fn time_from_hm_rejects_out_of_range() {
        assert_eq!(
            time_from_hm(24, 0),
            Err(RoutineValidationError::InvalidTime {
                hour: 24,
                minute: 0
            })
        );
    }
}
