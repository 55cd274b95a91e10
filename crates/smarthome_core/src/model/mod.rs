//! Domain model for routines and user settings.
//!
//! # Responsibility
//! - Define the data structures shared by storage, services and view-models.
//!
//! # Invariants
//! - `RoutineTask` is the only entity stored in a relational table.
//! - `UserSettings` lives in the key-value preference set and has no
//!   relationship to routines.

pub mod routine;
pub mod settings;
