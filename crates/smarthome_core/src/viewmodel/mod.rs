//! Screen view-models.
//!
//! # Responsibility
//! - Expose an immutable state snapshot per screen.
//! - Accept user intents through a single `dispatch` entry point.
//!
//! # Invariants
//! - Dispatch is synchronous: a write and its follow-up re-read complete
//!   before `dispatch` returns.
//! - Theme values come from an injected `ThemeHandle`, never from a global.

pub mod routines;
pub mod settings;
