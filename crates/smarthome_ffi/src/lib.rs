//! Flutter bridge crate for the Smart Home core.

pub mod api;
