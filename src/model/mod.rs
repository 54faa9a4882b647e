//! Core data model types for letters and their per-letter state.

pub mod letter;
pub mod state;
