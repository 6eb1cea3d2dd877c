//! Terminal rendering for the dcr binary.

pub mod console;
pub mod context;
pub mod json;
pub mod progress;
pub mod terminal;
pub mod theme;
