//! CLI command implementations.

pub mod common;
pub mod effects;
pub mod presets;
pub mod process;
