//! CLI library components for the ICSR tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
