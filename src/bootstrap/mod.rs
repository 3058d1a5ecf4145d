//! Process startup: paths, config, logging and dependency assembly.

pub mod config;
pub mod init;
pub mod tracing;
pub mod wiring;
