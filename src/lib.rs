//! Command-line driver for the Paychase onboarding workflow.
//!
//! Every invocation behaves like one page load: it rebuilds the orchestrator
//! from persisted progress, runs a single command and prints the resulting
//! view as JSON.

pub mod bootstrap;
pub mod cli;
pub mod commands;
