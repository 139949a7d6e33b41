//! # tce-cli — Transfer Compliance Engine Command-Line Interface
//!
//! Runs the engine from a YAML engine file (see [`config`]).
//!
//! ## Subcommands
//!
//! - `validate` — check an engine file, reporting every problem
//! - `modules` — list attached modules in attachment order
//! - `check` — evaluate one transfer, exit 1 if it is blocked
//!
//! Handlers return the process exit code; argument parsing lives in
//! `main.rs` and all decisions are delegated to the engine crates.

pub mod check;
pub mod config;
pub mod modules;
pub mod validate;
