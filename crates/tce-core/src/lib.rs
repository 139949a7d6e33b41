//! # tce-core — Foundational Types for the Transfer Compliance Engine
//!
//! The leaf of the workspace DAG. Defines the primitives every other crate
//! speaks in:
//!
//! - [`Address`] — 20-byte identity for accounts, slots, and sources.
//! - [`TransferCheckRequest`] — the ephemeral candidate transfer.
//! - [`Ownership`] — explicit caller-identity authorization for
//!   owner-gated operations.
//! - [`Timestamp`] — UTC, seconds precision.
//! - [`CoreError`] / [`AuthError`] — foundational error types.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tce-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod error;
pub mod ownership;
pub mod request;
pub mod temporal;

pub use address::{Address, ADDRESS_LEN};
pub use error::{AuthError, CoreError};
pub use ownership::Ownership;
pub use request::TransferCheckRequest;
pub use temporal::Timestamp;
