//! # Error Types — Foundational Errors
//!
//! Errors shared by every crate in the engine. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Authorization failures are their own type so callers can never
//!   confuse "you may not do this" with "this rule denies the transfer".
//! - Parse failures carry the offending input verbatim.

use thiserror::Error;

use crate::address::Address;

/// Errors from constructing foundational values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An address string could not be parsed.
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// An owner-gated operation was attempted by someone other than the owner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller is not the owner of the component.
    #[error("{caller} is not authorized to {action}: owner is {owner}")]
    NotOwner {
        /// Who attempted the call.
        caller: Address,
        /// The current owner.
        owner: Address,
        /// The attempted operation.
        action: String,
    },

    /// Ownership cannot be handed to the zero address.
    #[error("cannot transfer ownership to the zero address")]
    ZeroOwner,
}
