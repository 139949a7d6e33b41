//! # Source Errors

use thiserror::Error;

use tce_core::Address;

use crate::SourceKind;

/// Failure to resolve or query an external credential source.
///
/// Rule modules never turn one of these into an approval: a source that
/// cannot answer is a denial.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Nothing is registered at the address.
    #[error("no credential source registered at {address}")]
    NotRegistered {
        /// The address that was looked up.
        address: Address,
    },

    /// A source is registered at the address but it is of another kind.
    #[error("source at {address} is a {actual} source, expected {expected}")]
    WrongKind {
        /// The address that was looked up.
        address: Address,
        /// The kind the caller needed.
        expected: SourceKind,
        /// The kind actually registered.
        actual: SourceKind,
    },

    /// The source exists but could not answer.
    #[error("source at {address} unavailable: {reason}")]
    Unavailable {
        /// The source address.
        address: Address,
        /// Human-readable reason.
        reason: String,
    },

    /// An address is already taken in the directory.
    #[error("a credential source is already registered at {address}")]
    AlreadyRegistered {
        /// The contested address.
        address: Address,
    },
}
