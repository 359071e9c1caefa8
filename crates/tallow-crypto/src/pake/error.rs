//! Closed failure taxonomy for the PAKE engine
//!
//! Every PAKE operation fails, if it fails at all, with exactly one of
//! these kinds. No variant carries a string or any other data derived from
//! secret material -- callers may log the kind, never a cryptographic
//! explanation of it, to avoid leaking which guess failed to the peer.

use thiserror::Error;

/// Result type alias for PAKE operations
pub type Result<T> = core::result::Result<T, PakeError>;

/// Failure kinds for CPace and OPAQUE operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PakeError {
    /// Peer's public share is not a valid ristretto255 encoding, or decodes
    /// to the identity element
    #[error("peer's public share is not a valid ristretto255 point")]
    InvalidShare,

    /// OPAQUE registration record is malformed or the wrong size
    #[error("OPAQUE registration record is malformed")]
    InvalidRecord,

    /// Engine state was reused, is malformed, or was never populated
    #[error("PAKE exchange state is invalid or was already consumed")]
    BadState,

    /// A scalar multiplication or DH computation yielded the identity
    /// element; cryptographically negligible, signals a bug or an
    /// adversarial peer
    #[error("computation yielded the identity element")]
    DegenerateResult,

    /// The secure RNG returned insufficient entropy or errored
    #[error("secure random number generator failed")]
    RngFailure,

    /// Constant-time credential comparison failed (server-side helper only)
    #[error("credential verification failed")]
    CredentialMismatch,
}
