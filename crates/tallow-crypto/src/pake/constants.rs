//! Domain-separation constants for the PAKE engine
//!
//! Byte-exact per the wire contract; changing any of these breaks
//! interoperability with any peer or persisted registration record that
//! used the old value.

/// DST for CPace's password-to-generator hash-to-curve call
pub const CPACE_DST: &str = "tallow-cpace-ristretto255-v1";

/// Info string for CPace session key derivation
pub const CPACE_SESSION_INFO: &str = "tallow-cpace-session-key-v1";

/// Fallback session id used when a caller does not supply one.
///
/// Carried over from the generator-derivation domain tag the prior CPace
/// stub used unconditionally; see the "CPace sessionId" open question in
/// spec.md section 9 for why this stays opt-out rather than mandatory.
pub const CPACE_DEFAULT_SID: &str = "tallow-cpace-v1";

/// DST for the OPRF's own hash-to-curve call (distinct from CPace's, so the
/// two never collide even when the same password is used for both)
pub const OPRF_DST: &str = "tallow-oprf-ristretto255-v1";

/// Domain tag mixed into the OPRF Finalize transcript
pub const OPRF_FINALIZE_INFO: &str = "tallow-oprf-finalize-v1";

/// Info string for OPAQUE login session key derivation
pub const OPAQUE_SESSION_INFO: &str = "tallow-opaque-session-key-v1";

/// Info string for the OPAQUE registration export key
pub const OPAQUE_EXPORT_INFO: &str = "tallow-opaque-export-key-v1";
