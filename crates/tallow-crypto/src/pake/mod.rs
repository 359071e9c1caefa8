//! Password-Authenticated Key Exchange (PAKE) protocols
//!
//! Two engines, both over ristretto255: [`cpace`] (balanced, both parties
//! hold the password) and [`opaque`] (augmented, the server holds only a
//! registration record). [`primitive`] and [`transcript`] are the shared
//! leaf layers both engines build on; neither engine depends on the other.

pub mod constants;
pub mod cpace;
pub mod error;
pub mod opaque;
pub mod primitive;
pub mod transcript;

pub use cpace::{CpaceInitiator, CpaceInitiatorState, CpaceMessage1, CpaceMessage2, CpaceResponder};
pub use error::PakeError;
pub use opaque::{
    verify_credential, verify_credential_checked, OpaqueClient, OpaqueClientState,
    OpaqueLoginInit, OpaqueLoginResponse, OpaqueServer, RegistrationRecord, RegistrationResult,
};

/// The outcome of a completed PAKE exchange (either engine).
///
/// `success` is always `true`: per the error handling design, a failed
/// exchange surfaces as an `Err(PakeError)`, never as a `PakeResult` with a
/// false flag -- there is no "partial" session key.
#[derive(Clone)]
pub struct PakeResult {
    /// Raw shared secret, independent of the derived session key.
    pub shared_secret: [u8; 32],
    /// The session key callers should actually use to key bulk encryption.
    pub session_key: [u8; 32],
    /// Always `true`; kept as a field so the wire/API shape matches the
    /// specification's result record rather than relying on `Result` alone.
    pub success: bool,
}

impl Drop for PakeResult {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.shared_secret.zeroize();
        self.session_key.zeroize();
    }
}
