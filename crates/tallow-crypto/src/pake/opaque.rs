//! OPAQUE: an augmented PAKE over ristretto255
//!
//! Unlike CPace, the two parties are asymmetric: the client holds the
//! password, the server holds a registration record it can neither use to
//! impersonate the client offline nor recover the password from. The
//! record's opacity comes entirely from the OPRF -- without the server's
//! OPRF secret key, `record[64..128]` is indistinguishable from random.

use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroize;

use super::constants::{OPAQUE_EXPORT_INFO, OPAQUE_SESSION_INFO};
use super::error::{PakeError, Result};
use super::primitive::{
    ct_equal, oprf_blind, oprf_blind_evaluate, oprf_finalize, oprf_generate_key_pair, GroupElement,
};
use super::transcript::length_prefixed;
use super::PakeResult;

/// Registration record layout: `sk(32) || pk(32) || oprfOutput(64) || salt(32)`.
const RECORD_LEN: usize = 160;

/// A server-stored OPAQUE registration record.
///
/// Long-lived, persisted credential material -- unlike ephemeral exchange
/// state, it is not zeroized on drop. Production deployments that want to
/// segregate the OPRF secret key (bytes `0..32`) from the rest of the
/// record are free to split storage; the engine hands back one blob and
/// does not mandate co-storage.
#[derive(Clone)]
pub struct RegistrationRecord {
    bytes: [u8; RECORD_LEN],
}

impl RegistrationRecord {
    fn oprf_secret_key(&self) -> &[u8] {
        &self.bytes[0..32]
    }

    fn stored_oprf_output(&self) -> &[u8] {
        &self.bytes[64..128]
    }

    /// Canonical 160-byte encoding, part of the on-disk wire contract.
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        self.bytes
    }

    /// Parse a stored record. Fails `InvalidRecord` if the buffer is not
    /// exactly 160 bytes or does not decode to a valid OPRF key pair.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RECORD_LEN {
            return Err(PakeError::InvalidRecord);
        }
        let sk_bytes: [u8; 32] = bytes[0..32].try_into().unwrap();
        Scalar::from_canonical_bytes(sk_bytes)
            .into_option()
            .ok_or(PakeError::InvalidRecord)?;
        GroupElement::decode(&bytes[32..64]).map_err(|_| PakeError::InvalidRecord)?;
        let mut record_bytes = [0u8; RECORD_LEN];
        record_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: record_bytes })
    }
}

/// The client's registration-time output.
pub struct RegistrationResult {
    pub record: RegistrationRecord,
    pub export_key: [u8; 32],
}

/// The client's first login message.
pub struct OpaqueLoginInit {
    pub credential_request: [u8; 32],
}

/// The server's login response.
pub struct OpaqueLoginResponse {
    pub credential_response: [u8; 32],
}

/// Client-side exchange state between `login_init` and `login_finalize`.
pub struct OpaqueClientState {
    blind: Option<Scalar>,
    password: Option<Vec<u8>>,
}

impl Drop for OpaqueClientState {
    fn drop(&mut self) {
        if let Some(mut blind) = self.blind.take() {
            blind.zeroize();
        }
        if let Some(mut password) = self.password.take() {
            password.zeroize();
        }
    }
}

/// OPAQUE client-side operations: registration and login.
pub struct OpaqueClient;

impl OpaqueClient {
    /// Register a new password, producing a server-stored record and a
    /// client-held export key. Uses the OS CSPRNG.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to register; consumed and zeroized
    ///   internally
    /// * `server_id` - The server's identity, bound into the export key
    ///
    /// # Returns
    ///
    /// The 160-byte `record` for the server to store and the client's
    /// `export_key`.
    pub fn register(password: Vec<u8>, server_id: &[u8]) -> Result<RegistrationResult> {
        Self::register_with_rng(&mut OsRng, password, server_id)
    }

    /// Register with an explicit RNG (for deterministic tests).
    ///
    /// # Arguments
    ///
    /// * `rng` - The CSPRNG to draw the OPRF key pair, blind, and
    ///   registration salt from
    /// * `password` - The password to register; consumed and zeroized
    ///   internally
    /// * `server_id` - The server's identity, bound into the export key
    ///
    /// # Returns
    ///
    /// The 160-byte `record` for the server to store and the client's
    /// `export_key`.
    pub fn register_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        mut password: Vec<u8>,
        server_id: &[u8],
    ) -> Result<RegistrationResult> {
        let keypair = oprf_generate_key_pair(rng)?;
        let (mut blind, blinded) = oprf_blind(&password, rng)?;
        let evaluated = oprf_blind_evaluate(&keypair.secret_key, &blinded)?;
        let mut oprf_output = oprf_finalize(&password, &blind, &evaluated)?;
        blind.zeroize();
        password.zeroize();

        let mut registration_salt = [0u8; 32];
        rng.try_fill_bytes(&mut registration_salt)
            .map_err(|_| PakeError::RngFailure)?;

        let mut salt = registration_salt.to_vec();
        salt.extend_from_slice(&length_prefixed(server_id));
        let mut export_key_material =
            super::primitive::hkdf_sha512(&oprf_output, &salt, OPAQUE_EXPORT_INFO.as_bytes(), 32);
        salt.zeroize();
        let mut export_key = [0u8; 32];
        export_key.copy_from_slice(&export_key_material);
        export_key_material.zeroize();

        let mut record_bytes = [0u8; RECORD_LEN];
        record_bytes[0..32].copy_from_slice(keypair.secret_key.as_bytes());
        record_bytes[32..64].copy_from_slice(&keypair.public_key.encode());
        record_bytes[64..128].copy_from_slice(&oprf_output);
        record_bytes[128..160].copy_from_slice(&registration_salt);
        oprf_output.zeroize();

        Ok(RegistrationResult {
            record: RegistrationRecord { bytes: record_bytes },
            export_key,
        })
    }

    /// Begin a login attempt using the OS CSPRNG.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to attempt login with; retained (not
    ///   zeroized yet) inside the returned state until `login_finalize`
    ///
    /// # Returns
    ///
    /// `(init, state)` — send `init` to the server, then call
    /// [`OpaqueClientState::login_finalize`] with its response.
    pub fn login_init(password: Vec<u8>) -> Result<(OpaqueLoginInit, OpaqueClientState)> {
        Self::login_init_with_rng(&mut OsRng, password)
    }

    /// Begin a login attempt with an explicit RNG (for deterministic tests).
    ///
    /// # Arguments
    ///
    /// * `rng` - The CSPRNG to draw the blind from
    /// * `password` - The password to attempt login with; retained (not
    ///   zeroized yet) inside the returned state until `login_finalize`
    ///
    /// # Returns
    ///
    /// `(init, state)` — send `init` to the server, then call
    /// [`OpaqueClientState::login_finalize`] with its response.
    pub fn login_init_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        password: Vec<u8>,
    ) -> Result<(OpaqueLoginInit, OpaqueClientState)> {
        let (blind, blinded) = oprf_blind(&password, rng)?;
        let init = OpaqueLoginInit {
            credential_request: blinded.encode(),
        };
        let state = OpaqueClientState {
            blind: Some(blind),
            password: Some(password),
        };
        Ok((init, state))
    }
}

impl OpaqueClientState {
    /// Complete a login attempt with the server's response.
    ///
    /// # Arguments
    ///
    /// * `server_id` - The server's identity, must match the value used at
    ///   registration
    /// * `response` - The server's reply to this state's `login_init` call
    ///
    /// # Returns
    ///
    /// The agreed `PakeResult`, or `BadState` if this state was already
    /// consumed by a prior call.
    pub fn login_finalize(
        &mut self,
        server_id: &[u8],
        response: &OpaqueLoginResponse,
    ) -> Result<PakeResult> {
        let mut blind = self.blind.take().ok_or(PakeError::BadState)?;
        let mut password = self.password.take().ok_or(PakeError::BadState)?;

        let outcome = (|| {
            let evaluated = GroupElement::decode(&response.credential_response)?;
            let mut oprf_output = oprf_finalize(&password, &blind, &evaluated)?;

            let mut salt = length_prefixed(server_id);
            salt.extend_from_slice(&length_prefixed(&response.credential_response));
            let mut okm = super::primitive::hkdf_sha512(
                &oprf_output,
                &salt,
                OPAQUE_SESSION_INFO.as_bytes(),
                64,
            );
            salt.zeroize();
            oprf_output.zeroize();

            let mut shared_secret = [0u8; 32];
            let mut session_key = [0u8; 32];
            shared_secret.copy_from_slice(&okm[0..32]);
            session_key.copy_from_slice(&okm[32..64]);
            okm.zeroize();

            Ok(PakeResult {
                shared_secret,
                session_key,
                success: true,
            })
        })();

        blind.zeroize();
        password.zeroize();
        outcome
    }
}

/// OPAQUE server-side operations.
pub struct OpaqueServer;

impl OpaqueServer {
    /// Evaluate a client's blinded credential request against the stored
    /// record's OPRF secret key.
    ///
    /// # Arguments
    ///
    /// * `record` - The stored registration record for this account
    /// * `init` - The client's login-init message
    ///
    /// # Returns
    ///
    /// The `OpaqueLoginResponse` to send back to the client.
    pub fn evaluate(
        record: &RegistrationRecord,
        init: &OpaqueLoginInit,
    ) -> Result<OpaqueLoginResponse> {
        let sk_bytes: [u8; 32] = record
            .oprf_secret_key()
            .try_into()
            .map_err(|_| PakeError::InvalidRecord)?;
        let sk = Scalar::from_canonical_bytes(sk_bytes)
            .into_option()
            .ok_or(PakeError::InvalidRecord)?;
        let blinded = GroupElement::decode(&init.credential_request)?;
        let evaluated = oprf_blind_evaluate(&sk, &blinded)?;
        Ok(OpaqueLoginResponse {
            credential_response: evaluated.encode(),
        })
    }
}

/// Constant-time check that a (recomputed) OPRF output matches the one
/// embedded in a registration record at registration time.
///
/// # Arguments
///
/// * `record` - The stored registration record for this account
/// * `oprf_output` - The OPRF output recomputed from a login attempt
///
/// # Returns
///
/// `true` if the two outputs match in constant time; `false` on any
/// mismatch.
pub fn verify_credential(record: &RegistrationRecord, oprf_output: &[u8]) -> bool {
    ct_equal(record.stored_oprf_output(), oprf_output)
}

/// Same check as [`verify_credential`], surfaced as a `Result` for callers
/// that want the closed failure taxonomy instead of a bare bool.
///
/// # Arguments
///
/// * `record` - The stored registration record for this account
/// * `oprf_output` - The OPRF output recomputed from a login attempt
///
/// # Returns
///
/// `Ok(())` on match, `Err(PakeError::CredentialMismatch)` otherwise.
pub fn verify_credential_checked(record: &RegistrationRecord, oprf_output: &[u8]) -> Result<()> {
    if verify_credential(record, oprf_output) {
        Ok(())
    } else {
        Err(PakeError::CredentialMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pake::primitive::oprf_finalize as recompute_oprf_finalize;

    const SERVER_ID: &[u8] = b"tallow-relay.example";

    fn recompute_oprf_output(record: &RegistrationRecord, password: &[u8]) -> [u8; 64] {
        let sk_bytes: [u8; 32] = record.oprf_secret_key().try_into().unwrap();
        let sk = Scalar::from_canonical_bytes(sk_bytes).into_option().unwrap();
        let mut rng = rand_core::OsRng;
        let (blind, blinded) = oprf_blind(password, &mut rng).unwrap();
        let evaluated = oprf_blind_evaluate(&sk, &blinded).unwrap();
        recompute_oprf_finalize(password, &blind, &evaluated).unwrap()
    }

    #[test]
    fn s5_happy_path_round_trips() {
        let registration = OpaqueClient::register(b"correct horse".to_vec(), SERVER_ID).unwrap();
        let (init, mut state) = OpaqueClient::login_init(b"correct horse".to_vec()).unwrap();
        let response = OpaqueServer::evaluate(&registration.record, &init).unwrap();
        let result = state.login_finalize(SERVER_ID, &response).unwrap();

        let recomputed = recompute_oprf_output(&registration.record, b"correct horse");
        assert!(verify_credential(&registration.record, &recomputed));
        assert_eq!(result.session_key.len(), 32);
        assert_ne!(result.session_key, [0u8; 32]);
        assert!(result.success);
    }

    #[test]
    fn s6_wrong_password_fails_verification_not_the_engine() {
        let registration = OpaqueClient::register(b"correct".to_vec(), SERVER_ID).unwrap();

        let (init, mut state) = OpaqueClient::login_init(b"wrong".to_vec()).unwrap();
        let response = OpaqueServer::evaluate(&registration.record, &init).unwrap();
        let result = state.login_finalize(SERVER_ID, &response).unwrap();

        let recomputed = recompute_oprf_output(&registration.record, b"wrong");
        assert!(!verify_credential(&registration.record, &recomputed));
        assert!(result.success); // the engine itself never fails on mismatch

        // The wrong-password session key must also differ from the one an
        // honest registration/login round-trip would have produced.
        let (honest_init, mut honest_state) =
            OpaqueClient::login_init(b"correct".to_vec()).unwrap();
        let honest_response = OpaqueServer::evaluate(&registration.record, &honest_init).unwrap();
        let honest_result = honest_state
            .login_finalize(SERVER_ID, &honest_response)
            .unwrap();

        assert_ne!(result.session_key, honest_result.session_key);
    }

    #[test]
    fn record_round_trips_through_bytes() {
        let registration = OpaqueClient::register(b"pw".to_vec(), SERVER_ID).unwrap();
        let encoded = registration.record.to_bytes();
        let decoded = RegistrationRecord::from_bytes(&encoded).unwrap();
        assert_eq!(decoded.to_bytes(), encoded);
    }

    #[test]
    fn record_rejects_wrong_length() {
        assert_eq!(
            RegistrationRecord::from_bytes(&[0u8; 159]).unwrap_err(),
            PakeError::InvalidRecord
        );
    }

    #[test]
    fn record_does_not_embed_password_bytes() {
        let password = b"super-secret-password-value";
        let registration = OpaqueClient::register(password.to_vec(), SERVER_ID).unwrap();
        let encoded = registration.record.to_bytes();
        assert!(!encoded.windows(password.len()).any(|w| w == &password[..]));
    }

    #[test]
    fn export_key_and_session_key_are_independent() {
        let registration = OpaqueClient::register(b"correct horse".to_vec(), SERVER_ID).unwrap();
        let (init, mut state) = OpaqueClient::login_init(b"correct horse".to_vec()).unwrap();
        let response = OpaqueServer::evaluate(&registration.record, &init).unwrap();
        let result = state.login_finalize(SERVER_ID, &response).unwrap();
        assert_ne!(registration.export_key, result.session_key);
    }

    #[test]
    fn login_finalize_is_single_use() {
        let registration = OpaqueClient::register(b"correct horse".to_vec(), SERVER_ID).unwrap();
        let (init, mut state) = OpaqueClient::login_init(b"correct horse".to_vec()).unwrap();
        let response = OpaqueServer::evaluate(&registration.record, &init).unwrap();

        assert!(state.login_finalize(SERVER_ID, &response).is_ok());
        assert_eq!(
            state.login_finalize(SERVER_ID, &response).unwrap_err(),
            PakeError::BadState
        );
    }

    #[test]
    fn verify_credential_checked_matches_bool_variant() {
        let registration = OpaqueClient::register(b"correct".to_vec(), SERVER_ID).unwrap();
        let recomputed = recompute_oprf_output(&registration.record, b"correct");
        assert!(verify_credential_checked(&registration.record, &recomputed).is_ok());

        let wrong = recompute_oprf_output(&registration.record, b"incorrect");
        assert_eq!(
            verify_credential_checked(&registration.record, &wrong).unwrap_err(),
            PakeError::CredentialMismatch
        );
    }
}
