//! Key exchange orchestration
//!
//! Combines hybrid KEM (ML-KEM-1024 + X25519), HKDF-SHA256,
//! and the CPace/OPAQUE PAKE engines to establish a session key between two
//! peers from a shared code phrase.

use tallow_crypto::pake;

use crate::{ProtocolError, Result};

/// Session key derived from key exchange
pub struct SessionKey {
    /// 32-byte key for AES-256-GCM encryption
    key: [u8; 32],
}

impl SessionKey {
    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Consume and return the raw key
    pub fn into_bytes(self) -> [u8; 32] {
        self.key
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.key.zeroize();
    }
}

impl From<pake::PakeResult> for SessionKey {
    fn from(result: pake::PakeResult) -> Self {
        SessionKey {
            key: result.session_key,
        }
    }
}

/// Derive a session key from a code phrase using HKDF
///
/// This is the simplest key exchange: both sides know the code phrase,
/// derive the same key. For v1, this provides the baseline.
///
/// # Arguments
///
/// * `code_phrase` - Shared code phrase
/// * `room_id` - BLAKE3 hash of the code phrase (domain separation)
pub fn derive_session_key_from_phrase(code_phrase: &str, room_id: &[u8; 32]) -> SessionKey {
    // Use BLAKE3 KDF with domain separation
    let mut input = Vec::with_capacity(code_phrase.len() + 32);
    input.extend_from_slice(code_phrase.as_bytes());
    input.extend_from_slice(room_id);

    let key = tallow_crypto::hash::blake3::derive_key("tallow-session-key-v1", &input);
    SessionKey { key }
}

/// Start a CPace exchange as the initiator.
///
/// Both peers use the code phrase to derive a shared secret via CPace
/// (a balanced password-authenticated key exchange).
///
/// # Returns
///
/// `(msg1, state)` — send `msg1` to the peer, then call
/// [`complete_cpace_initiator`] with their reply.
pub fn start_cpace_initiator(
    code_phrase: &str,
    session_id: &[u8],
) -> Result<(pake::CpaceMessage1, pake::CpaceInitiatorState)> {
    let (msg1, state) = pake::CpaceInitiator::initiate(
        code_phrase.as_bytes().to_vec(),
        session_id,
        None,
    )
    .map_err(|e| ProtocolError::TransferFailed(format!("CPace initiate failed: {e}")))?;
    tracing::debug!("started CPace exchange as initiator");
    Ok((msg1, state))
}

/// Respond to a CPace initiator's message, completing the exchange in one
/// step.
///
/// # Returns
///
/// `(msg2, session_key)` — send `msg2` back to the initiator.
pub fn start_cpace_responder(
    code_phrase: &str,
    session_id: &[u8],
    msg1: &pake::CpaceMessage1,
) -> Result<(pake::CpaceMessage2, SessionKey)> {
    let (msg2, result) = pake::CpaceResponder::respond(
        code_phrase.as_bytes().to_vec(),
        session_id,
        None,
        msg1,
    )
    .map_err(|e| ProtocolError::TransferFailed(format!("CPace respond failed: {e}")))?;
    tracing::debug!("completed CPace exchange as responder");
    Ok((msg2, result.into()))
}

/// Complete a CPace exchange as the initiator with the responder's message.
pub fn complete_cpace_initiator(
    mut state: pake::CpaceInitiatorState,
    msg2: &pake::CpaceMessage2,
) -> Result<SessionKey> {
    let result = state
        .finalize(msg2)
        .map_err(|e| ProtocolError::TransferFailed(format!("CPace finalize failed: {e}")))?;
    tracing::debug!("completed CPace exchange as initiator");
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_session_key_deterministic() {
        let room_id = crate::room::code::derive_room_id("test-phrase");
        let key1 = derive_session_key_from_phrase("test-phrase", &room_id);
        let key2 = derive_session_key_from_phrase("test-phrase", &room_id);
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_session_key_different_phrases() {
        let room1 = crate::room::code::derive_room_id("phrase-one");
        let room2 = crate::room::code::derive_room_id("phrase-two");
        let key1 = derive_session_key_from_phrase("phrase-one", &room1);
        let key2 = derive_session_key_from_phrase("phrase-two", &room2);
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_cpace_key_exchange() {
        let code = "test-code";
        let session_id = b"session-123";

        let (msg1, init_state) = start_cpace_initiator(code, session_id).unwrap();
        let (msg2, responder_key) = start_cpace_responder(code, session_id, &msg1).unwrap();
        let initiator_key = complete_cpace_initiator(init_state, &msg2).unwrap();

        assert_eq!(initiator_key.as_bytes(), responder_key.as_bytes());
    }

    #[test]
    fn test_cpace_wrong_password() {
        let session_id = b"session-123";

        let (msg1, init_state) = start_cpace_initiator("correct", session_id).unwrap();
        let (msg2, _responder_key) = start_cpace_responder("wrong", session_id, &msg1).unwrap();
        let key1 = complete_cpace_initiator(init_state, &msg2).unwrap();

        let (msg1b, init_state2) = start_cpace_initiator("correct", session_id).unwrap();
        let (msg2b, _) = start_cpace_responder("correct", session_id, &msg1b).unwrap();
        let key2 = complete_cpace_initiator(init_state2, &msg2b).unwrap();

        // Keys should differ when one side used the wrong password
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }
}
