//! Chat message encryption/decryption
//!
//! Uses AES-256-GCM with counter-based nonces and domain-separated AAD.
//! Sender uses even nonce counters, receiver uses odd — preventing
//! nonce collision without coordination.

use crate::transfer::sanitize;

/// Maximum plaintext size for a single chat message (64 KB)
pub const MAX_CHAT_MESSAGE_SIZE: usize = 64 * 1024;

/// Domain separation AAD for chat messages (distinct from file transfer)
const CHAT_AAD: &[u8] = b"tallow-chat-v1";

/// Chat encryption errors
#[derive(Debug, thiserror::Error)]
pub enum ChatCryptoError {
    /// Message exceeds size limit
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge {
        /// Actual size
        size: usize,
        /// Maximum allowed
        max: usize,
    },
    /// AES-GCM encryption failed
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
    /// AES-GCM decryption failed
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
    /// Decrypted bytes are not valid UTF-8
    #[error("invalid UTF-8 in decrypted message: {0}")]
    InvalidUtf8(String),
}

/// Encrypt a chat message with AES-256-GCM.
///
/// Builds a 12-byte nonce from the counter, increments counter by 2
/// (even/odd split for sender/receiver), and returns (ciphertext, nonce).
pub fn encrypt_chat_text(
    plaintext: &str,
    session_key: &[u8; 32],
    nonce_counter: &mut u64,
) -> Result<(Vec<u8>, [u8; 12]), ChatCryptoError> {
    if plaintext.len() > MAX_CHAT_MESSAGE_SIZE {
        return Err(ChatCryptoError::MessageTooLarge {
            size: plaintext.len(),
            max: MAX_CHAT_MESSAGE_SIZE,
        });
    }

    // Build 12-byte nonce: [0u8; 4] || counter.to_be_bytes()
    let mut nonce = [0u8; 12];
    nonce[4..12].copy_from_slice(&nonce_counter.to_be_bytes());

    let ciphertext =
        tallow_crypto::symmetric::aes_encrypt(session_key, &nonce, plaintext.as_bytes(), CHAT_AAD)
            .map_err(|e| ChatCryptoError::EncryptionFailed(e.to_string()))?;

    *nonce_counter += 2; // Even/odd split

    Ok((ciphertext, nonce))
}

/// Decrypt a chat message with AES-256-GCM.
///
/// Verifies the AAD domain tag and returns sanitized plaintext.
pub fn decrypt_chat_text(
    ciphertext: &[u8],
    nonce: &[u8; 12],
    session_key: &[u8; 32],
) -> Result<String, ChatCryptoError> {
    let plaintext_bytes =
        tallow_crypto::symmetric::aes_decrypt(session_key, nonce, ciphertext, CHAT_AAD)
            .map_err(|e| ChatCryptoError::DecryptionFailed(e.to_string()))?;

    let text = String::from_utf8(plaintext_bytes)
        .map_err(|e| ChatCryptoError::InvalidUtf8(e.to_string()))?;

    // Sanitize to strip ANSI escapes and control characters
    Ok(sanitize::sanitize_display(&text))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_arbitrary_text(text in "\\PC{1,1000}") {
            let key = [42u8; 32];
            let mut counter = 0u64;
            let (ct, nonce) = encrypt_chat_text(&text, &key, &mut counter).unwrap();
            let decrypted = decrypt_chat_text(&ct, &nonce, &key).unwrap();
            // sanitize_display may strip some control chars, so compare sanitized versions
            let expected = crate::transfer::sanitize::sanitize_display(&text);
            prop_assert_eq!(decrypted, expected);
        }
    }
}
