//! Transcript and key-derivation helpers built on top of the primitive
//! layer
//!
//! Every variable-length input that feeds a hash preimage or an HKDF salt
//! is length-prefixed here so that concatenation can never be ambiguous:
//! `lp(a) || lp(b) = lp(a') || lp(b')` implies `(a, b) = (a', b')`.

use zeroize::Zeroize;

use super::primitive::hkdf_sha512;

/// Prepend a 4-byte big-endian length to `bytes`.
pub fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + bytes.len());
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
    out
}

/// Build the CPace hash-to-curve preimage `lp(password) || lp(context) ||
/// lp(sid)`, consuming and zeroizing the caller's password buffer.
pub fn cpace_hash_input(mut password: Vec<u8>, context: &[u8], sid: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&length_prefixed(&password));
    out.extend_from_slice(&length_prefixed(context));
    out.extend_from_slice(&length_prefixed(sid));
    password.zeroize();
    out
}

/// Derive `(sharedSecret, sessionKey)` from a DH point and both public
/// shares: `HKDF-SHA-512(salt = Ya || Yb, ikm = dhPoint, info, 64)`.
pub fn derive_session_key(
    dh_point: &[u8],
    ya: &[u8],
    yb: &[u8],
    info: &[u8],
) -> ([u8; 32], [u8; 32]) {
    let mut salt = Vec::with_capacity(ya.len() + yb.len());
    salt.extend_from_slice(ya);
    salt.extend_from_slice(yb);

    let mut okm = hkdf_sha512(dh_point, &salt, info, 64);
    salt.zeroize();

    let mut shared_secret = [0u8; 32];
    let mut session_key = [0u8; 32];
    shared_secret.copy_from_slice(&okm[0..32]);
    session_key.copy_from_slice(&okm[32..64]);
    okm.zeroize();

    (shared_secret, session_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn length_prefix_concatenation_is_unambiguous_example() {
        // lp("ab", "c") must not collide with lp("a", "bc")
        let pair1 = [length_prefixed(b"ab"), length_prefixed(b"c")].concat();
        let pair2 = [length_prefixed(b"a"), length_prefixed(b"bc")].concat();
        assert_ne!(pair1, pair2);
    }

    #[test]
    fn derive_session_key_halves_differ() {
        let (shared, session) = derive_session_key(b"dh-point", b"ya", b"yb", b"info");
        assert_ne!(shared, session);
    }

    proptest! {
        // Property 8: lp(a) || lp(b) = lp(a') || lp(b') implies (a, b) = (a', b')
        #[test]
        fn length_prefix_pairs_are_injective(
            a in proptest::collection::vec(any::<u8>(), 0..64),
            b in proptest::collection::vec(any::<u8>(), 0..64),
            a2 in proptest::collection::vec(any::<u8>(), 0..64),
            b2 in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let lhs = [length_prefixed(&a), length_prefixed(&b)].concat();
            let rhs = [length_prefixed(&a2), length_prefixed(&b2)].concat();
            if lhs == rhs {
                prop_assert_eq!(a, a2);
                prop_assert_eq!(b, b2);
            }
        }
    }
}
