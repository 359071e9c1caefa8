//! Primitive building blocks for PAKE protocols
//!
//! Wraps the ristretto255 group (via `curve25519-dalek`), an RFC 9380
//! hash-to-curve map, an RFC 9497 base-mode (non-verifiable) OPRF,
//! HKDF-SHA-512, and a constant-time byte compare. Every operation here
//! runs in time independent of its secret inputs and none of them retain
//! state between calls.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use hkdf::Hkdf;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use super::error::{PakeError, Result};

const SHA512_OUTPUT_LEN: usize = 64;
const SHA512_BLOCK_LEN: usize = 128;

/// A validated ristretto255 group element.
///
/// The only way to obtain one is [`GroupElement::decode`] (wire input,
/// rejects malformed encodings and the identity element as `InvalidShare`)
/// or [`GroupElement::from_point`] (an internally computed point, rejects
/// the identity element as `DegenerateResult`). There is no way to
/// construct one that wraps the identity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GroupElement(RistrettoPoint);

impl GroupElement {
    /// Wrap a point computed internally (e.g. a DH result). Fails if the
    /// point is the identity element.
    pub fn from_point(point: RistrettoPoint) -> Result<Self> {
        if point == RistrettoPoint::identity() {
            return Err(PakeError::DegenerateResult);
        }
        Ok(Self(point))
    }

    /// Decode a 32-byte wire encoding from a peer. Fails on malformed
    /// encodings and on the identity element.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| PakeError::InvalidShare)?;
        let point = CompressedRistretto(array)
            .decompress()
            .ok_or(PakeError::InvalidShare)?;
        if point == RistrettoPoint::identity() {
            return Err(PakeError::InvalidShare);
        }
        Ok(Self(point))
    }

    /// Canonical 32-byte encoding
    pub fn encode(&self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }

    pub(crate) fn point(&self) -> RistrettoPoint {
        self.0
    }
}

/// RFC 9380 `expand_message_xmd` instantiated with SHA-512.
///
/// `len_in_bytes` is always 64 for our one caller (one ristretto255 pull),
/// which collapses the loop to a single iteration, but the general form is
/// implemented so the DST-handling logic matches the RFC exactly.
fn expand_message_xmd(msg: &[u8], dst: &[u8], len_in_bytes: usize) -> Vec<u8> {
    debug_assert!(dst.len() <= 255, "DST must fit in one length-prefix byte");
    let ell = len_in_bytes.div_ceil(SHA512_OUTPUT_LEN);
    debug_assert!(ell <= 255, "requested output too long for expand_message_xmd");

    let mut dst_prime = Vec::with_capacity(dst.len() + 1);
    dst_prime.extend_from_slice(dst);
    dst_prime.push(dst.len() as u8);

    let z_pad = [0u8; SHA512_BLOCK_LEN];
    let l_i_b_str = (len_in_bytes as u16).to_be_bytes();

    let mut msg_prime =
        Vec::with_capacity(z_pad.len() + msg.len() + l_i_b_str.len() + 1 + dst_prime.len());
    msg_prime.extend_from_slice(&z_pad);
    msg_prime.extend_from_slice(msg);
    msg_prime.extend_from_slice(&l_i_b_str);
    msg_prime.push(0u8);
    msg_prime.extend_from_slice(&dst_prime);

    let b0 = Sha512::digest(&msg_prime);

    let mut b_prev = {
        let mut input = Vec::with_capacity(b0.len() + 1 + dst_prime.len());
        input.extend_from_slice(&b0);
        input.push(1u8);
        input.extend_from_slice(&dst_prime);
        Sha512::digest(&input).to_vec()
    };

    let mut uniform = b_prev.clone();
    for i in 2..=ell {
        let xored: Vec<u8> = b0.iter().zip(b_prev.iter()).map(|(a, b)| a ^ b).collect();
        let mut input = Vec::with_capacity(xored.len() + 1 + dst_prime.len());
        input.extend_from_slice(&xored);
        input.push(i as u8);
        input.extend_from_slice(&dst_prime);
        b_prev = Sha512::digest(&input).to_vec();
        uniform.extend_from_slice(&b_prev);
    }

    uniform.truncate(len_in_bytes);
    uniform
}

/// Map arbitrary bytes to a uniformly-distributed ristretto255 point, per
/// RFC 9380's `hash_to_ristretto255`.
pub fn hash_to_curve(input: &[u8], dst: &[u8]) -> RistrettoPoint {
    let mut uniform_bytes = expand_message_xmd(input, dst, SHA512_OUTPUT_LEN);
    let mut wide = [0u8; SHA512_OUTPUT_LEN];
    wide.copy_from_slice(&uniform_bytes);
    uniform_bytes.zeroize();
    let point = RistrettoPoint::from_uniform_bytes(&wide);
    wide.zeroize();
    point
}

/// Generate a uniformly random, non-zero scalar reduced modulo the group
/// order. Surfaces `RngFailure` instead of panicking if the RNG itself
/// errors, and the (cryptographically negligible) all-zero outcome as
/// `DegenerateResult`.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Scalar> {
    let mut buf = [0u8; 64];
    rng.try_fill_bytes(&mut buf).map_err(|_| PakeError::RngFailure)?;
    let scalar = Scalar::from_bytes_mod_order_wide(&buf);
    buf.zeroize();
    if scalar == Scalar::ZERO {
        return Err(PakeError::DegenerateResult);
    }
    Ok(scalar)
}

/// Scalar multiplication; fails if the scalar is zero or the result is the
/// identity element (the former implies the latter).
pub fn scalar_mul(point: &GroupElement, scalar: &Scalar) -> Result<GroupElement> {
    if scalar == &Scalar::ZERO {
        return Err(PakeError::DegenerateResult);
    }
    GroupElement::from_point(point.point() * scalar)
}

/// HKDF-Extract-then-Expand with SHA-512.
pub fn hkdf_sha512(ikm: &[u8], salt: &[u8], info: &[u8], len: usize) -> Vec<u8> {
    let hk = Hkdf::<Sha512>::new(Some(salt), ikm);
    let mut okm = vec![0u8; len];
    hk.expand(info, &mut okm)
        .expect("requested HKDF-SHA-512 output is within RFC 5869 bounds for all call sites");
    okm
}

/// Constant-time byte equality; always `false` on length mismatch.
pub fn ct_equal(a: &[u8], b: &[u8]) -> bool {
    crate::mem::ct_eq(a, b)
}

/// An OPRF server key pair
pub struct OprfKeyPair {
    pub secret_key: Scalar,
    pub public_key: GroupElement,
}

/// Generate an OPRF server key pair.
pub fn oprf_generate_key_pair<R: RngCore + CryptoRng>(rng: &mut R) -> Result<OprfKeyPair> {
    let secret_key = random_scalar(rng)?;
    let public_key = GroupElement::from_point(RISTRETTO_BASEPOINT_POINT * secret_key)?;
    Ok(OprfKeyPair {
        secret_key,
        public_key,
    })
}

/// Client-side OPRF blinding: hash `input` to the group and blind it with a
/// fresh random scalar.
pub fn oprf_blind<R: RngCore + CryptoRng>(
    input: &[u8],
    rng: &mut R,
) -> Result<(Scalar, GroupElement)> {
    let blind = random_scalar(rng)?;
    let base = hash_to_curve(input, super::constants::OPRF_DST.as_bytes());
    let blinded = GroupElement::from_point(base * blind)?;
    Ok((blind, blinded))
}

/// Server-side OPRF evaluation: apply the secret key to the blinded
/// element.
pub fn oprf_blind_evaluate(secret_key: &Scalar, blinded: &GroupElement) -> Result<GroupElement> {
    scalar_mul(blinded, secret_key)
}

/// Client-side OPRF finalization: unblind the server's response and hash it
/// together with the original input, per RFC 9497's `Finalize`.
pub fn oprf_finalize(
    input: &[u8],
    blind: &Scalar,
    evaluated: &GroupElement,
) -> Result<[u8; 64]> {
    let inverse = blind.invert();
    let unblinded = GroupElement::from_point(evaluated.point() * inverse)?;
    let mut unblinded_bytes = unblinded.encode();

    let mut ikm = Vec::with_capacity(4 + input.len() + 4 + 32 + super::constants::OPRF_FINALIZE_INFO.len());
    ikm.extend_from_slice(&(input.len() as u32).to_be_bytes());
    ikm.extend_from_slice(input);
    ikm.extend_from_slice(&(unblinded_bytes.len() as u32).to_be_bytes());
    ikm.extend_from_slice(&unblinded_bytes);
    ikm.extend_from_slice(super::constants::OPRF_FINALIZE_INFO.as_bytes());
    unblinded_bytes.zeroize();

    let (prk, _) = Hkdf::<Sha512>::extract(None, &ikm);
    ikm.zeroize();

    let mut out = [0u8; 64];
    out.copy_from_slice(&prk);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn hash_to_curve_is_deterministic() {
        let a = hash_to_curve(b"hunter2", b"test-dst");
        let b = hash_to_curve(b"hunter2", b"test-dst");
        assert_eq!(a.compress(), b.compress());
    }

    #[test]
    fn hash_to_curve_domain_separates() {
        let a = hash_to_curve(b"hunter2", b"dst-one");
        let b = hash_to_curve(b"hunter2", b"dst-two");
        assert_ne!(a.compress(), b.compress());
    }

    #[test]
    fn decode_rejects_identity() {
        let identity = RistrettoPoint::identity().compress().to_bytes();
        assert_eq!(GroupElement::decode(&identity).unwrap_err(), PakeError::InvalidShare);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(GroupElement::decode(&[0u8; 31]).unwrap_err(), PakeError::InvalidShare);
    }

    #[test]
    fn scalar_mul_rejects_zero_scalar() {
        let mut rng = OsRng;
        let g = GroupElement::from_point(hash_to_curve(b"x", b"dst")).unwrap();
        assert_eq!(scalar_mul(&g, &Scalar::ZERO).unwrap_err(), PakeError::DegenerateResult);
        let _ = random_scalar(&mut rng);
    }

    #[test]
    fn oprf_roundtrip_matches_direct_evaluation() {
        let mut rng = OsRng;
        let keypair = oprf_generate_key_pair(&mut rng).unwrap();
        let (blind, blinded) = oprf_blind(b"correct horse", &mut rng).unwrap();
        let evaluated = oprf_blind_evaluate(&keypair.secret_key, &blinded).unwrap();
        let output = oprf_finalize(b"correct horse", &blind, &evaluated).unwrap();

        // Directly evaluating without blinding should reach the same result:
        // PRF(k, x) = H(x, (x * k)).
        let direct_point = hash_to_curve(b"correct horse", super::super::constants::OPRF_DST.as_bytes());
        let direct_evaluated =
            GroupElement::from_point(direct_point * keypair.secret_key).unwrap();
        let direct_unblinded = direct_evaluated.encode();
        let blinded_unblinded = GroupElement::from_point(evaluated.point() * blind.invert())
            .unwrap()
            .encode();
        assert_eq!(direct_unblinded, blinded_unblinded);
        assert_eq!(output.len(), 64);
    }

    #[test]
    fn oprf_different_passwords_different_outputs() {
        let mut rng = OsRng;
        let keypair = oprf_generate_key_pair(&mut rng).unwrap();

        let (blind_a, blinded_a) = oprf_blind(b"hunter2", &mut rng).unwrap();
        let eval_a = oprf_blind_evaluate(&keypair.secret_key, &blinded_a).unwrap();
        let out_a = oprf_finalize(b"hunter2", &blind_a, &eval_a).unwrap();

        let (blind_b, blinded_b) = oprf_blind(b"hunter3", &mut rng).unwrap();
        let eval_b = oprf_blind_evaluate(&keypair.secret_key, &blinded_b).unwrap();
        let out_b = oprf_finalize(b"hunter3", &blind_b, &eval_b).unwrap();

        assert_ne!(out_a, out_b);
    }

    #[test]
    fn ct_equal_rejects_length_mismatch() {
        assert!(!ct_equal(b"abc", b"abcd"));
        assert!(ct_equal(b"abc", b"abc"));
    }

    /// Statistical timing check (spec testable property 9): `ct_equal`'s
    /// mean running time must not depend on where the first differing byte
    /// falls, since this function guards `verify_credential`'s constant-time
    /// comparison of a registration record's stored OPRF output.
    #[test]
    fn ct_equal_timing_is_independent_of_mismatch_position() {
        use std::time::Instant;

        const LEN: usize = 4096;
        const TRIALS: usize = 2000;

        let base = vec![0x5Au8; LEN];

        let mut early_mismatch = base.clone();
        early_mismatch[0] ^= 0xFF;

        let mut late_mismatch = base.clone();
        late_mismatch[LEN - 1] ^= 0xFF;

        let time_trials = |other: &[u8]| -> u128 {
            let mut total_nanos = 0u128;
            for _ in 0..TRIALS {
                let start = Instant::now();
                let _ = ct_equal(&base, other);
                total_nanos += start.elapsed().as_nanos();
            }
            total_nanos / TRIALS as u128
        };

        let _ = time_trials(&early_mismatch);
        let _ = time_trials(&late_mismatch);

        let early_mean = time_trials(&early_mismatch);
        let late_mean = time_trials(&late_mismatch);

        let slower = early_mean.max(late_mean);
        let faster = early_mean.min(late_mean).max(1);
        let ratio = slower as f64 / faster as f64;

        assert!(
            ratio < 3.0,
            "ct_equal mean timing diverges by mismatch position (early={early_mean}ns, late={late_mean}ns, ratio={ratio}), suggesting a non-constant-time compare"
        );
    }
}
