//! CPace: a balanced PAKE over ristretto255
//!
//! Both the initiator and the responder hold the same `(password, context,
//! sid)` and derive a password-dependent generator `Gpw` via hash-to-curve.
//! Because `Gpw` cannot be inverted back to the password, an eavesdropper
//! who only sees the two public shares `Ya`/`Yb` cannot test password
//! guesses without also solving CDH over `Gpw` -- this is what forecloses
//! offline dictionary attack on a recorded transcript.
//!
//! `CpaceInitiatorState::finalize` takes `&mut self` and consumes its
//! scalar via `Option::take`, so calling it twice on the same state
//! returns `BadState` rather than silently re-deriving a key -- there is no
//! retry path inside the engine.

use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroize;

use super::constants::{CPACE_DEFAULT_SID, CPACE_DST, CPACE_SESSION_INFO};
use super::error::{PakeError, Result};
use super::primitive::{hash_to_curve, random_scalar, scalar_mul, GroupElement};
use super::transcript::{cpace_hash_input, derive_session_key};
use super::PakeResult;

fn resolve_sid(sid: Option<&[u8]>) -> &[u8] {
    sid.unwrap_or(CPACE_DEFAULT_SID.as_bytes())
}

/// The initiator's first message: its public share and the (non-secret)
/// associated data it wants bound into the exchange.
#[derive(Clone)]
pub struct CpaceMessage1 {
    pub public_share: [u8; 32],
    pub associated_data: Vec<u8>,
}

/// The responder's reply.
#[derive(Clone)]
pub struct CpaceMessage2 {
    pub public_share: [u8; 32],
    pub associated_data: Vec<u8>,
}

/// Initiator state between `initiate` and `finalize`.
pub struct CpaceInitiatorState {
    a: Option<Scalar>,
    ya: [u8; 32],
}

impl Drop for CpaceInitiatorState {
    fn drop(&mut self) {
        if let Some(mut a) = self.a.take() {
            a.zeroize();
        }
        self.ya.zeroize();
    }
}

impl CpaceInitiatorState {
    /// Whether this state has already been finalized (or was never valid).
    pub fn is_spent(&self) -> bool {
        self.a.is_none()
    }

    #[cfg(test)]
    pub(crate) fn peek_scalar(&self) -> Option<Scalar> {
        self.a
    }

    /// Complete the exchange with the responder's message.
    ///
    /// # Arguments
    ///
    /// * `msg2` - The responder's reply to this initiator's first message
    ///
    /// # Returns
    ///
    /// The agreed `PakeResult`, or `BadState` if this state was already
    /// consumed by a prior call.
    pub fn finalize(&mut self, msg2: &CpaceMessage2) -> Result<PakeResult> {
        let mut a = self.a.take().ok_or(PakeError::BadState)?;
        let outcome = (|| {
            let yb = GroupElement::decode(&msg2.public_share)?;
            let k = scalar_mul(&yb, &a)?;
            let (shared_secret, session_key) = derive_session_key(
                &k.encode(),
                &self.ya,
                &msg2.public_share,
                CPACE_SESSION_INFO.as_bytes(),
            );
            Ok(PakeResult {
                shared_secret,
                session_key,
                success: true,
            })
        })();
        a.zeroize();
        outcome
    }
}

/// CPace initiator: the party that sends the first message.
pub struct CpaceInitiator;

impl CpaceInitiator {
    /// Start a CPace exchange using the OS CSPRNG.
    ///
    /// # Arguments
    ///
    /// * `password` - The shared password; consumed and zeroized internally
    /// * `context` - Non-secret associated data bound into the exchange
    /// * `sid` - An optional session id; falls back to a fixed default when
    ///   `None` (see the "CPace sessionId" open question)
    ///
    /// # Returns
    ///
    /// `(msg1, state)` — send `msg1` to the responder, then call
    /// [`CpaceInitiatorState::finalize`] with their reply.
    pub fn initiate(
        password: Vec<u8>,
        context: &[u8],
        sid: Option<&[u8]>,
    ) -> Result<(CpaceMessage1, CpaceInitiatorState)> {
        Self::initiate_with_rng(&mut OsRng, password, context, sid)
    }

    /// Start a CPace exchange with an explicit RNG (for deterministic
    /// tests; production callers should use [`CpaceInitiator::initiate`]).
    ///
    /// # Arguments
    ///
    /// * `rng` - The CSPRNG to draw the ephemeral scalar from
    /// * `password` - The shared password; consumed and zeroized internally
    /// * `context` - Non-secret associated data bound into the exchange
    /// * `sid` - An optional session id; falls back to a fixed default when
    ///   `None`
    ///
    /// # Returns
    ///
    /// `(msg1, state)` — send `msg1` to the responder, then call
    /// [`CpaceInitiatorState::finalize`] with their reply.
    pub fn initiate_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        password: Vec<u8>,
        context: &[u8],
        sid: Option<&[u8]>,
    ) -> Result<(CpaceMessage1, CpaceInitiatorState)> {
        let mut hash_input = cpace_hash_input(password, context, resolve_sid(sid));
        let gpw_point = hash_to_curve(&hash_input, CPACE_DST.as_bytes());
        hash_input.zeroize();
        let gpw = GroupElement::from_point(gpw_point)?;

        let a = random_scalar(rng)?;
        let ya = scalar_mul(&gpw, &a)?;
        let ya_bytes = ya.encode();

        let msg1 = CpaceMessage1 {
            public_share: ya_bytes,
            associated_data: context.to_vec(),
        };
        let state = CpaceInitiatorState {
            a: Some(a),
            ya: ya_bytes,
        };
        Ok((msg1, state))
    }
}

/// CPace responder: the party that replies to the first message and
/// completes the exchange in one step.
pub struct CpaceResponder;

impl CpaceResponder {
    /// Respond to `msg1` using the OS CSPRNG.
    ///
    /// # Arguments
    ///
    /// * `password` - The shared password; consumed and zeroized internally
    /// * `context` - Non-secret associated data bound into the exchange
    /// * `sid` - An optional session id; falls back to a fixed default when
    ///   `None`
    /// * `msg1` - The initiator's first message
    ///
    /// # Returns
    ///
    /// `(msg2, result)` — send `msg2` back to the initiator; `result`
    /// already carries this side's agreed `PakeResult`.
    pub fn respond(
        password: Vec<u8>,
        context: &[u8],
        sid: Option<&[u8]>,
        msg1: &CpaceMessage1,
    ) -> Result<(CpaceMessage2, PakeResult)> {
        Self::respond_with_rng(&mut OsRng, password, context, sid, msg1)
    }

    /// Respond with an explicit RNG (for deterministic tests).
    ///
    /// # Arguments
    ///
    /// * `rng` - The CSPRNG to draw the ephemeral scalar from
    /// * `password` - The shared password; consumed and zeroized internally
    /// * `context` - Non-secret associated data bound into the exchange
    /// * `sid` - An optional session id; falls back to a fixed default when
    ///   `None`
    /// * `msg1` - The initiator's first message
    ///
    /// # Returns
    ///
    /// `(msg2, result)` — send `msg2` back to the initiator; `result`
    /// already carries this side's agreed `PakeResult`.
    pub fn respond_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        password: Vec<u8>,
        context: &[u8],
        sid: Option<&[u8]>,
        msg1: &CpaceMessage1,
    ) -> Result<(CpaceMessage2, PakeResult)> {
        let ya = GroupElement::decode(&msg1.public_share)?;

        let mut hash_input = cpace_hash_input(password, context, resolve_sid(sid));
        let gpw_point = hash_to_curve(&hash_input, CPACE_DST.as_bytes());
        hash_input.zeroize();
        let gpw = GroupElement::from_point(gpw_point)?;

        let mut b = random_scalar(rng)?;
        let yb = scalar_mul(&gpw, &b)?;
        let yb_bytes = yb.encode();

        let outcome = (|| {
            let k = scalar_mul(&ya, &b)?;
            let (shared_secret, session_key) = derive_session_key(
                &k.encode(),
                &msg1.public_share,
                &yb_bytes,
                CPACE_SESSION_INFO.as_bytes(),
            );
            Ok(PakeResult {
                shared_secret,
                session_key,
                success: true,
            })
        })();
        b.zeroize();
        let result = outcome?;

        let msg2 = CpaceMessage2 {
            public_share: yb_bytes,
            associated_data: context.to_vec(),
        };
        Ok((msg2, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &[u8] = b"tallow-cli";
    const SID: &[u8] = b"01";

    #[test]
    fn s1_happy_path_agrees_and_shares_differ() {
        let (msg1, mut state) =
            CpaceInitiator::initiate(b"hunter2".to_vec(), CONTEXT, Some(SID)).unwrap();
        let (msg2, responder_result) =
            CpaceResponder::respond(b"hunter2".to_vec(), CONTEXT, Some(SID), &msg1).unwrap();
        let initiator_result = state.finalize(&msg2).unwrap();

        assert_eq!(initiator_result.session_key, responder_result.session_key);
        assert_eq!(initiator_result.session_key.len(), 32);
        assert_ne!(initiator_result.session_key, [0u8; 32]);
        assert_ne!(msg1.public_share, msg2.public_share);
    }

    #[test]
    fn s2_mismatched_passwords_complete_with_different_keys() {
        let (msg1, mut state) =
            CpaceInitiator::initiate(b"hunter2".to_vec(), CONTEXT, Some(SID)).unwrap();
        let (msg2, responder_result) =
            CpaceResponder::respond(b"hunter3".to_vec(), CONTEXT, Some(SID), &msg1).unwrap();
        let initiator_result = state.finalize(&msg2).unwrap();

        assert_ne!(initiator_result.session_key, responder_result.session_key);
    }

    #[test]
    fn s3_tampered_share_is_rejected() {
        let (msg1, _state) =
            CpaceInitiator::initiate(b"hunter2".to_vec(), CONTEXT, Some(SID)).unwrap();
        let mut tampered = msg1.clone();
        tampered.public_share[0] ^= 0xFF;

        let result = CpaceResponder::respond(b"hunter2".to_vec(), CONTEXT, Some(SID), &tampered);
        assert!(matches!(
            result.unwrap_err(),
            PakeError::InvalidShare | PakeError::DegenerateResult
        ));
    }

    #[test]
    fn s4_finalize_is_single_use() {
        let (msg1, mut state) =
            CpaceInitiator::initiate(b"hunter2".to_vec(), CONTEXT, Some(SID)).unwrap();
        let (msg2, _) =
            CpaceResponder::respond(b"hunter2".to_vec(), CONTEXT, Some(SID), &msg1).unwrap();

        assert!(state.finalize(&msg2).is_ok());
        assert_eq!(state.finalize(&msg2).unwrap_err(), PakeError::BadState);
    }

    #[test]
    fn rejects_identity_public_share() {
        let identity_share = [0u8; 32]; // not a valid ristretto255 identity encoding,
                                         // but exercises the all-zero wire value from S4
        let msg1 = CpaceMessage1 {
            public_share: identity_share,
            associated_data: CONTEXT.to_vec(),
        };
        let result = CpaceResponder::respond(b"hunter2".to_vec(), CONTEXT, Some(SID), &msg1);
        assert_eq!(result.unwrap_err(), PakeError::InvalidShare);
    }

    #[test]
    fn fresh_runs_produce_fresh_shares_and_keys() {
        let (msg1_a, mut state_a) =
            CpaceInitiator::initiate(b"hunter2".to_vec(), CONTEXT, Some(SID)).unwrap();
        let (msg2_a, _) =
            CpaceResponder::respond(b"hunter2".to_vec(), CONTEXT, Some(SID), &msg1_a).unwrap();
        let result_a = state_a.finalize(&msg2_a).unwrap();

        let (msg1_b, mut state_b) =
            CpaceInitiator::initiate(b"hunter2".to_vec(), CONTEXT, Some(SID)).unwrap();
        let (msg2_b, _) =
            CpaceResponder::respond(b"hunter2".to_vec(), CONTEXT, Some(SID), &msg1_b).unwrap();
        let result_b = state_b.finalize(&msg2_b).unwrap();

        assert_ne!(msg1_a.public_share, msg1_b.public_share);
        assert_ne!(result_a.session_key, result_b.session_key);
    }

    #[test]
    fn default_sid_is_used_when_none_supplied() {
        let (msg1, mut state) =
            CpaceInitiator::initiate(b"hunter2".to_vec(), CONTEXT, None).unwrap();
        let (msg2, responder_result) =
            CpaceResponder::respond(b"hunter2".to_vec(), CONTEXT, None, &msg1).unwrap();
        let initiator_result = state.finalize(&msg2).unwrap();
        assert_eq!(initiator_result.session_key, responder_result.session_key);
    }

    #[test]
    fn initiator_scalar_is_cleared_after_finalize() {
        let (msg1, mut state) =
            CpaceInitiator::initiate(b"hunter2".to_vec(), CONTEXT, Some(SID)).unwrap();
        let (msg2, _) =
            CpaceResponder::respond(b"hunter2".to_vec(), CONTEXT, Some(SID), &msg1).unwrap();
        assert!(state.peek_scalar().is_some());
        state.finalize(&msg2).unwrap();
        assert!(state.peek_scalar().is_none());
        assert!(state.is_spent());
    }
}
