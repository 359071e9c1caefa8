//! Identity and keypair management

pub mod fingerprint;
pub mod keypair;

pub use fingerprint::{fingerprint_emoji, fingerprint_hex, fingerprint_short};
pub use keypair::IdentityStore;
