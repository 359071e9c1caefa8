//! Ratcheting protocols for forward secrecy

pub mod double;
pub mod sparse_pq;
pub mod triple;

pub use double::DoubleRatchet;
pub use sparse_pq::SparsePqRatchet;
pub use triple::TripleRatchet;
