//! Wire protocol encoding/decoding

pub mod codec;
pub mod messages;
pub mod version;

pub use codec::TallowCodec;
pub use messages::Message;
pub use version::{PROTOCOL_VERSION, negotiate_version};
