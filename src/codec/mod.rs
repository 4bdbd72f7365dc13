//! Codec module - serialization/deserialization for wire packets.
//!
//! This module provides codecs for encoding/decoding packets:
//!
//! - [`MsgPackCodec`] - MessagePack using `rmp-serde` (compact binary wire)
//! - [`JsonCodec`] - JSON using `serde_json` (human-readable wire)
//!
//! # Design
//!
//! Codecs are marker structs with associated functions, selected at compile
//! time. The [`Codec`] trait exists so a transport can be generic over the
//! wire encoding; both codecs produce the same logical `[format, body]`
//! packet shape.
//!
//! # Example
//!
//! ```
//! use function_channel::codec::{Codec, JsonCodec, MsgPackCodec};
//!
//! let encoded = MsgPackCodec::encode(&"hello").unwrap();
//! let decoded: String = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, "hello");
//!
//! let encoded = JsonCodec::encode(&42i32).unwrap();
//! assert_eq!(encoded, b"42");
//! ```

mod json;
mod msgpack;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;

use crate::error::Result;

/// A compile-time-selected wire encoding.
pub trait Codec {
    /// Encode a value to bytes.
    fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>>;

    /// Decode bytes to a value.
    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T>;
}
