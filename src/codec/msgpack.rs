//! MsgPack codec using `rmp-serde`.
//!
//! The default wire encoding for the in-memory transport. Packets are
//! tuples, so positional `to_vec` is used; the decoded side sees the same
//! `[format, body]` array shape as JSON.

use crate::codec::Codec;
use crate::error::Result;

/// MessagePack codec for wire packets and structured payloads.
pub struct MsgPackCodec;

impl Codec for MsgPackCodec {
    /// Encode a value to MsgPack bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Packet;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct TestStruct {
        id: u32,
        name: String,
        active: bool,
    }

    #[test]
    fn test_encode_decode_struct() {
        let original = TestStruct {
            id: 42,
            name: "test".to_string(),
            active: true,
        };

        let encoded = MsgPackCodec::encode(&original).unwrap();
        let decoded: TestStruct = MsgPackCodec::decode(&encoded).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encode_decode_packet() {
        let packet = Packet::invocation("X", "foo", vec![json!("a"), json!(2)]);
        let encoded = MsgPackCodec::encode(&packet).unwrap();
        let decoded: Packet = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_packet_encodes_as_array() {
        let packet = Packet::Result(json!("OK"));
        let encoded = MsgPackCodec::encode(&packet).unwrap();

        // Packets are tuples, so the first byte must be a fixarray marker
        // (0x9X), never a map.
        assert_eq!(
            encoded[0] & 0xF0,
            0x90,
            "Expected array format (0x9X), got {:02X}",
            encoded[0]
        );
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let invalid = b"not valid msgpack";
        let result: Result<Packet> = MsgPackCodec::decode(invalid);
        assert!(result.is_err());
    }

    #[test]
    fn test_dynamic_value_roundtrip() {
        let value = json!({"nested": [1, 2.5, "three", null, true]});
        let encoded = MsgPackCodec::encode(&value).unwrap();
        let decoded: serde_json::Value = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, value);
    }
}
