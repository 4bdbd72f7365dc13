//! JSON codec using `serde_json`.
//!
//! Produces the wire shape from the protocol description verbatim, e.g.
//! `["omi",["X","foo",[1,2,3]]]`. Useful for transports that want a
//! human-readable wire and for debugging.

use crate::codec::Codec;
use crate::error::Result;

/// JSON codec for wire packets and structured payloads.
pub struct JsonCodec;

impl Codec for JsonCodec {
    /// Encode a value to JSON bytes.
    #[inline]
    fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode JSON bytes to a value.
    #[inline]
    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Packet;
    use serde_json::json;

    #[test]
    fn test_invocation_wire_text() {
        let packet = Packet::invocation("X", "foo", vec![json!(1), json!(2), json!(3)]);
        let encoded = JsonCodec::encode(&packet).unwrap();
        assert_eq!(encoded, br#"["omi",["X","foo",[1,2,3]]]"#);
    }

    #[test]
    fn test_error_wire_text() {
        let packet = Packet::Error(json!("MethodNotExist"));
        let encoded = JsonCodec::encode(&packet).unwrap();
        assert_eq!(encoded, br#"["err","MethodNotExist"]"#);
    }

    #[test]
    fn test_roundtrip() {
        let packet = Packet::Result(json!(["DE", "F"]));
        let encoded = JsonCodec::encode(&packet).unwrap();
        let decoded: Packet = JsonCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let result: Result<Packet> = JsonCodec::decode(b"{not json");
        assert!(result.is_err());
    }
}
