//! Wire packet model.
//!
//! Every packet is a two-element tagged array: `[format, body]`.
//!
//! - `["omi", [objectId, method, [args...]]]` - object method invocation
//! - `["edo", result]` - successful invocation result
//! - `["err", errorType]` - error instead of a result
//!
//! Unknown discriminators are preserved as [`Packet::Unknown`] so receivers
//! can log and ignore them without failing to decode the stream (forward
//! compatibility with future packet kinds).
//!
//! The serde implementations produce and consume exactly this array shape,
//! so any self-describing serde format (MessagePack, JSON) yields the same
//! logical wire structure.

use serde::de::{Deserialize, Deserializer, Error as DeError};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::Value;

/// Format discriminator for an object method invocation.
pub const FMT_OMI: &str = "omi";
/// Format discriminator for an encoded result object.
pub const FMT_EDO: &str = "edo";
/// Format discriminator for an error response.
pub const FMT_ERR: &str = "err";

/// A single wire packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// `["omi", [objectId, method, args]]` - invoke `method` on the object
    /// bound under `objectId` with positional `args`.
    Invocation {
        object_id: String,
        method: String,
        args: Vec<Value>,
    },
    /// `["edo", result]` - successful return value. A multi-value result is
    /// carried as a `Value::Array` body, order preserved.
    Result(Value),
    /// `["err", errorType]` - error indicator instead of a result.
    Error(Value),
    /// Any other discriminator. Tolerated, logged and ignored by receivers.
    Unknown { format: String, body: Value },
}

impl Packet {
    /// Build an invocation packet.
    pub fn invocation(
        object_id: impl Into<String>,
        method: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Packet::Invocation {
            object_id: object_id.into(),
            method: method.into(),
            args,
        }
    }

    /// The format discriminator of this packet.
    pub fn format(&self) -> &str {
        match self {
            Packet::Invocation { .. } => FMT_OMI,
            Packet::Result(_) => FMT_EDO,
            Packet::Error(_) => FMT_ERR,
            Packet::Unknown { format, .. } => format,
        }
    }

    /// Consume the packet and return its body as a dynamic value.
    ///
    /// Used on the calling side, where any non-error discriminator counts as
    /// a result and the body is handed to the caller as-is.
    pub fn into_body(self) -> Value {
        match self {
            Packet::Invocation {
                object_id,
                method,
                args,
            } => Value::Array(vec![
                Value::String(object_id),
                Value::String(method),
                Value::Array(args),
            ]),
            Packet::Result(body) => body,
            Packet::Error(body) => body,
            Packet::Unknown { body, .. } => body,
        }
    }
}

impl Serialize for Packet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        match self {
            Packet::Invocation {
                object_id,
                method,
                args,
            } => {
                tuple.serialize_element(FMT_OMI)?;
                tuple.serialize_element(&(object_id, method, args))?;
            }
            Packet::Result(body) => {
                tuple.serialize_element(FMT_EDO)?;
                tuple.serialize_element(body)?;
            }
            Packet::Error(body) => {
                tuple.serialize_element(FMT_ERR)?;
                tuple.serialize_element(body)?;
            }
            Packet::Unknown { format, body } => {
                tuple.serialize_element(format)?;
                tuple.serialize_element(body)?;
            }
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Packet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (format, body): (String, Value) = Deserialize::deserialize(deserializer)?;
        Ok(match format.as_str() {
            FMT_OMI => {
                let (object_id, method, args): (String, String, Vec<Value>) =
                    serde_json::from_value(body).map_err(D::Error::custom)?;
                Packet::Invocation {
                    object_id,
                    method,
                    args,
                }
            }
            FMT_EDO => Packet::Result(body),
            FMT_ERR => Packet::Error(body),
            _ => Packet::Unknown { format, body },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invocation_wire_shape() {
        let packet = Packet::invocation("X", "foo", vec![json!(1), json!(2), json!(3)]);
        let wire = serde_json::to_value(&packet).unwrap();
        assert_eq!(wire, json!(["omi", ["X", "foo", [1, 2, 3]]]));
    }

    #[test]
    fn test_result_wire_shape() {
        let packet = Packet::Result(json!("OK"));
        let wire = serde_json::to_value(&packet).unwrap();
        assert_eq!(wire, json!(["edo", "OK"]));
    }

    #[test]
    fn test_error_wire_shape() {
        let packet = Packet::Error(json!("ObjectNotBound"));
        let wire = serde_json::to_value(&packet).unwrap();
        assert_eq!(wire, json!(["err", "ObjectNotBound"]));
    }

    #[test]
    fn test_decode_invocation() {
        let packet: Packet =
            serde_json::from_value(json!(["omi", ["objectId", "testFunction", [1, 2, 3]]]))
                .unwrap();
        assert_eq!(
            packet,
            Packet::invocation("objectId", "testFunction", vec![json!(1), json!(2), json!(3)])
        );
    }

    #[test]
    fn test_unknown_format_tolerated() {
        let packet: Packet = serde_json::from_value(json!(["UNK", []])).unwrap();
        assert_eq!(
            packet,
            Packet::Unknown {
                format: "UNK".to_string(),
                body: json!([]),
            }
        );
        // Unknown packets re-encode losslessly.
        let wire = serde_json::to_value(&packet).unwrap();
        assert_eq!(wire, json!(["UNK", []]));
    }

    #[test]
    fn test_malformed_invocation_body_is_an_error() {
        let result: Result<Packet, _> = serde_json::from_value(json!(["omi", "not a body"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_format_accessor() {
        assert_eq!(Packet::invocation("a", "b", vec![]).format(), "omi");
        assert_eq!(Packet::Result(json!(null)).format(), "edo");
        assert_eq!(Packet::Error(json!("E")).format(), "err");
        let unknown = Packet::Unknown {
            format: "xyz".to_string(),
            body: json!(null),
        };
        assert_eq!(unknown.format(), "xyz");
    }

    #[test]
    fn test_into_body() {
        assert_eq!(Packet::Result(json!(["a", "b"])).into_body(), json!(["a", "b"]));
        assert_eq!(Packet::Error(json!("E")).into_body(), json!("E"));
        assert_eq!(
            Packet::invocation("X", "m", vec![json!(1)]).into_body(),
            json!(["X", "m", [1]])
        );
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let packet = Packet::invocation("X", "concat", vec![json!("A"), json!("BB")]);
        let bytes = rmp_serde::to_vec(&packet).unwrap();
        let decoded: Packet = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded, packet);
    }
}
