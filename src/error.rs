//! Error types for function-channel.

use serde_json::Value;
use thiserror::Error;

/// Main error type for all function-channel operations.
#[derive(Debug, Error)]
pub enum FunctionChannelError {
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// Protocol error (malformed packet, unexpected shape, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The remote endpoint answered with an `err` packet.
    ///
    /// Carries the error-type value verbatim; this layer does not interpret
    /// its internal structure.
    #[error("Remote error: {0}")]
    Remote(Value),

    /// The transport gave up waiting for the correlated response.
    #[error("Response timeout")]
    Timeout,

    /// The peer endpoint is gone (transport closed, responder dropped).
    #[error("Connection closed")]
    ConnectionClosed,

    /// Operation on a channel that has already been destroyed.
    #[error("Channel destroyed")]
    Destroyed,
}

/// Result type alias using FunctionChannelError.
pub type Result<T> = std::result::Result<T, FunctionChannelError>;
