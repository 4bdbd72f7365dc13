//! Transport module - the external message-delivery boundary.
//!
//! The channel talks to the outside world through [`Transport`] (outbound)
//! and a stream of [`Delivery`] values (inbound). The transport owns framing,
//! delivery, request/response correlation and timeout enforcement; this crate
//! only defines the boundary and ships an in-memory reference implementation
//! ([`memory`]) used by tests and demos.

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::Result;
use crate::packet::Packet;

/// Outbound side of a bidirectional transport.
///
/// Implementations correlate `call` responses themselves; the channel never
/// generates or interprets correlation identifiers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// One-way send. No response is expected or correlated.
    async fn send(&self, packet: Packet) -> Result<()>;

    /// Send `packet` and wait for the correlated response.
    ///
    /// With a `timeout`, the transport must resolve within it or fail with
    /// [`FunctionChannelError::Timeout`](crate::FunctionChannelError::Timeout).
    /// Exactly one outcome is produced per call.
    async fn call(&self, packet: Packet, timeout: Option<Duration>) -> Result<Packet>;
}

/// An inbound packet plus its response path, if the sender expects one.
#[derive(Debug)]
pub struct Delivery {
    /// The decoded packet.
    pub packet: Packet,
    /// Present when the remote caller asked for a response.
    pub responder: Option<Responder>,
}

impl Delivery {
    /// A delivery carrying no response path (one-way send).
    pub fn push(packet: Packet) -> Self {
        Self {
            packet,
            responder: None,
        }
    }

    /// A delivery whose sender expects a response.
    pub fn request(packet: Packet, responder: Responder) -> Self {
        Self {
            packet,
            responder: Some(responder),
        }
    }
}

/// Single-use response path back to the remote caller.
///
/// Dropping a responder without responding leaves the correlation to the
/// transport's own failure handling (timeout or closed-connection error on
/// the calling side).
#[derive(Debug)]
pub struct Responder(oneshot::Sender<Packet>);

impl Responder {
    /// Wrap a oneshot sender as a response path.
    pub fn new(tx: oneshot::Sender<Packet>) -> Self {
        Self(tx)
    }

    /// Send the response packet. A no-op if the caller side is gone.
    pub fn respond(self, packet: Packet) {
        let _ = self.0.send(packet);
    }
}
