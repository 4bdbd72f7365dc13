//! In-memory paired transport.
//!
//! Two endpoints connected by tokio channels, with the same contract a real
//! transport must provide: packets are encoded through a [`Codec`] on the
//! way out and decoded on the way in, request frames carry a one-shot reply
//! path, and `call` enforces its timeout locally. Used by the integration
//! tests and demos, and as the reference for implementing real transports.
//!
//! Must be created inside a tokio runtime (each endpoint runs a pump task).

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};

use crate::codec::{Codec, MsgPackCodec};
use crate::error::{FunctionChannelError, Result};
use crate::packet::Packet;
use crate::transport::{Delivery, Responder, Transport};

/// Buffered deliveries per endpoint before the pump awaits the consumer.
const DELIVERY_BUFFER: usize = 64;

/// A frame on the in-memory wire.
enum WireFrame {
    /// One-way packet, no response path.
    OneWay(Bytes),
    /// Request packet; the encoded response travels back over the sender.
    Request(Bytes, oneshot::Sender<Bytes>),
}

/// One endpoint of an in-memory transport pair.
pub struct MemoryTransport<C: Codec = MsgPackCodec> {
    peer_tx: mpsc::UnboundedSender<WireFrame>,
    _codec: PhantomData<fn() -> C>,
}

/// An endpoint handed to a channel: the outbound transport plus the inbound
/// delivery stream.
pub type Endpoint<C = MsgPackCodec> = (Arc<MemoryTransport<C>>, mpsc::Receiver<Delivery>);

/// Create a MessagePack-encoded transport pair.
pub fn pair() -> (Endpoint, Endpoint) {
    pair_with_codec::<MsgPackCodec>()
}

/// Create a transport pair using a specific wire encoding.
pub fn pair_with_codec<C>() -> (Endpoint<C>, Endpoint<C>)
where
    C: Codec + Send + Sync + 'static,
{
    let (to_a, from_b) = mpsc::unbounded_channel();
    let (to_b, from_a) = mpsc::unbounded_channel();
    let (a_delivery_tx, a_delivery_rx) = mpsc::channel(DELIVERY_BUFFER);
    let (b_delivery_tx, b_delivery_rx) = mpsc::channel(DELIVERY_BUFFER);

    tokio::spawn(pump::<C>(from_b, a_delivery_tx));
    tokio::spawn(pump::<C>(from_a, b_delivery_tx));

    let a = Arc::new(MemoryTransport {
        peer_tx: to_b,
        _codec: PhantomData,
    });
    let b = Arc::new(MemoryTransport {
        peer_tx: to_a,
        _codec: PhantomData,
    });
    ((a, a_delivery_rx), (b, b_delivery_rx))
}

/// Decode inbound frames and forward them as deliveries.
async fn pump<C>(mut frames: mpsc::UnboundedReceiver<WireFrame>, deliveries: mpsc::Sender<Delivery>)
where
    C: Codec + Send + Sync + 'static,
{
    while let Some(frame) = frames.recv().await {
        match frame {
            WireFrame::OneWay(bytes) => match C::decode::<Packet>(&bytes) {
                Ok(packet) => {
                    let _ = deliveries.send(Delivery::push(packet)).await;
                }
                Err(e) => tracing::error!("failed to decode inbound packet: {}", e),
            },
            WireFrame::Request(bytes, reply_tx) => match C::decode::<Packet>(&bytes) {
                Ok(packet) => {
                    let (response_tx, response_rx) = oneshot::channel();
                    let delivery = Delivery::request(packet, Responder::new(response_tx));
                    if deliveries.send(delivery).await.is_err() {
                        // Consumer gone; dropping reply_tx fails the
                        // peer's call with ConnectionClosed.
                        continue;
                    }
                    tokio::spawn(async move {
                        if let Ok(response) = response_rx.await {
                            match C::encode(&response) {
                                Ok(encoded) => {
                                    let _ = reply_tx.send(Bytes::from(encoded));
                                }
                                Err(e) => {
                                    tracing::error!("failed to encode response: {}", e)
                                }
                            }
                        }
                    });
                }
                Err(e) => tracing::error!("failed to decode inbound request: {}", e),
            },
        }
    }
}

#[async_trait]
impl<C> Transport for MemoryTransport<C>
where
    C: Codec + Send + Sync + 'static,
{
    async fn send(&self, packet: Packet) -> Result<()> {
        let encoded = Bytes::from(C::encode(&packet)?);
        self.peer_tx
            .send(WireFrame::OneWay(encoded))
            .map_err(|_| FunctionChannelError::ConnectionClosed)
    }

    async fn call(&self, packet: Packet, timeout: Option<Duration>) -> Result<Packet> {
        let encoded = Bytes::from(C::encode(&packet)?);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.peer_tx
            .send(WireFrame::Request(encoded, reply_tx))
            .map_err(|_| FunctionChannelError::ConnectionClosed)?;

        let reply = match timeout {
            Some(limit) => tokio::time::timeout(limit, reply_rx)
                .await
                .map_err(|_| FunctionChannelError::Timeout)?,
            None => reply_rx.await,
        };
        let bytes = reply.map_err(|_| FunctionChannelError::ConnectionClosed)?;
        C::decode(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use serde_json::json;

    #[tokio::test]
    async fn test_one_way_send_is_delivered() {
        let ((a, _a_rx), (_b, mut b_rx)) = pair();

        let packet = Packet::invocation("X", "foo", vec![json!(1)]);
        a.send(packet.clone()).await.unwrap();

        let delivery = b_rx.recv().await.unwrap();
        assert_eq!(delivery.packet, packet);
        assert!(delivery.responder.is_none());
    }

    #[tokio::test]
    async fn test_call_roundtrip() {
        let ((a, _a_rx), (_b, mut b_rx)) = pair();

        let responder_side = tokio::spawn(async move {
            let delivery = b_rx.recv().await.unwrap();
            assert_eq!(delivery.packet.format(), "omi");
            delivery
                .responder
                .unwrap()
                .respond(Packet::Result(json!("OK")));
        });

        let response = a
            .call(Packet::invocation("X", "foo", vec![]), None)
            .await
            .unwrap();
        assert_eq!(response, Packet::Result(json!("OK")));
        responder_side.await.unwrap();
    }

    #[tokio::test]
    async fn test_call_times_out_when_unanswered() {
        let ((a, _a_rx), (_b, mut b_rx)) = pair();

        // Keep the delivery (and its responder) alive but never respond.
        let hold = tokio::spawn(async move {
            let delivery = b_rx.recv().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(delivery);
        });

        let err = a
            .call(
                Packet::invocation("X", "foo", vec![]),
                Some(Duration::from_millis(50)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionChannelError::Timeout));
        hold.abort();
    }

    #[tokio::test]
    async fn test_dropped_responder_closes_call() {
        let ((a, _a_rx), (_b, mut b_rx)) = pair();

        tokio::spawn(async move {
            let delivery = b_rx.recv().await.unwrap();
            drop(delivery); // responder dropped without responding
        });

        let err = a
            .call(Packet::invocation("X", "foo", vec![]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionChannelError::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_json_codec_pair() {
        let ((a, _a_rx), (_b, mut b_rx)) = pair_with_codec::<JsonCodec>();

        a.send(Packet::Error(json!("E"))).await.unwrap();
        let delivery = b_rx.recv().await.unwrap();
        assert_eq!(delivery.packet, Packet::Error(json!("E")));
    }
}
