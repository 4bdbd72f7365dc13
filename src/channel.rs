//! The function channel: invoke methods on objects bound at the remote
//! endpoint, and dispatch inbound invocations to locally bound objects.
//!
//! A [`FunctionChannel`] wraps exactly one [`Transport`] and owns a registry
//! of bound objects keyed by object-id. Outbound, [`invoke`] (push) and
//! [`invoke_with_result`] (request) format `omi` packets and hand them to
//! the transport. Inbound, one receive-loop task per channel resolves each
//! `omi` packet to a bound object and method, or synthesizes exactly one
//! `err` response when a response path was requested.
//!
//! [`invoke`]: FunctionChannel::invoke
//! [`invoke_with_result`]: FunctionChannel::invoke_with_result
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use function_channel::{FunctionChannel, MethodResult, MethodTable};
//! use function_channel::transport::memory;
//! use serde_json::json;
//!
//! let ((transport_a, inbound_a), (transport_b, inbound_b)) = memory::pair();
//! let local = FunctionChannel::new(transport_a, inbound_a);
//! let remote = FunctionChannel::new(transport_b, inbound_b);
//!
//! remote.bind(
//!     "greeter",
//!     Arc::new(MethodTable::new().method("hello", |args| {
//!         Ok(MethodResult::Value(json!(format!("hello {}", args[0]))))
//!     })),
//! );
//!
//! let result = local
//!     .invoke_with_result("greeter", "hello", vec![json!("world")], None)
//!     .await?;
//! assert_eq!(result, json!("hello world"));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::binding::{InvokeError, Invokable, MethodResult};
use crate::error::{FunctionChannelError, Result};
use crate::packet::Packet;
use crate::transport::{Delivery, Responder, Transport};

/// Error type sent when an invocation targets an id with no binding.
pub const ERROR_OBJECT_NOT_BOUND: &str = "ObjectNotBound";
/// Error type sent when the bound object has no matching method.
pub const ERROR_METHOD_NOT_EXIST: &str = "MethodNotExist";

/// Single-use handle for producing a deferred invocation result.
///
/// Handed to a [`MethodResult::Deferred`] closure; invoking
/// [`resolve`](Resolver::resolve) with a value sends `["edo", value]` through
/// the pending response path. Resolving after the channel was destroyed is a
/// silent no-op, and dropping the resolver unresolved leaves the caller to
/// the transport's own timeout.
#[derive(Debug)]
pub struct Resolver {
    responder: Responder,
    destroyed: Arc<AtomicBool>,
}

impl Resolver {
    /// Produce the deferred result.
    pub fn resolve(self, value: Value) {
        if self.destroyed.load(Ordering::SeqCst) {
            tracing::debug!("dropping deferred result for destroyed channel");
            return;
        }
        self.responder.respond(Packet::Result(value));
    }
}

struct Inner {
    /// Released (set to None) on destroy; never touched afterwards.
    transport: Mutex<Option<Arc<dyn Transport>>>,
    /// The binding registry. Exclusively owned by this channel.
    bindings: DashMap<String, Arc<dyn Invokable>>,
    /// Shared with issued resolvers so late resolutions become no-ops.
    destroyed: Arc<AtomicBool>,
}

impl Inner {
    fn on_delivery(&self, delivery: Delivery) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        match delivery.packet {
            Packet::Invocation {
                object_id,
                method,
                args,
            } => self.dispatch_invocation(&object_id, &method, args, delivery.responder),
            other => {
                tracing::warn!(format = other.format(), "ignoring non-invocation packet");
            }
        }
    }

    fn dispatch_invocation(
        &self,
        object_id: &str,
        method: &str,
        args: Vec<Value>,
        responder: Option<Responder>,
    ) {
        let object = match self.bindings.get(object_id) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                tracing::debug!(object_id, "invocation for unbound object");
                if let Some(responder) = responder {
                    responder.respond(Packet::Error(Value::from(ERROR_OBJECT_NOT_BOUND)));
                }
                return;
            }
        };

        match object.invoke(method, args) {
            Ok(MethodResult::Value(value)) => {
                if let Some(responder) = responder {
                    responder.respond(Packet::Result(value));
                }
            }
            Ok(MethodResult::Deferred(produce)) => match responder {
                Some(responder) => produce(Resolver {
                    responder,
                    destroyed: Arc::clone(&self.destroyed),
                }),
                // Push semantics: the deferred continuation is discarded
                // uninvoked.
                None => {}
            },
            Err(InvokeError::MethodNotFound) => {
                tracing::debug!(object_id, method, "invocation for missing method");
                if let Some(responder) = responder {
                    responder.respond(Packet::Error(Value::from(ERROR_METHOD_NOT_EXIST)));
                }
            }
            Err(InvokeError::Failed(error)) => {
                if let Some(responder) = responder {
                    responder.respond(Packet::Error(error));
                }
            }
        }
    }

    async fn recv_loop(self: Arc<Self>, mut inbound: mpsc::Receiver<Delivery>) {
        while let Some(delivery) = inbound.recv().await {
            self.on_delivery(delivery);
        }
    }
}

/// One endpoint of the object-method-invocation layer.
pub struct FunctionChannel {
    inner: Arc<Inner>,
    recv_task: JoinHandle<()>,
}

impl FunctionChannel {
    /// Create a channel over `transport`, consuming the transport's inbound
    /// delivery stream.
    ///
    /// Spawns the channel's single receive-loop task, so this must be called
    /// inside a tokio runtime. The registry starts empty.
    pub fn new(transport: Arc<dyn Transport>, inbound: mpsc::Receiver<Delivery>) -> Self {
        let inner = Arc::new(Inner {
            transport: Mutex::new(Some(transport)),
            bindings: DashMap::new(),
            destroyed: Arc::new(AtomicBool::new(false)),
        });
        let recv_task = tokio::spawn(Arc::clone(&inner).recv_loop(inbound));
        Self { inner, recv_task }
    }

    /// Whether [`destroy`](FunctionChannel::destroy) has run.
    pub fn destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Tear the channel down: stop receiving, release the transport
    /// reference, clear all bindings.
    ///
    /// Single-shot; repeated calls are no-ops. Every operation after destroy
    /// is silently absorbed: no panic, no further transport use. Resolvers
    /// already handed to bound methods become no-ops.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("destroying function channel");
        self.recv_task.abort();
        self.inner.transport.lock().unwrap().take();
        self.inner.bindings.clear();
    }

    /// Register `object` under `id`, silently replacing any prior binding
    /// for the same id. No-op after destroy.
    pub fn bind(&self, id: impl Into<String>, object: Arc<dyn Invokable>) {
        if self.destroyed() {
            return;
        }
        self.inner.bindings.insert(id.into(), object);
    }

    /// Remove the binding for `id`. Not an error if `id` was never bound;
    /// no-op after destroy.
    pub fn unbind(&self, id: &str) {
        if self.destroyed() {
            return;
        }
        self.inner.bindings.remove(id);
    }

    /// Fire-and-forget invocation of `method` on the remote object bound
    /// under `id` (push semantics).
    ///
    /// The transport is told there is no response expectation; any return
    /// value on the remote side is discarded. No-op (`Ok`) after destroy.
    pub async fn invoke(&self, id: &str, method: &str, args: Vec<Value>) -> Result<()> {
        let transport = match self.transport() {
            Some(transport) => transport,
            None => return Ok(()),
        };
        transport.send(Packet::invocation(id, method, args)).await
    }

    /// Invoke `method` on the remote object bound under `id` and wait for
    /// the result.
    ///
    /// The transport correlates the response and enforces `timeout`.
    /// Transport-level failures propagate verbatim; an `err` response
    /// surfaces as [`FunctionChannelError::Remote`]; any other discriminator
    /// counts as a result and its body is returned as-is (a multi-value
    /// result arrives as a `Value::Array`, order preserved).
    ///
    /// Fails with [`FunctionChannelError::Destroyed`] after destroy, since a
    /// result can never arrive.
    pub async fn invoke_with_result(
        &self,
        id: &str,
        method: &str,
        args: Vec<Value>,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        let transport = self.transport().ok_or(FunctionChannelError::Destroyed)?;
        let response = transport
            .call(Packet::invocation(id, method, args), timeout)
            .await?;
        match response {
            Packet::Error(error) => Err(FunctionChannelError::Remote(error)),
            other => Ok(other.into_body()),
        }
    }

    fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.inner.transport.lock().unwrap().clone()
    }
}

impl Drop for FunctionChannel {
    fn drop(&mut self) {
        self.destroy();
    }
}
