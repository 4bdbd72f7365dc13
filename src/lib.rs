//! # function-channel
//!
//! Object method invocation (OMI) layer over an abstract bidirectional
//! message transport: one endpoint invokes a named method on an object bound
//! at the remote endpoint and optionally receives the return value
//! asynchronously.
//!
//! ## Architecture
//!
//! - **Channel** ([`FunctionChannel`]): binding registry, outbound invoke,
//!   inbound dispatch, lifecycle.
//! - **Transport** ([`transport::Transport`]): external collaborator owning
//!   framing, delivery, correlation and timeouts. An in-memory pair ships in
//!   [`transport::memory`] for tests and demos.
//! - **Wire**: two-element tagged packets - `["omi", [id, method, args]]`,
//!   `["edo", result]`, `["err", errorType]` - encoded by a [`codec`].
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use function_channel::{FunctionChannel, MethodResult, MethodTable};
//! use function_channel::transport::memory;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), function_channel::FunctionChannelError> {
//!     let ((ta, ra), (tb, rb)) = memory::pair();
//!     let caller = FunctionChannel::new(ta, ra);
//!     let callee = FunctionChannel::new(tb, rb);
//!
//!     callee.bind(
//!         "calc",
//!         Arc::new(MethodTable::new().method("add", |args| {
//!             let sum: i64 = args.iter().filter_map(|a| a.as_i64()).sum();
//!             Ok(MethodResult::Value(json!(sum)))
//!         })),
//!     );
//!
//!     let sum = caller
//!         .invoke_with_result("calc", "add", vec![json!(1), json!(2)], None)
//!         .await?;
//!     assert_eq!(sum, json!(3));
//!     Ok(())
//! }
//! ```

pub mod binding;
pub mod channel;
pub mod codec;
pub mod error;
pub mod packet;
pub mod transport;

pub use binding::{DeferredFn, InvokeError, InvokeResult, Invokable, MethodResult, MethodTable};
pub use channel::{FunctionChannel, Resolver, ERROR_METHOD_NOT_EXIST, ERROR_OBJECT_NOT_BOUND};
pub use error::{FunctionChannelError, Result};
pub use packet::Packet;
