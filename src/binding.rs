//! The binding seam: what a bound object must implement.
//!
//! Bound objects expose a fixed invocation interface instead of arbitrary
//! members: [`Invokable::invoke`] receives the method name and positional
//! arguments and either produces a [`MethodResult`] or signals why it could
//! not ([`InvokeError`]).
//!
//! A method decides per call whether its result is available now
//! ([`MethodResult::Value`]) or must be produced later
//! ([`MethodResult::Deferred`]): the deferred closure is handed a
//! [`Resolver`](crate::channel::Resolver) and may invoke it whenever the
//! result is ready, while dispatch itself stays synchronous.
//!
//! [`MethodTable`] is a ready-made [`Invokable`] built from closures, for
//! callers that do not want to implement the trait by hand:
//!
//! ```
//! use function_channel::{MethodResult, MethodTable};
//! use serde_json::json;
//!
//! let table = MethodTable::new().method("add", |args| {
//!     let a = args[0].as_i64().unwrap_or(0);
//!     let b = args[1].as_i64().unwrap_or(0);
//!     Ok(MethodResult::Value(json!(a + b)))
//! });
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::channel::Resolver;

/// Deferred result producer: invoked with the resolver for the pending
/// response, called at most once.
pub type DeferredFn = Box<dyn FnOnce(Resolver) + Send + 'static>;

/// Outcome of a successful method call.
pub enum MethodResult {
    /// The result is available immediately.
    Value(Value),
    /// The result will be produced later through the resolver handed to the
    /// closure. If the resolver is never invoked, no response is ever sent;
    /// only a transport-side timeout can observe that.
    Deferred(DeferredFn),
}

impl MethodResult {
    /// Convenience constructor for a deferred result.
    pub fn deferred(f: impl FnOnce(Resolver) + Send + 'static) -> Self {
        MethodResult::Deferred(Box::new(f))
    }
}

impl std::fmt::Debug for MethodResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodResult::Value(v) => f.debug_tuple("Value").field(v).finish(),
            MethodResult::Deferred(_) => f.debug_tuple("Deferred").finish(),
        }
    }
}

/// Why a method call produced no result.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeError {
    /// The object has no method with the requested name. Reported to the
    /// remote caller as `["err", "MethodNotExist"]`.
    MethodNotFound,
    /// The method ran and signaled failure. The value is reported to the
    /// remote caller as `["err", value]`.
    Failed(Value),
}

/// Handler result for a single method call.
pub type InvokeResult = Result<MethodResult, InvokeError>;

/// An object eligible for remote invocation.
///
/// Registered with a channel under an object-id via
/// [`FunctionChannel::bind`](crate::FunctionChannel::bind).
pub trait Invokable: Send + Sync {
    /// Call `method` with positional `args`.
    fn invoke(&self, method: &str, args: Vec<Value>) -> InvokeResult;
}

/// Boxed method closure stored in a [`MethodTable`].
type MethodFn = Box<dyn Fn(Vec<Value>) -> InvokeResult + Send + Sync + 'static>;

/// Registry mapping method names to closures.
///
/// Lookup misses surface as [`InvokeError::MethodNotFound`]; registering a
/// name twice silently replaces the previous closure.
#[derive(Default)]
pub struct MethodTable {
    methods: HashMap<String, MethodFn>,
}

impl MethodTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Register a method closure, consuming and returning the table for
    /// fluent construction.
    pub fn method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> InvokeResult + Send + Sync + 'static,
    {
        self.methods.insert(name.to_string(), Box::new(f));
        self
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the table has no methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Invokable for MethodTable {
    fn invoke(&self, method: &str, args: Vec<Value>) -> InvokeResult {
        match self.methods.get(method) {
            Some(f) => f(args),
            None => Err(InvokeError::MethodNotFound),
        }
    }
}
