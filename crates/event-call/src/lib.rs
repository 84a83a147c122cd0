//! Event Call: completion delivery on a caller-chosen executor.
//!
//! [`ExecutorCallbackCall`] decorates any [`calls::Call`] so that the outcome of
//! [`calls::Call::enqueue`] is delivered through a [`calls::CallbackExecutor`]
//! instead of on the thread the transport completes on. Everything else is
//! forwarded to the wrapped call.
//!
//! [`EventCallAdapterFactory`] plugs the decorator into a
//! [`calls::CallAdapterRegistry`] for return types declared as `EventCall<R>`.
//!
//! ## Architectural Layer
//!
//! **Decorator.** Holds no state of its own beyond the wrapped call and a
//! shared executor handle; transport and scheduling live in other crates.

mod call;
mod factory;

pub use call::ExecutorCallbackCall;
pub use factory::{EventCallAdapterFactory, EVENT_CALL_TYPE_NAME};
