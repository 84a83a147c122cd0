//! Core call abstractions for Event Call.
//!
//! This crate defines the contract every call implementation satisfies, the
//! callback and executor ports used for asynchronous completion, the adapter
//! registry that picks a call decorator for a declared return type, and the
//! shared value and error types. Infrastructure crates implement the traits
//! defined here; they never add call semantics of their own.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a call is; `http-call` defines how one talks to a server
//! and `executors` defines where completion callbacks run.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`CallId`) |
//! | [`types`] | Value types (`Method`, `Request`, `Response`, `ReturnType`) |
//! | [`call`] | `Call`, `Callback` and `CallbackExecutor` ports |
//! | [`adapter`] | `CallAdapter`, `CallAdapterFactory` and the adapter registry |
//! | [`errors`] | The `CallError` taxonomy |

pub mod adapter;
pub mod call;
pub mod errors;
pub mod identifiers;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use adapter::{CallAdapter, CallAdapterFactory, CallAdapterRegistry, DirectCallAdapterFactory};
pub use call::{callback_fn, Call, Callback, CallbackExecutor, FnCallback, Task};
pub use errors::CallError;
pub use identifiers::CallId;
pub use types::{Method, Request, Response, ReturnType};
