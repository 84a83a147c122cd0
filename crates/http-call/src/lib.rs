//! Event Call HTTP transport adapter.
//!
//! Implements the [`calls::Call`] trait over `reqwest`. An [`HttpClient`]
//! creates one single-use [`HttpCall`] per [`calls::Request`]; enqueued calls
//! run on a tokio runtime and report completion from that runtime's threads.
//! Decorators such as `event-call` move that delivery elsewhere.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection handling, header mapping and body buffering
//! live here. The `calls` crate sees only [`calls::Call`].

mod call;
mod client;

pub use call::HttpCall;
pub use client::{HttpClient, HttpClientConfig};
