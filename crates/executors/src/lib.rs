//! Callback executors for Event Call.
//!
//! Implements the [`calls::CallbackExecutor`] port with three strategies:
//!
//! - [`InlineExecutor`] — runs each task immediately on the submitting thread.
//! - [`TokioExecutor`] — hands each task to a tokio runtime's blocking pool.
//! - [`SerialExecutor`] — owns one named OS thread and runs tasks on it in
//!   submission order, the way a UI toolkit's main thread would.
//!
//! | Executor | Runs on | Ordering |
//! |----------|---------|----------|
//! | `InlineExecutor` | submitter | immediate |
//! | `TokioExecutor` | tokio blocking pool | none |
//! | `SerialExecutor` | dedicated thread | FIFO |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Threads and runtimes live here. Decorators such as
//! `event-call` see only `Arc<dyn CallbackExecutor>`.

use std::panic::{self, AssertUnwindSafe};

use calls::Task;
use tracing::warn;

mod errors;
mod inline;
mod serial;
mod tokio_pool;

pub use errors::ExecutorError;
pub use inline::InlineExecutor;
pub use serial::{SerialExecutor, DEFAULT_THREAD_NAME};
pub use tokio_pool::TokioExecutor;

/// Runs `task`, logging instead of propagating a panic so the worker survives.
pub(crate) fn run_guarded(task: Task, executor: &'static str) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        warn!(executor, panic = message, "callback task panicked");
    }
}
