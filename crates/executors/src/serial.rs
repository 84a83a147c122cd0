use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use calls::{CallbackExecutor, Task};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{run_guarded, ExecutorError};

/// Thread name used by [`SerialExecutor::new`].
pub const DEFAULT_THREAD_NAME: &str = "callback-executor";

/// Runs tasks one at a time, in submission order, on a dedicated thread.
///
/// Dropping the executor closes its queue; the thread drains what was already
/// submitted and exits. [`SerialExecutor::shutdown`] does the same and waits
/// for the thread. Tasks submitted after shutdown are dropped with a warning.
pub struct SerialExecutor {
    thread_name: String,
    sender: Mutex<Option<mpsc::UnboundedSender<Task>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SerialExecutor {
    /// Starts an executor whose thread is named [`DEFAULT_THREAD_NAME`].
    pub fn new() -> Result<Self, ExecutorError> {
        Self::with_thread_name(DEFAULT_THREAD_NAME)
    }

    pub fn with_thread_name(name: impl Into<String>) -> Result<Self, ExecutorError> {
        let thread_name = name.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();

        let worker = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                while let Some(task) = receiver.blocking_recv() {
                    run_guarded(task, "serial");
                }
                debug!("serial executor queue closed, worker exiting");
            })
            .map_err(|source| ExecutorError::Spawn {
                name: thread_name.clone(),
                source,
            })?;

        debug!(thread = %thread_name, "serial executor started");
        Ok(Self {
            thread_name,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        })
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// Stops accepting tasks, lets queued tasks finish, and joins the worker.
    ///
    /// Safe to call more than once. When called from a task running on this
    /// executor the queue is closed but the join is skipped.
    pub fn shutdown(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }

        let worker = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(_) => None,
        };
        if let Some(worker) = worker {
            if worker.thread().id() == thread::current().id() {
                return;
            }
            if worker.join().is_err() {
                warn!(thread = %self.thread_name, "serial executor worker panicked");
            }
        }
    }
}

impl CallbackExecutor for SerialExecutor {
    fn execute(&self, task: Task) {
        let sender = match self.sender.lock() {
            Ok(sender) => sender,
            Err(poisoned) => poisoned.into_inner(),
        };
        let rejected = match sender.as_ref() {
            Some(sender) => sender.send(task).is_err(),
            None => true,
        };
        if rejected {
            warn!(thread = %self.thread_name, "serial executor is shut down, dropping task");
        }
    }
}

impl std::fmt::Debug for SerialExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialExecutor")
            .field("thread_name", &self.thread_name)
            .finish_non_exhaustive()
    }
}
