use calls::{CallbackExecutor, Task};
use tokio::runtime::Handle;

use crate::{run_guarded, ExecutorError};

/// Runs tasks on a tokio runtime's blocking thread pool.
///
/// Callbacks are plain closures that may block, so they go to
/// [`Handle::spawn_blocking`] rather than onto the async worker threads.
#[derive(Debug, Clone)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Attaches to the runtime the caller is running inside.
    pub fn current() -> Result<Self, ExecutorError> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl CallbackExecutor for TokioExecutor {
    fn execute(&self, task: Task) {
        // Detached: completion is observed by the task itself, not the submitter.
        drop(
            self.handle
                .spawn_blocking(move || run_guarded(task, "tokio")),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tokio::sync::oneshot;

    use super::*;

    #[test]
    fn current_fails_outside_a_runtime() {
        assert!(matches!(
            TokioExecutor::current(),
            Err(ExecutorError::NoRuntime(_))
        ));
    }

    #[tokio::test]
    async fn runs_task_off_the_submitting_thread() {
        let executor = TokioExecutor::current().unwrap();
        let (tx, rx) = oneshot::channel();
        let submitter = thread::current().id();

        executor.execute(Box::new(move || {
            let _ = tx.send(thread::current().id());
        }));

        assert_ne!(rx.await.unwrap(), submitter);
    }

    #[tokio::test]
    async fn panicking_task_does_not_poison_executor() {
        let executor = TokioExecutor::current().unwrap();
        let (tx, rx) = oneshot::channel();

        executor.execute(Box::new(|| panic!("callback blew up")));
        executor.execute(Box::new(move || {
            let _ = tx.send(42);
        }));

        assert_eq!(rx.await.unwrap(), 42);
    }
}
