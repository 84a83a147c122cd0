use calls::{CallbackExecutor, Task};

/// Runs every task immediately on the thread that submits it.
///
/// Useful in tests and in single-threaded programs that are already on the
/// thread they want callbacks on.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl CallbackExecutor for InlineExecutor {
    fn execute(&self, task: Task) {
        task()
    }
}
