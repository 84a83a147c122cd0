use thiserror::Error;

/// Errors raised while constructing an executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The OS refused to start the executor's worker thread.
    #[error("Failed to spawn executor thread '{name}': {source}")]
    Spawn {
        /// Name the thread was to be given.
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// No tokio runtime was available to attach to.
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
