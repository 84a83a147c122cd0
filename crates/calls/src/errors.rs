//! Error taxonomy shared by every call implementation.
//!
//! [`CallError`] is what a [`crate::Call`] returns from its synchronous entry
//! points and what it hands to [`crate::Callback::on_failure`]. Decorators
//! forward these values untouched; the only error a decorator synthesizes is
//! the cancellation error built by [`CallError::canceled`].

use std::io;

use thiserror::Error;

/// Message carried by the I/O error that reports a canceled call.
pub const CANCELED_MESSAGE: &str = "Canceled";

// ---------------------------------------------------------------------------
// Call errors
// ---------------------------------------------------------------------------

/// Errors produced while building, adapting or running a call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The caller supplied an argument the call cannot accept.
    ///
    /// Produced before any delegation happens, e.g. `enqueue(None)`.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// An input/output failure raised by the transport.
    ///
    /// Cancellation is reported through this variant as well (see
    /// [`CallError::canceled`]), so callers observe cancellation only through
    /// the failure channel.
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    /// A single-use call was enqueued or executed a second time.
    #[error("Already executed")]
    AlreadyExecuted,

    /// The declared return type cannot be served by the factory that matched it.
    #[error("Invalid return type '{return_type}': {reason}")]
    InvalidReturnType {
        /// The declared return type as written.
        return_type: String,
        /// Why the factory rejected it.
        reason: String,
    },

    /// No registered factory accepts the declared return type.
    #[error("No call adapter registered for '{return_type}'")]
    NoAdapter {
        /// The declared return type as written.
        return_type: String,
    },

    /// The HTTP layer failed to produce a response.
    #[error("Transport failure: {message}")]
    Transport {
        /// Human-readable summary of the failure.
        message: String,
        /// Underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CallError {
    /// Builds the error delivered for a call that was canceled.
    ///
    /// Cancellation surfaces as an I/O error whose message is `"Canceled"`,
    /// matching the convention of the underlying HTTP stack.
    pub fn canceled() -> Self {
        CallError::Io(io::Error::new(io::ErrorKind::Interrupted, CANCELED_MESSAGE))
    }

    /// Builds an [`CallError::InvalidArgument`] from a message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CallError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns `true` if this is the cancellation error built by [`CallError::canceled`].
    pub fn is_canceled(&self) -> bool {
        match self {
            CallError::Io(err) => {
                err.kind() == io::ErrorKind::Interrupted && err.to_string() == CANCELED_MESSAGE
            }
            _ => false,
        }
    }
}
