//! The executor-dispatching call decorator.

use std::sync::Arc;

use calls::{Call, CallError, Callback, CallbackExecutor, Request, Response};
use tracing::debug;

/// A [`Call`] that delivers enqueue outcomes through a [`CallbackExecutor`].
///
/// Owns exactly one wrapped call and shares the executor with whoever created
/// it. Every operation except [`Call::enqueue`] is forwarded unchanged. For
/// enqueued calls:
///
/// - a response is delivered as [`Callback::on_response`] unless the wrapped
///   call reports canceled when the response is observed, in which case
///   [`Callback::on_failure`] receives [`CallError::canceled`] instead;
/// - a failure is forwarded as-is;
/// - delivery always runs inside a task submitted to the executor, and the
///   `call` passed to the callback is this decorator, not the wrapped call.
pub struct ExecutorCallbackCall<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    callback_executor: Arc<dyn CallbackExecutor>,
    delegate: Box<dyn Call<T>>,
}

impl<T> ExecutorCallbackCall<T> {
    pub fn new(callback_executor: Arc<dyn CallbackExecutor>, delegate: Box<dyn Call<T>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                callback_executor,
                delegate,
            }),
        }
    }

    /// The executor completions are delivered on.
    pub fn callback_executor(&self) -> &Arc<dyn CallbackExecutor> {
        &self.shared.callback_executor
    }
}

impl<T: Send + 'static> Call<T> for ExecutorCallbackCall<T> {
    fn enqueue(&self, callback: Option<Box<dyn Callback<T>>>) -> Result<(), CallError> {
        let callback = callback.ok_or_else(|| CallError::invalid_argument("callback == null"))?;

        debug!(url = self.shared.delegate.request().url(), "enqueueing call");
        self.shared.delegate.enqueue(Some(Box::new(DispatchingCallback {
            shared: Arc::clone(&self.shared),
            callback,
        })))
    }

    fn execute(&self) -> Result<Response<T>, CallError> {
        self.shared.delegate.execute()
    }

    fn cancel(&self) {
        self.shared.delegate.cancel()
    }

    fn is_canceled(&self) -> bool {
        self.shared.delegate.is_canceled()
    }

    fn is_executed(&self) -> bool {
        self.shared.delegate.is_executed()
    }

    fn clone_call(&self) -> Box<dyn Call<T>> {
        Box::new(ExecutorCallbackCall::new(
            Arc::clone(&self.shared.callback_executor),
            self.shared.delegate.clone_call(),
        ))
    }

    fn request(&self) -> &Request {
        self.shared.delegate.request()
    }
}

// ---------------------------------------------------------------------------
// Completion hand-off
// ---------------------------------------------------------------------------

/// Registered with the wrapped call; re-posts its outcome to the executor.
struct DispatchingCallback<T> {
    shared: Arc<Shared<T>>,
    callback: Box<dyn Callback<T>>,
}

impl<T: Send + 'static> Callback<T> for DispatchingCallback<T> {
    fn on_response(self: Box<Self>, _call: &dyn Call<T>, response: Response<T>) {
        let DispatchingCallback { shared, callback } = *self;
        let executor = Arc::clone(&shared.callback_executor);

        // Decided once, here; a late cancel after this point does not change the outcome.
        if shared.delegate.is_canceled() {
            debug!(
                url = shared.delegate.request().url(),
                status = response.status(),
                "call canceled before delivery, reporting failure"
            );
            executor.execute(Box::new(move || {
                let call = ExecutorCallbackCall { shared };
                callback.on_failure(&call, CallError::canceled());
            }));
        } else {
            debug!(
                url = shared.delegate.request().url(),
                status = response.status(),
                "dispatching response"
            );
            executor.execute(Box::new(move || {
                let call = ExecutorCallbackCall { shared };
                callback.on_response(&call, response);
            }));
        }
    }

    fn on_failure(self: Box<Self>, _call: &dyn Call<T>, error: CallError) {
        let DispatchingCallback { shared, callback } = *self;
        let executor = Arc::clone(&shared.callback_executor);

        debug!(url = shared.delegate.request().url(), %error, "dispatching failure");
        executor.execute(Box::new(move || {
            let call = ExecutorCallbackCall { shared };
            callback.on_failure(&call, error);
        }));
    }
}
