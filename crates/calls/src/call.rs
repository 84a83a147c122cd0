//! The call contract and its asynchronous completion ports.
//!
//! A [`Call`] is one request/response exchange with a synchronous entry point
//! ([`Call::execute`]) and an asynchronous one ([`Call::enqueue`]). Asynchronous
//! completion is reported to a [`Callback`]; where that callback runs is decided
//! by whoever supplies a [`CallbackExecutor`].

use std::sync::Arc;

use crate::{CallError, Request, Response};

// ---------------------------------------------------------------------------
// Call
// ---------------------------------------------------------------------------

/// One request/response exchange.
///
/// Implementations are single-shot: a call is either enqueued or executed,
/// once. State transitions are `idle → executing → completed | canceled`.
/// Use [`Call::clone_call`] to repeat the same request.
pub trait Call<T>: Send + Sync {
    /// Starts the exchange asynchronously and reports the outcome to `callback`.
    ///
    /// Exactly one of [`Callback::on_response`] or [`Callback::on_failure`] is
    /// invoked, exactly once. Returns [`CallError::InvalidArgument`] if
    /// `callback` is `None`, without starting anything.
    fn enqueue(&self, callback: Option<Box<dyn Callback<T>>>) -> Result<(), CallError>;

    /// Runs the exchange synchronously, blocking the calling thread.
    fn execute(&self) -> Result<Response<T>, CallError>;

    /// Cancels the exchange. Calling this on a canceled or completed call has no effect.
    fn cancel(&self);

    /// Returns `true` once [`Call::cancel`] has been called.
    fn is_canceled(&self) -> bool;

    /// Returns `true` once the call has been enqueued or executed.
    fn is_executed(&self) -> bool;

    /// Creates a new, not-yet-executed call for the same request.
    ///
    /// The clone shares no execution or cancellation state with `self`.
    fn clone_call(&self) -> Box<dyn Call<T>>;

    /// Returns the request this call sends.
    fn request(&self) -> &Request;
}

// ---------------------------------------------------------------------------
// Callback
// ---------------------------------------------------------------------------

/// Completion handlers for an enqueued call.
///
/// Both methods consume the callback, so a callback can only ever observe one
/// outcome.
pub trait Callback<T>: Send {
    /// Invoked with the response once the exchange completes.
    fn on_response(self: Box<Self>, call: &dyn Call<T>, response: Response<T>);

    /// Invoked when the exchange fails or is canceled.
    fn on_failure(self: Box<Self>, call: &dyn Call<T>, error: CallError);
}

/// A [`Callback`] built from two closures. See [`callback_fn`].
pub struct FnCallback<R, F> {
    on_response: R,
    on_failure: F,
}

/// Adapts a pair of closures into a boxed [`Callback`].
pub fn callback_fn<T, R, F>(on_response: R, on_failure: F) -> Box<dyn Callback<T>>
where
    T: 'static,
    R: FnOnce(&dyn Call<T>, Response<T>) + Send + 'static,
    F: FnOnce(&dyn Call<T>, CallError) + Send + 'static,
{
    Box::new(FnCallback {
        on_response,
        on_failure,
    })
}

impl<T, R, F> Callback<T> for FnCallback<R, F>
where
    R: FnOnce(&dyn Call<T>, Response<T>) + Send,
    F: FnOnce(&dyn Call<T>, CallError) + Send,
{
    fn on_response(self: Box<Self>, call: &dyn Call<T>, response: Response<T>) {
        (self.on_response)(call, response)
    }

    fn on_failure(self: Box<Self>, call: &dyn Call<T>, error: CallError) {
        (self.on_failure)(call, error)
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// A unit of work submitted to a [`CallbackExecutor`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// An execution context that accepts units of work.
///
/// Decouples where callback code runs from where the underlying I/O
/// completes. Executors are shared (`Arc<dyn CallbackExecutor>`) and owned by
/// whoever created them, never by a call.
pub trait CallbackExecutor: Send + Sync {
    /// Submits `task` for execution. The task runs at most once.
    fn execute(&self, task: Task);
}

impl<E: CallbackExecutor + ?Sized> CallbackExecutor for Arc<E> {
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct NoopCall(Request);

    impl Call<String> for NoopCall {
        fn enqueue(&self, _callback: Option<Box<dyn Callback<String>>>) -> Result<(), CallError> {
            Ok(())
        }
        fn execute(&self) -> Result<Response<String>, CallError> {
            Err(CallError::AlreadyExecuted)
        }
        fn cancel(&self) {}
        fn is_canceled(&self) -> bool {
            false
        }
        fn is_executed(&self) -> bool {
            false
        }
        fn clone_call(&self) -> Box<dyn Call<String>> {
            Box::new(NoopCall(self.0.clone()))
        }
        fn request(&self) -> &Request {
            &self.0
        }
    }

    #[test]
    fn callback_fn_routes_response_to_first_closure() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let call = NoopCall(Request::get("http://localhost/").unwrap());

        let callback = callback_fn(
            move |_: &dyn Call<String>, response: Response<String>| {
                *sink.lock().unwrap() = response.into_body();
            },
            |_: &dyn Call<String>, error: CallError| panic!("unexpected failure: {error}"),
        );
        callback.on_response(&call, Response::new(200, Vec::new(), Some("ok".to_string())));

        assert_eq!(seen.lock().unwrap().as_deref(), Some("ok"));
    }

    #[test]
    fn callback_fn_routes_failure_to_second_closure() {
        let seen = Arc::new(Mutex::new(false));
        let sink = Arc::clone(&seen);
        let call = NoopCall(Request::get("http://localhost/").unwrap());

        let callback = callback_fn(
            |_: &dyn Call<String>, _: Response<String>| panic!("unexpected response"),
            move |_: &dyn Call<String>, error: CallError| {
                *sink.lock().unwrap() = error.is_canceled();
            },
        );
        callback.on_failure(&call, CallError::canceled());

        assert!(*seen.lock().unwrap());
    }

    #[test]
    fn arc_executor_forwards_tasks() {
        struct Immediate;
        impl CallbackExecutor for Immediate {
            fn execute(&self, task: Task) {
                task()
            }
        }

        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        let executor: Arc<dyn CallbackExecutor> = Arc::new(Immediate);
        executor.execute(Box::new(move || *flag.lock().unwrap() = true));

        assert!(*ran.lock().unwrap());
    }
}
