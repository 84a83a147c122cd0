use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use calls::{Call, CallError, CallId, Callback, Method, Request, Response};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info_span, Instrument, Span};

/// A single-use HTTP exchange backed by `reqwest`.
///
/// [`Call::enqueue`] runs the exchange on the client's runtime and invokes the
/// callback from a runtime thread. [`Call::execute`] blocks the calling thread
/// and must not be used from inside that runtime. Canceling an in-flight call
/// abandons the exchange and completes it with [`CallError::canceled`].
pub struct HttpCall {
    inner: Arc<Inner>,
}

struct Inner {
    id: CallId,
    client: reqwest::Client,
    runtime: Handle,
    request: Request,
    executed: AtomicBool,
    canceled: watch::Sender<bool>,
}

impl HttpCall {
    pub(crate) fn new(client: reqwest::Client, runtime: Handle, request: Request) -> Self {
        let (canceled, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                id: CallId::new(),
                client,
                runtime,
                request,
                executed: AtomicBool::new(false),
                canceled,
            }),
        }
    }

    pub fn id(&self) -> CallId {
        self.inner.id
    }

    fn mark_executed(&self) -> Result<(), CallError> {
        if self.inner.executed.swap(true, Ordering::SeqCst) {
            return Err(CallError::AlreadyExecuted);
        }
        Ok(())
    }

    fn span(&self) -> Span {
        info_span!(
            "http_call",
            call_id = %self.inner.id,
            method = %self.inner.request.method(),
            url = self.inner.request.url(),
        )
    }
}

impl Call<Bytes> for HttpCall {
    fn enqueue(&self, callback: Option<Box<dyn Callback<Bytes>>>) -> Result<(), CallError> {
        let callback = callback.ok_or_else(|| CallError::invalid_argument("callback == null"))?;
        self.mark_executed()?;

        let inner = Arc::clone(&self.inner);
        let span = self.span();
        self.inner.runtime.spawn(
            async move {
                let outcome = run(&inner).await;
                let call = HttpCall { inner };
                match outcome {
                    Ok(response) => callback.on_response(&call, response),
                    Err(error) => callback.on_failure(&call, error),
                }
            }
            .instrument(span),
        );
        Ok(())
    }

    fn execute(&self) -> Result<Response<Bytes>, CallError> {
        self.mark_executed()?;
        let span = self.span();
        self.inner.runtime.block_on(run(&self.inner).instrument(span))
    }

    fn cancel(&self) {
        if !self.inner.canceled.send_replace(true) {
            debug!(call_id = %self.inner.id, "call canceled");
        }
    }

    fn is_canceled(&self) -> bool {
        *self.inner.canceled.borrow()
    }

    fn is_executed(&self) -> bool {
        self.inner.executed.load(Ordering::SeqCst)
    }

    fn clone_call(&self) -> Box<dyn Call<Bytes>> {
        Box::new(HttpCall::new(
            self.inner.client.clone(),
            self.inner.runtime.clone(),
            self.inner.request.clone(),
        ))
    }

    fn request(&self) -> &Request {
        &self.inner.request
    }
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// Races the exchange against cancellation.
async fn run(inner: &Inner) -> Result<Response<Bytes>, CallError> {
    let mut canceled = inner.canceled.subscribe();
    tokio::select! {
        biased;
        true = cancellation(&mut canceled) => Err(CallError::canceled()),
        result = exchange(&inner.client, &inner.request) => result,
    }
}

/// Resolves to `true` once the call is canceled (immediately if it already is).
async fn cancellation(canceled: &mut watch::Receiver<bool>) -> bool {
    canceled.wait_for(|canceled| *canceled).await.is_ok()
}

async fn exchange(client: &reqwest::Client, request: &Request) -> Result<Response<Bytes>, CallError> {
    let mut builder = client.request(to_reqwest_method(request.method()), request.url());
    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = request.body() {
        builder = builder.body(body.to_vec());
    }

    let response = builder.send().await.map_err(transport_error)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.bytes().await.map_err(transport_error)?;

    debug!(status, bytes = body.len(), "exchange completed");
    Ok(Response::new(status, headers, Some(body)))
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> CallError {
    CallError::Transport {
        message: err.to_string(),
        source: Box::new(err),
    }
}
