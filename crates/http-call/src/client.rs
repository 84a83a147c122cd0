use std::time::Duration;

use calls::{CallError, Request};
use tokio::runtime::Handle;

use crate::call::{transport_error, HttpCall};

/// Default `User-Agent` sent by [`HttpClient`].
pub const DEFAULT_USER_AGENT: &str = concat!("event-call/", env!("CARGO_PKG_VERSION"));

/// Settings applied to every call an [`HttpClient`] creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Total time allowed for one exchange, including reading the body.
    /// `None` disables the timeout.
    pub timeout: Option<Duration>,
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Creates [`HttpCall`]s that share one connection pool and one runtime.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    runtime: Handle,
}

impl HttpClient {
    /// Builds a client with `config`, running exchanges on `runtime`.
    pub fn new(config: &HttpClientConfig, runtime: Handle) -> Result<Self, CallError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport_error)?;
        Ok(Self::with_client(client, runtime))
    }

    /// Wraps an already configured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    /// Creates a new, not-yet-executed call for `request`.
    pub fn new_call(&self, request: Request) -> HttpCall {
        HttpCall::new(self.client.clone(), self.runtime.clone(), request)
    }
}
