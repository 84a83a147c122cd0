//! Command-line configuration.
//!
//! Every option can also be supplied through an `EVENTCALL_*` environment
//! variable; flags win over the environment.

use std::time::Duration;

use anyhow::{bail, Result};
use calls::{Method, Request};
use clap::{Parser, ValueEnum};
use http_call::HttpClientConfig;

/// Where enqueued call completions are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutorKind {
    /// A dedicated delivery thread, tasks run in order.
    Serial,
    /// The tokio runtime's blocking pool.
    Tokio,
    /// Whichever thread completes the exchange.
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Status line followed by the raw body.
    Text,
    /// A JSON summary of the response.
    Json,
}

/// Issue one HTTP request through a call adapter chosen by declared return type.
#[derive(Debug, Parser)]
#[command(name = "eventcall", version)]
pub struct CliConfig {
    /// URL to request.
    #[arg(long, env = "EVENTCALL_URL")]
    pub url: String,

    /// HTTP method.
    #[arg(long, env = "EVENTCALL_METHOD", default_value = "GET")]
    pub method: Method,

    /// Request header as `name:value`. Repeatable.
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Request body.
    #[arg(long, env = "EVENTCALL_BODY")]
    pub body: Option<String>,

    /// Declared return type used to select the call adapter.
    #[arg(long, env = "EVENTCALL_RETURN_TYPE", default_value = "EventCall<Bytes>")]
    pub return_type: String,

    #[arg(long, value_enum, env = "EVENTCALL_EXECUTOR", default_value_t = ExecutorKind::Serial)]
    pub executor: ExecutorKind,

    /// Run the call synchronously instead of enqueueing it.
    #[arg(long)]
    pub sync: bool,

    /// Cancel the call right after enqueueing it.
    #[arg(long, conflicts_with = "sync")]
    pub cancel: bool,

    /// Overall request timeout in seconds; 0 disables it.
    #[arg(long, env = "EVENTCALL_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, value_enum, env = "EVENTCALL_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[arg(long, value_enum, env = "EVENTCALL_OUTPUT", default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl CliConfig {
    /// Builds the request described by the URL, method, header and body options.
    pub fn request(&self) -> Result<Request> {
        let Some(mut request) = Request::new(self.method, self.url.as_str()) else {
            bail!("--url must not be empty");
        };
        for header in &self.headers {
            let (name, value) = parse_header(header)?;
            request = request.with_header(name, value);
        }
        if let Some(body) = &self.body {
            request = request.with_body(body.as_bytes());
        }
        Ok(request)
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            ..HttpClientConfig::default()
        }
    }
}

fn parse_header(header: &str) -> Result<(&str, &str)> {
    match header.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("invalid header '{header}', expected NAME:VALUE"),
    }
}
