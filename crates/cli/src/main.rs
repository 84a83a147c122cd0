//! Event Call CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration** — flags and `EVENTCALL_*` environment variables
//!    (see [`config::CliConfig`]).
//! 2. **Wire observability** — configure `tracing-subscriber` with a pretty or
//!    JSON layer and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is set, an
//!    OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure** — the tokio runtime, the `HttpClient`, the
//!    selected callback executor, and an adapter registry holding
//!    `EventCallAdapterFactory` followed by `DirectCallAdapterFactory`.
//! 4. **Run one call** — resolve the adapter for `--return-type`, adapt an
//!    `HttpCall`, then either execute it or enqueue it and wait for delivery.

mod config;
mod observability;

use std::io::Write;
use std::process::ExitCode;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use bytes::Bytes;
use calls::{
    callback_fn, Call, CallAdapterRegistry, CallError, CallbackExecutor, DirectCallAdapterFactory,
    Response, ReturnType,
};
use clap::Parser;
use event_call::EventCallAdapterFactory;
use executors::{InlineExecutor, SerialExecutor, TokioExecutor};
use http_call::HttpClient;
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing::{error, info};

use config::{CliConfig, ExecutorKind, OutputFormat};

fn main() -> ExitCode {
    let config = CliConfig::parse();

    let runtime = match Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _observability = {
        let _enter = runtime.enter();
        match observability::init(config.log_format) {
            Ok(guard) => guard,
            Err(err) => {
                eprintln!("error: failed to initialise tracing: {err:#}");
                return ExitCode::FAILURE;
            }
        }
    };

    // `execute` blocks on the runtime, so the main thread stays outside it.
    match run(&config, &runtime) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "call failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig, runtime: &Runtime) -> Result<()> {
    let executor: Arc<dyn CallbackExecutor> = match config.executor {
        ExecutorKind::Serial => Arc::new(SerialExecutor::new()?),
        ExecutorKind::Tokio => Arc::new(TokioExecutor::new(runtime.handle().clone())),
        ExecutorKind::Inline => Arc::new(InlineExecutor),
    };

    let mut registry = CallAdapterRegistry::<Bytes>::new();
    registry
        .register(EventCallAdapterFactory::new(executor))
        .register(DirectCallAdapterFactory);

    let return_type = ReturnType::parse(&config.return_type)?;
    let adapter = registry
        .adapter_for(&return_type)
        .with_context(|| format!("cannot adapt calls for '{return_type}'"))?;

    let client = HttpClient::new(&config.http_client_config(), runtime.handle().clone())?;
    let call = adapter.adapt(Box::new(client.new_call(config.request()?)));
    info!(
        %return_type,
        response_type = adapter.response_type(),
        method = %call.request().method(),
        url = call.request().url(),
        "issuing call"
    );

    let response = if config.sync {
        call.execute()?
    } else {
        let outcome = enqueue_and_wait(call.as_ref(), config.cancel)?;
        outcome?
    };

    print_response(&response, config.output)
}

/// Enqueues `call` and blocks until its callback fires.
fn enqueue_and_wait(
    call: &dyn Call<Bytes>,
    cancel: bool,
) -> Result<Result<Response<Bytes>, CallError>> {
    let (tx, rx) = mpsc::channel();
    let failure_tx = tx.clone();

    call.enqueue(Some(callback_fn(
        move |_: &dyn Call<Bytes>, response: Response<Bytes>| {
            let _ = tx.send(Ok(response));
        },
        move |_: &dyn Call<Bytes>, error: CallError| {
            let _ = failure_tx.send(Err(error));
        },
    )))?;
    if cancel {
        call.cancel();
    }

    rx.recv().context("call finished without delivering an outcome")
}

#[derive(Serialize)]
struct ResponseSummary<'a> {
    status: u16,
    headers: &'a [(String, String)],
    body_bytes: usize,
    body: Option<String>,
}

fn print_response(response: &Response<Bytes>, output: OutputFormat) -> Result<()> {
    let body = response.body().cloned().unwrap_or_default();
    let mut stdout = std::io::stdout().lock();

    match output {
        OutputFormat::Text => {
            writeln!(stdout, "HTTP {}", response.status())?;
            stdout.write_all(&body)?;
            if !body.ends_with(b"\n") {
                writeln!(stdout)?;
            }
        }
        OutputFormat::Json => {
            let summary = ResponseSummary {
                status: response.status(),
                headers: response.headers(),
                body_bytes: body.len(),
                body: std::str::from_utf8(&body).ok().map(str::to_string),
            };
            serde_json::to_writer_pretty(&mut stdout, &summary)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
