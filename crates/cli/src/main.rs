//! CircleCI provider CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration**: service URL, token, VCS, and default
//!    organization from flags with `CIRCLECI_*` environment fallbacks.
//! 2. **Wire observability**: configure `tracing-subscriber` with a JSON layer
//!    on stderr and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is set, an
//!    OpenTelemetry OTLP exporter. All `tracing` events emitted by every crate
//!    in the workspace flow through this layer.
//! 3. **Construct the client**: build one [`client::Client`] and run the
//!    selected operation against it, printing the result as JSON on stdout.

mod cli;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let action = cli::start()?;

    let result = action.execute().await;

    cli::telemetry::shutdown_tracer();

    result
}
