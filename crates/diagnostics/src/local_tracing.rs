use derive_more::{Display, Error};
use miette::Diagnostic;
use std::{
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
};
use tracing::Level;
use tracing_subscriber::{
    filter::ParseError, fmt::format::FmtSpan, EnvFilter, Layer, Registry,
};

static IS_TRACING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Prefix shared by the targets of every crx event.
const CRX_TARGET: &str = "crx";

/// Error type of [`enable_tracing_by_env`].
#[derive(Debug, Display, Error, Diagnostic)]
#[display("Invalid TRACE directive {directive:?}: {error}")]
#[diagnostic(
    code(crx_diagnostics::invalid_trace_directive),
    help("Use a level such as `debug`, or directives such as `crx::registry=trace`.")
)]
pub struct TracingDirectiveError {
    pub directive: String,
    #[error(source)]
    pub error: ParseError,
}

/// Install a global subscriber when the `TRACE` variable is set.
///
/// A bare level (`TRACE=debug`) enables that level for the crx targets only.
/// Anything else is parsed as [`EnvFilter`] directives.
pub fn enable_tracing_by_env() -> Result<(), TracingDirectiveError> {
    let Ok(trace_var) = std::env::var("TRACE") else {
        return Ok(());
    };

    let layer = filter_layer(&trace_var)?;
    if !IS_TRACING_ENABLED.swap(true, Ordering::SeqCst) {
        use tracing_subscriber::{fmt, prelude::*};

        tracing_subscriber::registry()
            .with(layer)
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr),
            )
            .init();
        tracing::trace!(target: "crx::diagnostics", "enable_tracing_by_env");
    }
    Ok(())
}

fn filter_layer(
    trace_var: &str,
) -> Result<Box<dyn Layer<Registry> + Send + Sync>, TracingDirectiveError> {
    if let Ok(default_level) = Level::from_str(trace_var) {
        let targets = tracing_subscriber::filter::Targets::new()
            .with_targets([(CRX_TARGET, default_level)]);
        return Ok(targets.boxed());
    }

    EnvFilter::builder()
        .with_regex(true)
        .parse(trace_var)
        .map(Layer::boxed)
        .map_err(|error| TracingDirectiveError { directive: trace_var.to_string(), error })
}
