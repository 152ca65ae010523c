//! Logging to the standard error.

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the default level, `info`, or `debug`
/// when `verbose` is set. Colors follow the terminal unless forced.
pub fn setup_stderr_logging(spans: bool, verbose: bool, colors: Option<bool>) {
    let span_events = if spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let ansi = colors.unwrap_or_else(|| atty::is(atty::Stream::Stderr));

    let registry = tracing_subscriber::registry().with(filter);
    if verbose {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_span_events(span_events)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_span_events(span_events)
                    .without_time()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
