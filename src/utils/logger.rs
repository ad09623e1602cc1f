use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per line, for hosts that ship logs to a collector.
    Json,
}

/// `RUST_LOG` wins over the verbosity flag. Other crates only get to warn.
fn crate_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={},warn", env!("CARGO_CRATE_NAME"), level))
    })
}

/// Logs go to stderr so reports on stdout can be piped as csv or json.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let registry = tracing_subscriber::registry().with(crate_filter(verbose));

    match format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time()
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .init(),
    }
}
