/// Logging setup: `tracing` events to stderr, filtered by `RUST_LOG` or `--debug`.
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
///
/// Without `--debug` only `error` events pass, so a failed command leaves
/// exactly one diagnostic line on stderr.
#[must_use]
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "error,ec2ctl=debug" } else { "error" }
}

/// Install the global subscriber. stdout is left to command output.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
