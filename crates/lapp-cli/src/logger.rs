//! Logging infrastructure for the lapp CLI.
//!
//! The logging level is determined in this order:
//! 1. `--verbose` flag: DEBUG for lapp crates
//! 2. `--quiet` flag: ERROR only
//! 3. `RUST_LOG` environment variable
//! 4. Default: INFO for lapp crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "lapp_plugin=debug,lapp_cli=debug";
const QUIET_FILTER: &str = "lapp_plugin=error,lapp_cli=error";
const DEFAULT_FILTER: &str = "lapp_plugin=info,lapp_cli=info";

/// Pick the filter directives for the given flags
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber.
///
/// Call once at startup, before any logging occurs. Logs go to stderr so
/// the environment banner on stdout stays clean.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}
