//! Tracing setup shared by every host of the widget core.
//!
//! `RUST_LOG` is honoured as usual; on top of it the widget's own crates are
//! set to the requested level so a host only has to pass its debug flag.

use tracing::{error, info, Level};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose verbosity follows the level given to [`init_with_level`].
const WIDGET_TARGETS: [&str; 4] = ["bookit_common", "bookit_config", "bookit_widget", "bookit_console"];

/// Initialize logging at INFO.
///
/// # Examples
///
/// ```
/// use bookit_common::logging;
///
/// logging::init();
///
/// // A second initialisation is ignored
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Maps the configuration's `debug` flag to DEBUG or INFO.
///
/// At DEBUG the widget logs probe attempts, cache hits and step changes.
pub fn init_from_debug_flag(debug: bool) {
    init_with_level(if debug { Level::DEBUG } else { Level::INFO });
}

/// Installs the global subscriber unless one is already set.
pub fn init_with_level(level: Level) {
    let filter = WIDGET_TARGETS
        .iter()
        .filter_map(|target| format!("{}={}", target, level).parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), |filter, directive| filter.add_directive(directive));

    // file and line only help while debugging
    let verbose = level >= Level::DEBUG;
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Logs `success_message` at INFO for `Ok`, or the error with `error_context`
/// at ERROR, and hands the result back unchanged.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
