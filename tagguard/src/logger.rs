// tagguard/src/logger.rs
//! Logging setup for the `tagguard` binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger`.
///
/// `RUST_LOG` is honoured unless `level` is given, in which case it applies
/// to every module. Logs go to stderr so JSON on stdout stays clean. Safe to
/// call more than once.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

/// Level implied by the global `--debug` / `--quiet` flags. `--quiet` wins.
pub fn level_from_flags(debug: bool, quiet: bool) -> Option<LevelFilter> {
    match (debug, quiet) {
        (_, true) => Some(LevelFilter::Off),
        (true, false) => Some(LevelFilter::Debug),
        (false, false) => None,
    }
}
