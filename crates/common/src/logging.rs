//! Logging and tracing initialization.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter used by the CLI for `--verbose` / default runs.
pub fn level_for_verbosity(verbose: bool) -> &'static str {
    if verbose {
        "reelcast=debug,info"
    } else {
        "info"
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` overrides the configured level. When `config.file` is set the
/// log is appended to that file instead of stderr; if the file cannot be
/// opened, logging falls back to stderr.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file = config.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| eprintln!("Cannot open log file {}: {e}", path.display()))
            .ok()
    });

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let installed = match (file, config.json) {
        (Some(file), true) => tracing::subscriber::set_global_default(
            builder.json().with_writer(Mutex::new(file)).finish(),
        ),
        (Some(file), false) => tracing::subscriber::set_global_default(
            builder.with_ansi(false).with_writer(Mutex::new(file)).finish(),
        ),
        (None, true) => tracing::subscriber::set_global_default(builder.json().finish()),
        (None, false) => tracing::subscriber::set_global_default(builder.finish()),
    };
    // A subscriber may already be installed (tests, embedding hosts).
    installed.ok();
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
