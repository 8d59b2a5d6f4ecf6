use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// Console output goes to stderr so that cart listings on stdout stay clean.
/// The returned guard must be held for the lifetime of the process; dropping it
/// stops the background writer.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    // Ensure logs directory exists
    let _ = fs::create_dir_all(&config.directory);

    // Create a non-blocking file appender for daily log rotation
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Create a JSON layer for file logging
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Create a formatted layer for console logging
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let mut filter = EnvFilter::from_default_env();
    match config.default_directive.parse::<Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!(
            "Ignoring invalid log directive '{}': {}",
            config.default_directive, e
        ),
    }

    // Set the global default subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    guard
}
