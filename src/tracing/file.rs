use std::sync::OnceLock;

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use super::filter::CrateFilter;
use super::format::AtharFormat;
use crate::config::LoggingConfig;
use crate::error::Context;

// Keeps the non-blocking writers flushing for the life of the process
static LOG_GUARDS: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

fn file_layer<S>(
    format: AtharFormat,
    writer: NonBlocking,
    filter: CrateFilter,
) -> impl Layer<S> + Send + Sync + 'static
where
    S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    tracing_subscriber::fmt::Layer::default()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .event_format(format)
        .with_writer(writer)
        .with_filter(filter)
}

/// Install the global subscriber: a daily debug file, a daily warn/error file and a
/// terminal layer on stderr. stdout is left to the trace result.
pub fn setup_tracing(
    engine_name: &str,
    logging_config: &LoggingConfig,
) -> crate::Result<()> {
    let base_logs_dir = logging_config.base_dir();
    let debug_dir = base_logs_dir.join("debug");
    let error_dir = base_logs_dir.join("error");

    for dir in [&debug_dir, &error_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    }

    let file_name = format!("{}.log", engine_name);
    let (debug_writer, debug_guard) =
        tracing_appender::non_blocking(RollingFileAppender::new(Rotation::DAILY, &debug_dir, &file_name));
    let (error_writer, error_guard) =
        tracing_appender::non_blocking(RollingFileAppender::new(Rotation::DAILY, &error_dir, &file_name));

    let format = AtharFormat::file(engine_name);

    let subscriber = tracing_subscriber::registry()
        .with(file_layer(format.clone(), debug_writer, CrateFilter::debug_file()))
        .with(file_layer(format, error_writer, CrateFilter::error_file()))
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .event_format(AtharFormat::terminal(engine_name))
                .with_filter(CrateFilter::terminal()),
        );

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(_) => {
            let _ = LOG_GUARDS.set(vec![debug_guard, error_guard]);
            tracing::info!(
                "{}_logging_started::debug_logs::{}::error_logs::{}",
                engine_name,
                debug_dir.display(),
                error_dir.display()
            );
        },
        Err(e) => {
            eprintln!("Error setting up logging: {}", e);
        },
    }

    Ok(())
}
