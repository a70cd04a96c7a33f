//! Logging system initialization

use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber from configuration.
///
/// Call once during startup, after configuration has been loaded. The
/// returned guard must be kept alive for the duration of the program so
/// buffered log writes get flushed.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(log_writer(config));
    let log_to_stdout = config.file.as_ref().is_none_or(|f| f.is_empty());

    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(EnvFilter::new(config.level.clone()))
        .with_level(true)
        .with_ansi(log_to_stdout);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    guard
}

fn log_writer(config: &LoggingConfig) -> Box<dyn Write + Send + Sync> {
    let log_file = match config.file.as_deref() {
        Some(path) if !path.is_empty() => path,
        _ => return Box::new(std::io::stdout()),
    };

    if config.enable_rotation {
        let path = Path::new(log_file);
        let dir = path.parent().unwrap_or(Path::new("."));
        let prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("feedbacker.log")
            .trim_end_matches(".log");
        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(prefix)
            .filename_suffix("log")
            .max_log_files(config.max_backups as usize)
            .build(dir)
            .expect("Failed to create rolling log appender");
        Box::new(appender)
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .expect("Failed to open log file");
        Box::new(file)
    }
}
