use std::path::Path;

use tracing::warn;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Daily log files kept next to each other before the oldest is pruned.
pub const MAX_LOG_FILES: usize = 10;

/// Installs the global subscriber: compact console output on stderr plus an
/// optional debug-level log file. Stdout stays reserved for the JSON payload.
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the process is about to exit.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter);

    let (file_layer, guard, file_error) = match log_file.map(open_log_file).transpose() {
        Ok(Some(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(guard), None)
        }
        Ok(None) => (None, None, None),
        Err(err) => (None, None, Some(err)),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    if let (Some(path), Some(err)) = (log_file, file_error) {
        warn!(path = %path.display(), error = %err, "log file disabled");
    }

    guard
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender, String> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| "log file path has no file name".to_string())?;

    std::fs::create_dir_all(directory).map_err(|err| format!("create log dir failed: {err}"))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .max_log_files(MAX_LOG_FILES)
        .build(directory)
        .map_err(|err| err.to_string())
}
