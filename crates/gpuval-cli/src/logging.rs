//! Process logging: stdout plus an append-only log file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Holds the subscriber installed for this run. Logging stops when it is
/// dropped.
pub struct LoggingContext {
    _guard: DefaultGuard,
}

impl LoggingContext {
    /// Install the subscriber. `GPUVAL_LOG` takes precedence over the level
    /// implied by `verbose`.
    ///
    /// A log file that cannot be opened is reported once and skipped.
    pub fn init(log_file: &Path, verbose: bool) -> Self {
        let level = if verbose { "debug" } else { "info" };
        let filter =
            EnvFilter::try_from_env("GPUVAL_LOG").unwrap_or_else(|_| EnvFilter::new(level));

        let (file, open_error) = match open_log_file(log_file) {
            Ok(file) => (Some(file), None),
            Err(error) => (None, Some(error)),
        };
        let file_layer = file.map(|file| {
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
        });

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(io::stdout))
            .with(file_layer);
        let guard = tracing::subscriber::set_default(subscriber);

        if let Some(error) = open_error {
            tracing::warn!(
                "Cannot open log file {}: {error}; logging to stdout only",
                log_file.display()
            );
        }

        Self { _guard: guard }
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
