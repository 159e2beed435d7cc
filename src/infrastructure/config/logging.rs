//! Logging configuration and initialization.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory for a per-run log file. No file is written when unset.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            directory: None,
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// Logs go to stderr so command output on stdout stays parseable.
    /// `RUST_LOG` overrides the configured level. Returns the per-run log
    /// file path when one was opened.
    pub fn init(&self) -> Option<PathBuf> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let console = match self.format.as_str() {
            "json" => fmt::layer().json().with_writer(std::io::stderr).boxed(),
            _ => fmt::layer().with_writer(std::io::stderr).boxed(),
        };

        let run_log = self.directory.as_deref().map(|dir| open_run_log(Path::new(dir)));
        let (file_layer, file_path, file_error) = match run_log {
            Some(Ok((file, path))) => (
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file))
                        .boxed(),
                ),
                Some(path),
                None,
            ),
            Some(Err(e)) => (None, None, Some(e)),
            None => (None, None, None),
        };

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(file_layer)
            .try_init();

        if let Some(e) = file_error {
            warn!(error = %e, "Failed to open run log file");
        }
        file_path
    }
}

/// Create `<dir>/<UTC timestamp>.log`.
fn open_run_log(dir: &Path) -> std::io::Result<(File, PathBuf)> {
    fs::create_dir_all(dir)?;
    let name = format!("{}.log", Utc::now().format("%Y-%m-%dT%H-%M-%S%.3fZ"));
    let path = dir.join(name);
    let file = File::create(&path)?;
    Ok((file, path))
}
