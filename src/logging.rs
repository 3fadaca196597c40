use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a filter directive, e.g. `taqvim=debug`
pub const LOG_ENV: &str = "TAQVIM_LOG";
pub const LOG_FILE: &str = "taqvim.log";

/// `TAQVIM_LOG` when set and valid, else the configured level
pub fn build_filter(config_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Output goes to `taqvim.log` under
/// `log_dir` so the terminal dashboard stays clean; stderr when the file
/// cannot be opened. Returns the log file path in use, if any.
pub fn init(config_level: &str, log_dir: Option<&Path>) -> Option<PathBuf> {
    let log_path = log_dir.and_then(|dir| {
        fs::create_dir_all(dir).ok()?;
        let path = dir.join(LOG_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
        Some((path, file))
    });

    let (writer, path, ansi) = match log_path {
        Some((path, file)) => (BoxMakeWriter::new(Mutex::new(file)), Some(path), false),
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let installed = tracing_subscriber::registry()
        .with(build_filter(config_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true),
        )
        .try_init();

    // A subscriber already installed (tests, embedding) keeps precedence
    installed.ok().and(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_level_applies_without_env() {
        if std::env::var_os(LOG_ENV).is_some() {
            return;
        }
        assert_eq!(build_filter("debug").to_string(), "debug");
    }
}
