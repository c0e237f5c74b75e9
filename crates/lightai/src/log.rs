//! Logging for lightai.
use anyhow::Context;
use lightai_core::get_data_dir;
use std::io::LineWriter;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

const MAX_LOG_SIZE: u64 = 100 * 1024;

/// Where log events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, used by the HTTP server.
    Stderr,
    /// `<data_dir>/lightai.log`, keeping the terminal clean for interactive chat.
    File,
}

/// Initializes the application's logging system.
///
/// `RUST_LOG` overrides the default filter. The file target rotates the log to
/// `lightai.log.old` once it exceeds 100KB.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created, the log file
/// cannot be rotated or opened, or a global subscriber is already set.
pub fn setup_logging(target: LogTarget, verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "lightai=debug,lightai_core=debug,tower_http=debug"
        } else {
            "lightai=info,lightai_core=info"
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339());

    match target {
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?,
        LogTarget::File => {
            let data_dir = get_data_dir().context("Failed to get data directory")?;
            let log_path = rotate_log(&data_dir)?;
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            // Ensure the logs are flushed after every line
            let writer = Mutex::new(LineWriter::new(log_file));

            builder
                .with_writer(writer)
                .with_ansi(false) // Disable ANSI escape codes for file logging
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?
        }
    }
    Ok(())
}

/// Moves an oversized `lightai.log` aside and returns the path to log to.
fn rotate_log(data_dir: &Path) -> std::io::Result<PathBuf> {
    let log_path = data_dir.join("lightai.log");

    if log_path.exists() && std::fs::metadata(&log_path)?.len() > MAX_LOG_SIZE {
        let backup_path = data_dir.join("lightai.log.old");
        if backup_path.exists() {
            std::fs::remove_file(&backup_path)?;
        }
        std::fs::rename(&log_path, backup_path)?;
    }

    Ok(log_path)
}
