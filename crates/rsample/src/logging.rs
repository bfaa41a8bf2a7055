use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log size that triggers a roll-over at startup (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// `rsample.log` rolls over to `rsample.log.old`
fn backup_path(log_path: &Path) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(".old");
    PathBuf::from(name)
}

/// Move an oversized log aside so this run starts a fresh file. Only one
/// backup is kept; an older one is replaced.
///
/// Returns the backup path when a roll-over happened.
fn roll_over_if_needed(log_path: &Path) -> std::io::Result<Option<PathBuf>> {
    let size = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if size <= MAX_LOG_SIZE {
        return Ok(None);
    }

    let backup = backup_path(log_path);
    fs::rename(log_path, &backup)?;
    Ok(Some(backup))
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rsample={level},rsample_core=warn")))
}

/// Initialize logging to stderr, or to `log_file` when given.
///
/// File output goes through a non-blocking appender; keep the returned guard
/// alive until the program exits so buffered lines get flushed. The level can
/// be overridden with the `RUST_LOG` environment variable.
pub fn init_logging(log_file: Option<&Path>, level: &str) -> color_eyre::Result<Option<WorkerGuard>> {
    let Some(log_path) = log_file else {
        tracing_subscriber::registry()
            .with(env_filter(level))
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .try_init()
            .wrap_err("failed to install the log subscriber")?;
        return Ok(None);
    };

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_path
        .file_name()
        .ok_or_else(|| eyre!("log file path {} has no file name", log_path.display()))?;
    fs::create_dir_all(directory)
        .wrap_err_with(|| format!("failed to create log directory {}", directory.display()))?;

    let rolled = roll_over_if_needed(log_path);

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()
        .wrap_err("failed to install the log subscriber")?;

    tracing::info!(log_path = %log_path.display(), "rsample logging initialized");
    match rolled {
        Ok(Some(backup)) => tracing::info!(backup = %backup.display(), "previous log rolled over"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "failed to roll over the log file"),
    }
    Ok(Some(guard))
}
