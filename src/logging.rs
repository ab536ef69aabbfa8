//! Opt-in file logging.
//!
//! The console owns the terminal, so nothing is ever logged to stdout or
//! stderr. Logging is enabled only when `CATADM_LOG` names a file.

use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Env var naming the log file. Unset or empty means no logging.
pub const LOG_ENV: &str = "CATADM_LOG";

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// `{base}.{unix_secs}.{pid}`, one file per process.
pub fn session_log_path(base: &str, started: SystemTime, pid: u32) -> PathBuf {
    let secs = started
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    PathBuf::from(format!("{}.{}.{}", base, secs, pid))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber if `CATADM_LOG` is set.
pub fn init_tracing() {
    let Some(base) = env::var(LOG_ENV).ok().filter(|b| !b.is_empty()) else {
        return;
    };
    let path = session_log_path(&base, SystemTime::now(), process::id());
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot create log file {}: {}", path.display(), e);
            return;
        }
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(file).with_ansi(false))
        .try_init();
    if installed.is_ok() {
        tracing::debug!(path = %path.display(), "logging to file");
    }
}
