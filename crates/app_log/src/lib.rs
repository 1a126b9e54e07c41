//! DriveExplorer Logging
//!
//! Structured logging, crash reports and deadlock detection.

mod panic_hook;
mod logging;

pub use panic_hook::{crash_report, init_panic_hook};
pub use logging::{cleanup_old_logs, init_logging, LogGuard};

use std::path::PathBuf;
use directories::ProjectDirs;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "DriveExplorer", "DriveExplorer")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize logging, the panic hook and (debug builds) the deadlock detector
///
/// Keep the returned guard alive until shutdown so buffered lines reach the log file.
pub fn init(retention_days: u32) -> anyhow::Result<LogGuard> {
    let dir = log_dir();
    let guard = init_logging(&dir)?;
    init_panic_hook();

    #[cfg(debug_assertions)]
    init_deadlock_detector();

    if let Err(e) = cleanup_old_logs(&dir, retention_days) {
        tracing::warn!("Log cleanup failed: {}", e);
    }

    Ok(guard)
}

#[cfg(debug_assertions)]
fn init_deadlock_detector() {
    use std::thread;
    use std::time::Duration;

    thread::spawn(|| {
        loop {
            thread::sleep(Duration::from_secs(10));
            let deadlocks = parking_lot::deadlock::check_deadlock();
            if deadlocks.is_empty() {
                continue;
            }

            tracing::error!("{} deadlock(s) detected", deadlocks.len());
            for (i, threads) in deadlocks.iter().enumerate() {
                for t in threads {
                    tracing::error!(
                        deadlock = i,
                        thread = ?t.thread_id(),
                        "{:#?}",
                        t.backtrace()
                    );
                }
            }
        }
    });
}
