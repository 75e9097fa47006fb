use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use super::app_paths::AppPaths;
use super::logging::{LogEntry, LogRingBuffer};

static DUAL_LOGGER: OnceLock<DualLogger> = OnceLock::new();

/// Fans every log line out to the in-memory ring buffer (F5 panel) and to
/// a timestamped file that survives the session.
pub struct DualLogger {
    ring_buffer: LogRingBuffer,
    log_file: Arc<Mutex<Option<File>>>,
    log_path: PathBuf,
}

impl DualLogger {
    pub fn new(log_dir: &Path) -> Self {
        let _ = std::fs::create_dir_all(log_dir);

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("geo-pin_{}.log", timestamp));

        #[cfg(unix)]
        {
            let latest_path = log_dir.join("latest.log");
            let _ = std::fs::remove_file(&latest_path);
            let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok();

        Self {
            ring_buffer: LogRingBuffer::new(),
            log_file: Arc::new(Mutex::new(log_file)),
            log_path,
        }
    }

    pub fn log(&self, entry: LogEntry) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = writeln!(file, "{}", entry.format_for_display());
                // flush per line so a crash still leaves the tail on disk
                let _ = file.flush();
            }
        }

        self.ring_buffer.push(entry);
    }

    pub fn ring_buffer(&self) -> &LogRingBuffer {
        &self.ring_buffer
    }

    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }

    pub fn flush(&self) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = file.flush();
            }
        }
    }
}

/// Initialize the global dual logger under the app's log directory
pub fn init_dual_logger() -> &'static DualLogger {
    DUAL_LOGGER.get_or_init(|| DualLogger::new(&AppPaths::log_dir()))
}

pub fn get_dual_logger() -> Option<&'static DualLogger> {
    DUAL_LOGGER.get()
}
