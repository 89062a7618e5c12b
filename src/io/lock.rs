use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory lock on the data directory.
///
/// The TUI and CLI may run side by side against the same directory; every
/// store write happens while holding this lock (flock on Unix).
/// The lock file is never removed; the flock is released when the file
/// closes.
pub struct FileLock {
    _file: File,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another tick process may be writing")]
    Timeout { path: PathBuf },
}

impl FileLock {
    /// Lock `data_dir`, waiting up to `timeout`.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = data_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::CreateError {
                path: lock_path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        while try_lock(&file).is_err() {
            if start.elapsed() >= timeout {
                return Err(LockError::Timeout { path: lock_path });
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        Ok(FileLock { _file: file })
    }

    /// Lock with the default two second timeout
    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, Duration::from_secs(2))
    }
}

/// Non-blocking exclusive flock on an open file
#[cfg(unix)]
pub(crate) fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub(crate) fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
