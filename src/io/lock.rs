use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory file lock serializing mutations of the data directory.
///
/// Every mutating command rewrites whole documents (journal, profile), so
/// two concurrent jot processes could interleave a load/modify/save and
/// lose an update. Uses platform-native flock (Unix).
pub struct StoreLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another jot process may be writing")]
    Timeout { path: PathBuf },
}

impl StoreLock {
    /// Acquire an advisory lock on the data directory, waiting up to
    /// `timeout` for a competing process to release it.
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
        loop {
            match try_lock(&file) {
                Ok(()) => {
                    return Ok(StoreLock {
                        _file: file,
                        path: lock_path,
                    });
                }
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => {
                    return Err(LockError::Timeout { path: lock_path });
                }
            }
        }
    }

    /// Acquire with the default timeout (5 seconds).
    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, Duration::from_secs(5))
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // flock releases with the file handle; the lock file itself is
        // transient state.
        let _ = fs::remove_file(&self.path);
    }
}

/// Try to acquire an exclusive flock on the file (non-blocking)
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    // On non-Unix platforms, just succeed (advisory locking)
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_and_release() {
        let tmp = TempDir::new().unwrap();
        let lock = StoreLock::acquire_default(tmp.path()).unwrap();
        assert!(tmp.path().join(".lock").exists());
        drop(lock);
        assert!(!tmp.path().join(".lock").exists());
    }

    #[test]
    fn reacquire_after_drop() {
        let tmp = TempDir::new().unwrap();
        drop(StoreLock::acquire_default(tmp.path()).unwrap());
        drop(StoreLock::acquire_default(tmp.path()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn second_acquire_times_out_while_held() {
        let tmp = TempDir::new().unwrap();
        let _held = StoreLock::acquire_default(tmp.path()).unwrap();
        let result = StoreLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(result, Err(LockError::Timeout { .. })));
    }
}
