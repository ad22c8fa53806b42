//! Advisory file lock shared by every handle and process using one store file.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Access mode used when acquiring a [`StoreLock`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LockMode {
    Read,
    Write,
}

/// Held lock on `<store file>.lock`; released on drop.
pub struct StoreLockGuard {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl Drop for StoreLockGuard {
    fn drop(&mut self) {
        if let Err(err) = fs2::FileExt::unlock(&self.file) {
            warn!(
                path = %self.path.display(),
                mode = ?self.mode,
                error = %err,
                "Failed to release store lock"
            );
        }
    }
}

pub struct StoreLock;

impl StoreLock {
    /// Block until the lock next to `store_path` is held in `mode`.
    pub fn acquire(store_path: &Path, mode: LockMode) -> io::Result<StoreLockGuard> {
        let path = lock_path(store_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        match mode {
            LockMode::Read => fs2::FileExt::lock_shared(&file)?,
            LockMode::Write => fs2::FileExt::lock_exclusive(&file)?,
        }
        Ok(StoreLockGuard { file, path, mode })
    }
}

/// `tasks.json` locks through `tasks.json.lock`.
fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map_or_else(|| OsString::from("store"), ToOwned::to_owned);
    name.push(".lock");
    store_path.with_file_name(name)
}
