use std::env;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{anyhow, Context, Result};
use nix::fcntl::{Flock, FlockArg};

use crate::LOCK_FILE_NAME;

/// Exclusive flock on a well-known path, held for the lifetime of the
/// process. Dropping the guard releases the lock.
pub struct InstanceLock {
    _flock: Flock<File>,
    path: PathBuf,
}

impl InstanceLock {
    /// Acquire the system-wide lock under the OS temp directory.
    pub fn acquire() -> Result<Self> {
        Self::acquire_at(env::temp_dir().join(LOCK_FILE_NAME))
    }

    pub fn acquire_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("creating lock file {}", path.display()))?;
        let flock = Flock::lock(file, FlockArg::LockExclusiveNonblock).map_err(|(_, _errno)| {
            anyhow!(
                "another instance is already running (lock file {} is held)",
                path.display()
            )
        })?;
        // The content is informational only, mutual exclusion comes from the
        // flock itself.
        let _ = flock.set_len(0);
        let _ = (&*flock).write_all(process::id().to_string().as_bytes());
        Ok(Self { _flock: flock, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
