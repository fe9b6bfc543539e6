//! Scoped working-directory restoration
//!
//! The upload pipeline changes into the log directory for the duration of a
//! run. `WorkdirGuard` records the directory that was current when the run
//! started and restores it when dropped, so the restoration happens on every
//! exit path, including early error returns.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Errors for working-directory operations
#[derive(Debug, thiserror::Error)]
pub enum WorkdirError {
    #[error("Failed to read the current directory: {0}")]
    Current(#[source] io::Error),

    #[error("Failed to enter {dir}: {source}")]
    Enter {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Guard that restores the saved working directory on drop
#[derive(Debug)]
pub struct WorkdirGuard {
    original: PathBuf,
}

impl WorkdirGuard {
    /// Record the current directory and change into `dir`
    pub fn change_to(dir: &Path) -> Result<Self, WorkdirError> {
        let original = env::current_dir().map_err(WorkdirError::Current)?;
        env::set_current_dir(dir).map_err(|source| WorkdirError::Enter {
            dir: dir.to_path_buf(),
            source,
        })?;
        log::debug!("Entered {}", dir.display());
        Ok(Self { original })
    }

    /// The directory that will be restored on drop
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.original) {
            log::error!(
                "Failed to restore working directory {}: {}",
                self.original.display(),
                e
            );
        }
    }
}
