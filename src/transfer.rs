//! Transfer layer for archive uploads
//!
//! Abstracts the secure-copy client for testability. Provides:
//! - Transfer trait: interface for uploading one file
//! - MockTransfer: in-process recorder for unit tests
//! - ScpTransfer: real `scp` invocation for production
//!
//! `scp` is spawned with an explicit argument list; no shell is involved, so
//! file and directory names are never interpreted. Authentication relies on
//! public-key trust established out of band.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::Mutex;

/// Transfer errors
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Failed to spawn scp: {0}")]
    Spawn(#[source] io::Error),

    #[error("scp exited with {status}: {stderr}")]
    Scp { status: ExitStatus, stderr: String },

    #[error("Transfer failed: {0}")]
    Failed(String),
}

/// Remote destination for uploads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    /// Service account on the collection server
    pub user: String,
    /// Collection server host
    pub host: String,
    /// Incoming directory, relative to the account home
    pub incoming_dir: String,
}

impl std::fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}/", self.user, self.host, self.incoming_dir)
    }
}

/// Transfer trait for uploading a local file under a remote name
pub trait Transfer {
    fn upload(&self, local: &Path, remote_name: &str) -> Result<(), TransferError>;
}

/// Mock transfer for testing - records uploads in memory
#[derive(Debug, Default)]
pub struct MockTransfer {
    uploads: Mutex<Vec<(PathBuf, String)>>,
    failure: Option<String>,
}

impl MockTransfer {
    /// Create a mock transfer that accepts every upload
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transfer that fails every upload with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    /// The uploads recorded so far, as (local path, remote name) pairs
    pub fn uploads(&self) -> Vec<(PathBuf, String)> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

impl Transfer for MockTransfer {
    fn upload(&self, local: &Path, remote_name: &str) -> Result<(), TransferError> {
        if let Some(ref message) = self.failure {
            return Err(TransferError::Failed(message.clone()));
        }
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push((local.to_path_buf(), remote_name.to_string()));
        }
        Ok(())
    }
}

/// Secure-copy transfer for production use
#[derive(Debug)]
pub struct ScpTransfer {
    target: RemoteTarget,
    connect_timeout_seconds: u32,
}

impl ScpTransfer {
    /// Create a new transfer client for the given target
    pub fn new(target: RemoteTarget, connect_timeout_seconds: u32) -> Self {
        Self {
            target,
            connect_timeout_seconds,
        }
    }

    /// Build scp command arguments
    fn build_scp_args(&self, local: &Path, remote_name: &str) -> Vec<String> {
        vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout_seconds),
            local.display().to_string(),
            format!(
                "{}@{}:{}/{}",
                self.target.user, self.target.host, self.target.incoming_dir, remote_name
            ),
        ]
    }
}

impl Transfer for ScpTransfer {
    fn upload(&self, local: &Path, remote_name: &str) -> Result<(), TransferError> {
        let args = self.build_scp_args(local, remote_name);
        log::debug!("Running scp {:?}", args);

        let output = Command::new("scp")
            .args(&args)
            .output()
            .map_err(TransferError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TransferError::Scp {
                status: output.status,
                stderr,
            });
        }

        log::info!("Uploaded {} to {}", local.display(), self.target);
        Ok(())
    }
}
