//! Upload pipeline orchestration
//!
//! Runs one archive job end to end: enter the log directory, package it,
//! upload the archive, delete the local copy, and optionally erase the
//! archived log entries. The working directory active before the run is
//! restored on every exit path by [`WorkdirGuard`].

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::archive::{self, ArchiveError, Archiver};
use crate::config::ConfigError;
use crate::transfer::{Transfer, TransferError};
use crate::workdir::{WorkdirError, WorkdirGuard};

/// Upload pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot access log directory {dir}: {source}")]
    Logdir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("working directory error: {0}")]
    Workdir(#[from] WorkdirError),

    #[error("archiving error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl UploadError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            UploadError::Transfer(_) => 20,
            _ => 1,
        }
    }
}

/// Options for one archive job
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Directory containing the logs to package
    pub logdir: PathBuf,

    /// Erase the archived log entries after a successful upload
    pub erase: bool,
}

/// Result of a completed archive job
#[derive(Debug)]
pub struct UploadReport {
    /// Name of the uploaded archive
    pub archive_name: String,

    /// Count of entries packaged into the archive
    pub entries: usize,

    /// Hex SHA-256 of the uploaded archive
    pub sha256: String,

    /// Count of top-level log entries erased after the upload
    pub erased: usize,
}

/// Run one archive job against the given transfer client
pub fn run(options: &UploadOptions, transfer: &dyn Transfer) -> Result<UploadReport, UploadError> {
    let logdir = options
        .logdir
        .canonicalize()
        .map_err(|source| UploadError::Logdir {
            dir: options.logdir.clone(),
            source,
        })?;

    let archive_name = archive::default_archive_file_name();
    let archiver = Archiver::new(logdir.clone());

    let _workdir = WorkdirGuard::change_to(&logdir)?;

    let outcome = archiver.create(&archive_name)?;
    transfer.upload(&outcome.path, &archive_name)?;

    fs::remove_file(&outcome.path)?;
    log::debug!("Removed local archive {}", outcome.path.display());

    let erased = if options.erase {
        erase_entries(&logdir, &outcome.entries)?
    } else {
        0
    };

    Ok(UploadReport {
        archive_name,
        entries: outcome.entries.len(),
        sha256: outcome.sha256,
        erased,
    })
}

/// Remove the top-level log entries that were archived
///
/// `entries` holds paths relative to `root`; nested paths collapse to their
/// first component so directories are removed whole.
fn erase_entries(root: &Path, entries: &[PathBuf]) -> Result<usize, io::Error> {
    let mut roots: BTreeSet<&Path> = BTreeSet::new();
    for entry in entries {
        if let Some(Component::Normal(first)) = entry.components().next() {
            roots.insert(Path::new(first));
        }
    }

    let mut erased = 0;
    for rel in roots {
        let path = root.join(rel);
        let metadata = fs::symlink_metadata(&path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        log::debug!("Erased {}", path.display());
        erased += 1;
    }
    Ok(erased)
}
