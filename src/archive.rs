//! Log archive construction
//!
//! Packages a log directory into a gzip-compressed tar archive written
//! inside that same directory. Entries are collected in sorted order so the
//! archive layout is deterministic, and the produced file is digested with
//! SHA-256 for the run log.

use chrono::{DateTime, Local};
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Builder;
use walkdir::WalkDir;

/// File name prefix for uploaded archives
pub const ARCHIVE_PREFIX: &str = "Lustre-Test-Result";

/// File name extension for uploaded archives
pub const ARCHIVE_EXTENSION: &str = "tgz";

/// Errors for archive operations
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Path is not within the log directory: {0}")]
    PathNotInRoot(PathBuf),
}

/// Compute the archive file name for a host and timestamp
///
/// Format: `Lustre-Test-Result-<host>-<YYYYmmddHHMMSS>.tgz`, with the
/// timestamp in local time and no separators between components.
pub fn archive_file_name(host: &str, when: &DateTime<Local>) -> String {
    format!(
        "{}-{}-{}.{}",
        ARCHIVE_PREFIX,
        host,
        when.format("%Y%m%d%H%M%S"),
        ARCHIVE_EXTENSION
    )
}

/// Compute the archive file name for this host, right now
pub fn default_archive_file_name() -> String {
    let host =
        sysinfo::System::host_name().unwrap_or_else(|| "unknown-host".to_string());
    archive_file_name(&host, &Local::now())
}

/// Archiver for packaging a log directory
pub struct Archiver {
    /// Directory to package
    root: PathBuf,
}

impl Archiver {
    /// Create a new archiver for the given log directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create `<root>/<archive_name>` from every entry in the root directory
    ///
    /// The output file is written into the directory being walked, so it is
    /// skipped by name while collecting entries and never archives itself.
    pub fn create(&self, archive_name: &str) -> Result<ArchiveOutcome, ArchiveError> {
        let metadata = fs::metadata(&self.root)?;
        if !metadata.is_dir() {
            return Err(ArchiveError::NotADirectory(self.root.clone()));
        }

        let archive_path = self.root.join(archive_name);
        let file = File::create(&archive_path)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(encoder);
        builder.follow_symlinks(false);

        let mut entries = Vec::new();
        let mut bytes: u64 = 0;

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = entry?;
            let path = entry.path();

            let rel_path = path
                .strip_prefix(&self.root)
                .map_err(|_| ArchiveError::PathNotInRoot(path.to_path_buf()))?;

            // Skip the root itself and the archive under construction
            if rel_path.as_os_str().is_empty() || rel_path == Path::new(archive_name) {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                builder.append_dir(rel_path, path)?;
            } else if file_type.is_symlink() {
                let target = fs::read_link(path)?;
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_size(0);
                header.set_mode(0o777);
                builder.append_link(&mut header, rel_path, &target)?;
            } else {
                bytes += entry.metadata()?.len();
                builder.append_path_with_name(path, rel_path)?;
            }

            log::debug!("Archived {}", rel_path.display());
            entries.push(rel_path.to_path_buf());
        }

        let encoder = builder.into_inner()?;
        encoder.finish()?;

        let sha256 = file_sha256(&archive_path)?;
        log::info!(
            "Created archive {} ({} entries, {} bytes read, sha256 {})",
            archive_path.display(),
            entries.len(),
            bytes,
            sha256
        );

        Ok(ArchiveOutcome {
            path: archive_path,
            entries,
            bytes,
            sha256,
        })
    }
}

/// Result of creating an archive
#[derive(Debug)]
pub struct ArchiveOutcome {
    /// Path of the produced archive
    pub path: PathBuf,
    /// Archived entries, relative to the log directory, in archive order
    pub entries: Vec<PathBuf>,
    /// Total file bytes read into the archive
    pub bytes: u64,
    /// Hex SHA-256 of the compressed archive file
    pub sha256: String,
}

/// Hex SHA-256 digest of a file's contents
fn file_sha256(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
