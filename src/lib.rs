//! Maloo Tools - Lustre test-log tooling
//!
//! This crate implements the two command-line utilities used around the
//! Lustre test-log workflow: `maloo-upload`, which packages a log directory
//! into a gzip-compressed tar archive and ships it to the Maloo collection
//! server, and `maloo-results`, which summarizes a structured `results.yml`
//! test report.

pub mod archive;
pub mod config;
pub mod report;
pub mod summary;
pub mod transfer;
pub mod upload;
pub mod workdir;

pub use archive::{archive_file_name, ArchiveOutcome, Archiver};
pub use config::UploadConfig;
pub use report::{SubTest, Test, TestReport};
pub use summary::ReportSummary;
pub use transfer::{RemoteTarget, ScpTransfer, Transfer};
pub use upload::{UploadError, UploadOptions, UploadReport};
pub use workdir::WorkdirGuard;
