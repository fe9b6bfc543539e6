//! End-to-end upload pipeline tests against a mock transfer client

use maloo_tools::transfer::MockTransfer;
use maloo_tools::upload::{run, UploadError, UploadOptions};
use std::env;
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

// The pipeline changes the process working directory; serialize the tests.
static CWD_LOCK: Mutex<()> = Mutex::new(());

fn sample_logs() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(dir.path().join("b.txt"), "bravo").unwrap();
    fs::create_dir(dir.path().join("dumps")).unwrap();
    fs::write(dir.path().join("dumps/oops.log"), "stack trace").unwrap();
    dir
}

#[test]
fn upload_removes_archive_and_keeps_logs() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = sample_logs();
    let before = env::current_dir().unwrap();

    let transfer = MockTransfer::new();
    let options = UploadOptions {
        logdir: dir.path().to_path_buf(),
        erase: false,
    };
    let report = run(&options, &transfer).unwrap();

    assert_eq!(env::current_dir().unwrap(), before);

    let uploads = transfer.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].1, report.archive_name);
    assert!(report.archive_name.starts_with("Lustre-Test-Result-"));
    assert!(report.archive_name.ends_with(".tgz"));
    assert_eq!(report.entries, 4);
    assert_eq!(report.sha256.len(), 64);
    assert_eq!(report.erased, 0);

    // The local archive is gone, the logs are untouched.
    assert!(!dir.path().join(&report.archive_name).exists());
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
    assert!(dir.path().join("dumps/oops.log").exists());
}

#[test]
fn erase_removes_log_entries_after_upload() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = sample_logs();

    let transfer = MockTransfer::new();
    let options = UploadOptions {
        logdir: dir.path().to_path_buf(),
        erase: true,
    };
    let report = run(&options, &transfer).unwrap();

    assert_eq!(transfer.uploads().len(), 1);
    assert_eq!(report.erased, 3);
    assert!(!dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
    assert!(!dir.path().join("dumps").exists());
}

#[test]
fn failed_transfer_restores_workdir_and_skips_cleanup() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = sample_logs();
    let before = env::current_dir().unwrap();

    let transfer = MockTransfer::failing("connection refused");
    let options = UploadOptions {
        logdir: dir.path().to_path_buf(),
        erase: true,
    };
    let err = run(&options, &transfer).unwrap_err();

    assert!(matches!(err, UploadError::Transfer(_)));
    assert_eq!(env::current_dir().unwrap(), before);

    // Nothing was erased on the failure path.
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("dumps/oops.log").exists());
}

#[test]
fn missing_logdir_fails_before_any_mutation() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let before = env::current_dir().unwrap();

    let transfer = MockTransfer::new();
    let options = UploadOptions {
        logdir: dir.path().join("missing"),
        erase: false,
    };
    let err = run(&options, &transfer).unwrap_err();

    assert!(matches!(err, UploadError::Logdir { .. }));
    assert_eq!(env::current_dir().unwrap(), before);
    assert!(transfer.uploads().is_empty());
}
