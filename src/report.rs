//! Test report schema (results.yml)
//!
//! The report is an ordered sequence of tests, each with an ordered sequence
//! of subtest results. The shape is explicit: a record missing a required
//! field fails the whole load, with no default substitution.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Name of the report file inside a results directory
pub const RESULTS_FILE_NAME: &str = "results.yml";

/// Error types for report loading
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A single subtest result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTest {
    /// Subtest name
    pub name: String,
    /// Result status; `"PASS"` counts as passed, anything else does not
    pub status: String,
}

/// A named test with its subtest results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Test {
    /// Test name
    pub name: String,
    /// Subtest results, in report order
    #[serde(rename = "SubTests")]
    pub sub_tests: Vec<SubTest>,
}

/// A full test report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// Tests, in report order
    #[serde(rename = "Tests")]
    pub tests: Vec<Test>,
}

impl TestReport {
    /// Parse a report from a reader
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }

    /// Load `<dir>/results.yml`
    pub fn load(dir: &Path) -> Result<Self, ReportError> {
        let path = dir.join(RESULTS_FILE_NAME);
        let file = File::open(&path).map_err(|source| ReportError::IoError {
            path: path.clone(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
            .map_err(|source| ReportError::ParseError { path, source })
    }
}
