//! Pass/fail summarization of a test report
//!
//! Aggregates a [`TestReport`](crate::report::TestReport) into per-test pass
//! counts plus the subtests that did not pass, keeping report order. The
//! human rendering prints one line per non-passing subtest followed by a
//! per-test summary line.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::report::{Test, TestReport};

/// Status value that counts as a pass; compared exactly
pub const PASS_STATUS: &str = "PASS";

/// A subtest that did not pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTestFailure {
    /// Subtest name
    pub name: String,
    /// The reported status
    pub status: String,
}

/// Summary of one test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    /// Test name
    pub name: String,

    /// Count of subtests with status exactly `"PASS"`
    pub passed: usize,

    /// Subtests with any other status, in report order
    pub failures: Vec<SubTestFailure>,
}

impl TestSummary {
    /// Summarize one test's subtest results
    fn from_test(test: &Test) -> Self {
        let mut passed = 0;
        let mut failures = Vec::new();

        for sub_test in &test.sub_tests {
            if sub_test.status == PASS_STATUS {
                passed += 1;
            } else {
                failures.push(SubTestFailure {
                    name: sub_test.name.clone(),
                    status: sub_test.status.clone(),
                });
            }
        }

        Self {
            name: test.name.clone(),
            passed,
            failures,
        }
    }

    /// Total subtests seen for this test
    pub fn sub_test_count(&self) -> usize {
        self.passed + self.failures.len()
    }
}

/// Summary of a full report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Per-test summaries, in report order
    pub tests: Vec<TestSummary>,
}

impl ReportSummary {
    /// Summarize a report
    pub fn from_report(report: &TestReport) -> Self {
        Self {
            tests: report.tests.iter().map(TestSummary::from_test).collect(),
        }
    }

    /// Write the human-readable summary
    ///
    /// For each test: a `<test> <subtest> <status>` line per non-passing
    /// subtest, then `<test> <passed> subtests passed`.
    pub fn write_human<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for test in &self.tests {
            for failure in &test.failures {
                writeln!(writer, "{} {} {}", test.name, failure.name, failure.status)?;
            }
            writeln!(writer, "{} {} subtests passed", test.name, test.passed)?;
        }
        Ok(())
    }

    /// Serialize the summary to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
