use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::TestCase;

/// Final state of a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "Passed",
            TestStatus::Failed => "Failed",
            TestStatus::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of running (or skipping) one test
#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseResult {
    pub case: TestCase,
    pub status: TestStatus,
    pub duration: Duration,
    /// Failure message for failed tests, skip reason for skipped ones
    pub message: Option<String>,
}

impl TestCaseResult {
    pub fn passed(case: TestCase, duration: Duration) -> Self {
        Self {
            case,
            status: TestStatus::Passed,
            duration,
            message: None,
        }
    }

    pub fn failed(case: TestCase, duration: Duration, message: impl Into<String>) -> Self {
        Self {
            case,
            status: TestStatus::Failed,
            duration,
            message: Some(message.into()),
        }
    }

    pub fn skipped(case: TestCase, reason: impl Into<String>) -> Self {
        Self {
            case,
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            message: Some(reason.into()),
        }
    }
}

/// Counts over a set of results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a TestCaseResult>) -> Self {
        let mut summary = RunSummary::default();
        for result in results {
            summary.total += 1;
            match result.status {
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Failed => summary.failed += 1,
                TestStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    /// `Failed` if anything failed, otherwise `Passed`
    pub fn overall(&self) -> TestStatus {
        if self.failed > 0 {
            TestStatus::Failed
        } else {
            TestStatus::Passed
        }
    }
}
