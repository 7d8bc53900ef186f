//! Engine backed by a compiled libtest harness binary

use chrono::Utc;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output};
use std::time::Instant;
use tracing::{debug, info};

use super::{TestEngine, TestRunner};
use crate::error::{Error, Result};
use crate::events::TestEvent;
use crate::filter::TestFilter;
use crate::listeners::TestEventListener;
use crate::package::TestPackage;
use crate::result::RunResult;
use crate::settings::SettingValue;
use crate::types::{TestCase, TestCaseResult};

/// Package setting naming the directory tests run in
pub const WORK_DIRECTORY: &str = "WorkDirectory";

/// First id handed to discovered tests
const FIRST_TEST_ID: usize = 1001;

/// Runs tests by spawning the test binary, one process per test
#[derive(Debug, Default, Clone, Copy)]
pub struct LibtestEngine;

impl LibtestEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TestEngine for LibtestEngine {
    fn name(&self) -> &'static str {
        "libtest"
    }

    fn get_runner(&self, package: &TestPackage) -> Result<Box<dyn TestRunner>> {
        Ok(Box::new(LibtestRunner::load(package)?))
    }
}

#[derive(Debug)]
pub struct LibtestRunner {
    binary: PathBuf,
    suite: String,
    work_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl LibtestRunner {
    pub fn load(package: &TestPackage) -> Result<Self> {
        let binary = package.path().to_path_buf();
        if !binary.is_file() {
            return Err(Error::EngineError(format!(
                "Test binary {} not found",
                binary.display()
            )));
        }

        let mut work_dir = None;
        let mut env = Vec::new();
        for (key, value) in package.settings() {
            match (key.as_str(), value) {
                (WORK_DIRECTORY, value) => work_dir = Some(PathBuf::from(value.to_string())),
                (_, SettingValue::Integer(num)) => env.push((key.clone(), num.to_string())),
                (_, SettingValue::String(s)) => env.push((key.clone(), s.clone())),
            }
        }

        info!("Loaded test binary {}", binary.display());
        Ok(Self {
            binary,
            suite: package.name(),
            work_dir,
            env,
        })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        cmd
    }

    fn output(&self, mut cmd: Command) -> Result<Output> {
        debug!("Running {:?}", cmd);
        cmd.output().map_err(|e| {
            Error::EngineError(format!("Failed to launch {}: {}", self.binary.display(), e))
        })
    }

    fn list(&self, ignored_only: bool) -> Result<Vec<String>> {
        let mut cmd = self.command();
        cmd.args(["--list", "--format", "terse"]);
        if ignored_only {
            cmd.arg("--ignored");
        }

        let output = self.output(cmd)?;
        if !output.status.success() {
            return Err(Error::EngineError(format!(
                "Listing tests in {} failed with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(parse_test_list(&String::from_utf8_lossy(&output.stdout)))
    }

    /// All tests in discovery order, ids assigned before filtering
    fn discover(&self, filter: &TestFilter) -> Result<Vec<TestCase>> {
        let ignored: HashSet<String> = self.list(true)?.into_iter().collect();
        let cases: Vec<TestCase> = self
            .list(false)?
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let is_ignored = ignored.contains(&name);
                TestCase::new(format!("0-{}", FIRST_TEST_ID + index), name).ignored(is_ignored)
            })
            .filter(|case| filter.matches(case))
            .collect();
        debug!("Selected {} tests from {}", cases.len(), self.suite);
        Ok(cases)
    }

    fn execute(&self, case: TestCase) -> Result<TestCaseResult> {
        let mut cmd = self.command();
        cmd.args(["--exact", case.full_name.as_str(), "--nocapture", "--test-threads=1"]);

        let started = Instant::now();
        let output = self.output(cmd)?;
        let duration = started.elapsed();

        if output.status.success() {
            Ok(TestCaseResult::passed(case, duration))
        } else {
            let message = failure_message(
                &String::from_utf8_lossy(&output.stdout),
                &String::from_utf8_lossy(&output.stderr),
                output.status,
            );
            Ok(TestCaseResult::failed(case, duration, message))
        }
    }
}

impl TestRunner for LibtestRunner {
    fn explore(&mut self, filter: &TestFilter) -> Result<RunResult> {
        let start = Utc::now();
        let cases = self.discover(filter)?;
        Ok(RunResult::explored(&self.binary, cases, start, Utc::now()))
    }

    fn run(
        &mut self,
        listener: &mut dyn TestEventListener,
        filter: &TestFilter,
    ) -> Result<RunResult> {
        let start = Utc::now();
        let cases = self.discover(filter)?;
        listener.on_test_event(&TestEvent::StartRun {
            name: self.suite.clone(),
            count: cases.len(),
        })?;

        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            let result = if case.ignored {
                TestCaseResult::skipped(case, "ignored")
            } else {
                listener.on_test_event(&TestEvent::StartTest(case.clone()))?;
                self.execute(case)?
            };
            listener.on_test_event(&TestEvent::TestCase(result.clone()))?;
            results.push(result);
        }

        let result = RunResult::executed(&self.binary, results, start, Utc::now());
        listener.on_test_event(&TestEvent::TestRun(result.clone()))?;
        Ok(result)
    }
}

impl Drop for LibtestRunner {
    fn drop(&mut self) {
        debug!("Released runner for {}", self.binary.display());
    }
}

/// Test names from `--list --format terse` output; benchmarks are skipped
fn parse_test_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.strip_suffix(": test"))
        .map(str::to_string)
        .collect()
}

/// Trimmed stdout then stderr, skipping empty streams
fn failure_message(stdout: &str, stderr: &str, status: ExitStatus) -> String {
    let parts: Vec<&str> = [stdout.trim(), stderr.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return format!("test process exited with {status}");
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::parse_settings;

    #[test]
    fn test_parse_test_list() {
        let stdout = "net::tests::connects: test\nnet::tests::slow: test\nbench_parse: benchmark\n";
        assert_eq!(
            parse_test_list(stdout),
            vec!["net::tests::connects", "net::tests::slow"]
        );
        assert!(parse_test_list("").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_message_combines_streams() {
        use std::os::unix::process::ExitStatusExt;

        let status = ExitStatus::from_raw(101 << 8);
        assert_eq!(
            failure_message("context: left=1 right=2\n", " thread panicked \n", status),
            "context: left=1 right=2\nthread panicked"
        );
        assert_eq!(failure_message(" out ", "", status), "out");
        assert_eq!(failure_message("\n", "boom", status), "boom");
        assert_eq!(
            failure_message("", "", status),
            "test process exited with exit status: 101"
        );
    }

    #[test]
    fn test_missing_binary_is_engine_error() {
        let package = TestPackage::new("/no/such/test-binary");
        let err = LibtestEngine::new().get_runner(&package).err().unwrap();
        assert!(matches!(err, Error::EngineError(_)));
    }

    #[test]
    fn test_settings_become_env_and_work_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = dir.path().join("suite");
        std::fs::write(&binary, "").unwrap();

        let package = TestPackage::new(&binary).with_settings(parse_settings(&[
            "WorkDirectory=/srv/fixtures",
            "SEED=7",
            "MODE=fast",
        ]));
        let runner = LibtestRunner::load(&package).unwrap();

        assert_eq!(runner.work_dir, Some(PathBuf::from("/srv/fixtures")));
        assert_eq!(
            runner.env,
            vec![
                ("MODE".to_string(), "fast".to_string()),
                ("SEED".to_string(), "7".to_string())
            ]
        );
        assert_eq!(runner.suite, "suite");
    }
}
