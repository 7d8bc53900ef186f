//! Self-hosting test binaries
//!
//! A `harness = false` test target hands its tests to [`run_tests`]. Started
//! normally, it parses runner flags and runs with itself as the target. The
//! libtest engine then calls the same binary back with `--list` or `--exact`,
//! and those calls are served by libtest-mimic.

use anyhow::Result;
use libtest_mimic::{Arguments, Trial};
use std::ffi::{OsStr, OsString};
use tracing::debug;

/// Flags the libtest engine passes when it calls back into a test binary
const HARNESS_FLAGS: [&str; 2] = ["--list", "--exact"];

/// Whether `args` (program name first) is a libtest call rather than a runner call
pub fn is_harness_invocation<T: AsRef<OsStr>>(args: &[T]) -> bool {
    args.iter()
        .skip(1)
        .any(|arg| HARNESS_FLAGS.iter().any(|flag| arg.as_ref() == *flag))
}

/// Entry point for a test binary that hosts `tests` and runs them itself.
///
/// A libtest call exits with status 101 when a served test fails, as a
/// libtest harness does.
pub fn run_tests<I, T>(args: I, tests: Vec<Trial>) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if !is_harness_invocation(&args) {
        return crate::run(args, None, None);
    }

    debug!("Serving {} hosted tests", tests.len());
    let arguments = Arguments::from_iter(args);
    libtest_mimic::run(&arguments, tests).exit_if_failed();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_callbacks_are_harness_invocations() {
        assert!(is_harness_invocation(&["suite", "--list", "--format", "terse"]));
        assert!(is_harness_invocation(&[
            "suite",
            "--exact",
            "math::adds",
            "--nocapture",
            "--test-threads=1"
        ]));
    }

    #[test]
    fn test_runner_flags_are_not_harness_invocations() {
        assert!(!is_harness_invocation(&["suite"]));
        assert!(!is_harness_invocation(&["suite", "--explore", "-c"]));
        assert!(!is_harness_invocation(&["--list"]));
    }
}
