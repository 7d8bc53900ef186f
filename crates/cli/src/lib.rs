pub mod cli;
pub mod commands;
pub mod harness;

// Re-export commonly used items
pub use cli::Cli;
pub use harness::{is_harness_invocation, run_tests};
pub use libtest_mimic::{Failed, Trial};

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

/// Parse `args` and run, for test crates that embed the runner in their own `main`.
///
/// `target` overrides the test binary (otherwise the positional argument, then
/// the running executable); `out` replaces stdout as the sink output. Help and
/// version requests are printed and return `Ok`.
pub fn run<I, T>(args: I, target: Option<PathBuf>, out: Option<Box<dyn Write>>) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if target.is_some() {
        cli.target = target;
    }
    let out = out.unwrap_or_else(|| Box::new(std::io::stdout()));
    commands::run_command(cli, out)
}
