use anyhow::{Context, Result};
use std::io::Write;
use tracing::{debug, info};

use selfrunner_core::{FileConfig, LibtestEngine, SelfRunner};

use crate::cli::Cli;

pub fn run_command(cli: Cli, out: Box<dyn Write>) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let config = FileConfig::discover(&cwd).context("Failed to load configuration")?;

    let target = cli.target.clone();
    let options = cli.into_run_options(&config);
    debug!("Run options: {:?}", options);

    let mut runner = SelfRunner::new(Box::new(LibtestEngine::new()), out);
    if let Some(target) = target {
        runner = runner.with_target(target);
    }

    let report = runner.run(&options).context("Test run failed")?;

    match report.result.summary() {
        Some(summary) => info!(
            "Finished: {} passed, {} failed, {} skipped",
            summary.passed, summary.failed, summary.skipped
        ),
        None => info!("Explored {} tests", report.result.test_case_count()),
    }

    Ok(())
}
