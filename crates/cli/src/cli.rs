use anyhow::Result;
use clap::Parser;
use selfrunner_core::{FileConfig, RunOptions, options::DEFAULT_QUEUE_NAME};
use std::path::PathBuf;

use crate::commands::run_command;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "selfrunner")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug                Enable debug logging\n    TEAMCITY_PROCESS_FLOW_ID      flowId attached to TeamCity messages")]
pub struct Cli {
    /// Test binary to run (defaults to this executable)
    pub target: Option<PathBuf>,

    /// Display test info without running anything
    #[arg(short = 'e', long = "explore")]
    pub explore: bool,

    /// Display concise console output
    #[arg(short = 'c', long = "console")]
    pub console: bool,

    /// Test filter selection, e.g. "class == net::tests and name !~ /slow/"
    #[arg(short = 'f', long = "filter")]
    pub filter: Option<String>,

    /// File listing the tests to run or explore, one per line
    #[arg(short = 'l', long = "testlist")]
    pub test_list: Option<PathBuf>,

    /// Engine setting as key=value (repeatable)
    #[arg(short = 's', long = "settings", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Use TeamCity service messages
    #[arg(short = 't', long = "teamcity")]
    pub teamcity: bool,

    /// File to write the result XML to
    #[arg(short = 'o', long = "outputfile")]
    pub output_file: Option<PathBuf>,

    /// Redis host; publishes events to the queue instead of stdout
    #[arg(short = 'r', long = "redis")]
    pub redis: Option<String>,

    /// Queue name [default: test-logs]
    #[arg(short = 'q', long = "queue")]
    pub queue: Option<String>,
}

impl Cli {
    /// Execute the run
    pub fn execute(self) -> Result<()> {
        run_command(self, Box::new(std::io::stdout()))
    }

    /// Layer these flags over `config`; flags win, settings from both apply
    pub fn into_run_options(self, config: &FileConfig) -> RunOptions {
        let mut settings = config.settings.clone();
        settings.extend(self.settings);

        RunOptions {
            explore: self.explore,
            console: self.console || config.console,
            filter: self.filter,
            test_list_file: self.test_list,
            settings,
            teamcity: self.teamcity || config.teamcity,
            output_file: self.output_file.or_else(|| config.output_file.clone()),
            redis: self.redis.or_else(|| config.redis.clone()),
            queue_name: self
                .queue
                .or_else(|| config.queue_name.clone())
                .unwrap_or_else(|| DEFAULT_QUEUE_NAME.to_string()),
        }
    }
}
