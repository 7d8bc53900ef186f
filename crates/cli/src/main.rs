use anyhow::Result;
use clap::Parser;
use selfrunner::Cli;
use std::ffi::OsString;

fn main() -> Result<()> {
    // Initialize tracing based on RUST_LOG env var; stdout belongs to the sinks
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // With no TARGET the runner targets itself; it links no tests, so it
    // answers the engine's callbacks with an empty suite
    let args: Vec<OsString> = std::env::args_os().collect();
    if selfrunner::is_harness_invocation(&args) {
        return selfrunner::run_tests(args, Vec::new());
    }

    let cli = Cli::parse_from(args);
    cli.execute()
}
