//! Main runner that wires options, filter, engine and sink into one run

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{
    engine::TestEngine,
    error::Result,
    events::TestEvent,
    filter::build_filter,
    listeners::{SinkKind, create_listener},
    options::RunOptions,
    package::TestPackage,
    queue::{QueueConnector, RedisConnector},
    result::RunResult,
};

/// What a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub result: RunResult,
    /// Serialised result, exactly as written to the output file
    pub xml: String,
    pub sink: SinkKind,
}

/// Runs one invocation: package, filter, runner, dispatch, teardown.
///
/// Consumed by [`SelfRunner::run`]; nothing is shared between invocations.
pub struct SelfRunner {
    engine: Box<dyn TestEngine>,
    out: Box<dyn Write>,
    connector: Box<dyn QueueConnector>,
    target: Option<PathBuf>,
}

impl SelfRunner {
    /// `out` receives sink output unless a queue endpoint takes over
    pub fn new(engine: Box<dyn TestEngine>, out: Box<dyn Write>) -> Self {
        Self {
            engine,
            out,
            connector: Box::new(RedisConnector),
            target: None,
        }
    }

    /// Test binary to load; defaults to the running executable
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_connector(mut self, connector: Box<dyn QueueConnector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn run(self, options: &RunOptions) -> Result<RunReport> {
        let Self {
            engine,
            out,
            connector,
            target,
        } = self;

        let target = match target {
            Some(target) => target,
            None => std::env::current_exe()?,
        };
        let package = TestPackage::new(target).with_settings(options.get_settings());
        debug!("Built package for {}", package.path().display());

        // A missing test list must fail before the engine loads anything
        let filter = build_filter(options, engine.filter_builder())?;

        let mut runner = engine.get_runner(&package)?;
        debug!("Acquired {} runner", engine.name());

        let mut listener = create_listener(options, out, connector.as_ref())?;
        let sink = listener.kind();

        let (result, xml) = if options.explore {
            debug!("Exploring {}", package.name());
            let result = runner.explore(&filter)?;
            let xml = result.outer_xml()?;
            listener.on_test_event(&TestEvent::TestRun(result.clone()))?;
            (result, xml)
        } else {
            debug!("Running {}", package.name());
            let result = runner.run(listener.as_mut(), &filter)?;
            let xml = result.outer_xml()?;
            (result, xml)
        };

        if let Some(path) = options.output_path() {
            write_output_file(path, &xml)?;
        }

        drop(listener);
        drop(runner);
        debug!("Released {} runner", engine.name());

        Ok(RunReport { result, xml, sink })
    }
}

/// Overwrite `path` with the result XML
fn write_output_file(path: &Path, xml: &str) -> Result<()> {
    fs::write(path, xml)?;
    info!("Wrote results to {}", path.display());
    Ok(())
}
