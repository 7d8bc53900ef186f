//! Seams to the test engine that discovers and executes tests

mod libtest;

pub use libtest::{LibtestEngine, LibtestRunner};

use crate::error::Result;
use crate::filter::{TestFilter, TestFilterBuilder};
use crate::listeners::TestEventListener;
use crate::package::TestPackage;
use crate::result::RunResult;

/// Creates runners for test packages
pub trait TestEngine {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// A fresh builder for filters this engine understands
    fn filter_builder(&self) -> TestFilterBuilder {
        TestFilterBuilder::new()
    }

    /// Load `package`; the runner is released when dropped
    fn get_runner(&self, package: &TestPackage) -> Result<Box<dyn TestRunner>>;
}

/// A loaded test package
pub trait TestRunner {
    /// Discover the tests `filter` selects without running them
    fn explore(&mut self, filter: &TestFilter) -> Result<RunResult>;

    /// Execute the tests `filter` selects, reporting each transition to `listener`
    fn run(
        &mut self,
        listener: &mut dyn TestEventListener,
        filter: &TestFilter,
    ) -> Result<RunResult>;
}
