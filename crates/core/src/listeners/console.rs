use std::io::Write;

use super::{SinkKind, TestEventListener};
use crate::error::Result;
use crate::events::TestEvent;
use crate::types::TestStatus;

/// Short human readable lines: one per finished test plus a summary
pub struct ConsoleEventListener<W: Write> {
    out: W,
}

impl<W: Write> ConsoleEventListener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TestEventListener for ConsoleEventListener<W> {
    fn on_test_event(&mut self, event: &TestEvent) -> Result<()> {
        match event {
            TestEvent::StartRun { name, count } => {
                let plural = if *count == 1 { "" } else { "s" };
                writeln!(self.out, "Running {count} test{plural} from {name}")?;
            }
            TestEvent::StartTest(_) => {}
            TestEvent::TestCase(result) => {
                let name = &result.case.full_name;
                match result.status {
                    TestStatus::Skipped => writeln!(self.out, "Skipped {name}")?,
                    status => writeln!(
                        self.out,
                        "{:<7} {} [{} ms]",
                        status.as_str(),
                        name,
                        result.duration.as_millis()
                    )?,
                }
                if result.status == TestStatus::Failed {
                    if let Some(message) = &result.message {
                        for line in message.lines() {
                            writeln!(self.out, "    {line}")?;
                        }
                    }
                }
            }
            TestEvent::TestRun(result) => match result.summary() {
                Some(summary) => {
                    writeln!(self.out)?;
                    writeln!(
                        self.out,
                        "Tests run: {}, Passed: {}, Failed: {}, Skipped: {}",
                        summary.total, summary.passed, summary.failed, summary.skipped
                    )?;
                }
                None => writeln!(self.out, "Found {} tests", result.test_case_count())?,
            },
        }
        self.out.flush()?;
        Ok(())
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }
}
