use std::io::Write;

use super::{SinkKind, TestEventListener};
use crate::error::Result;
use crate::events::TestEvent;
use crate::types::TestStatus;

/// Environment variable TeamCity sets to the build's flow id
pub const FLOW_ID_VAR: &str = "TEAMCITY_PROCESS_FLOW_ID";

/// Details about the surrounding TeamCity build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamCityInfo {
    pub flow_id: Option<String>,
}

impl TeamCityInfo {
    pub fn from_env() -> Self {
        Self {
            flow_id: std::env::var(FLOW_ID_VAR).ok().filter(|id| !id.is_empty()),
        }
    }
}

/// Emits `##teamcity[...]` service messages
pub struct TeamCityEventListener<W: Write> {
    out: W,
    info: TeamCityInfo,
    suite: Option<String>,
}

impl<W: Write> TeamCityEventListener<W> {
    pub fn new(out: W, info: TeamCityInfo) -> Self {
        Self {
            out,
            info,
            suite: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn message(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut line = format!("##teamcity[{name}");
        for (key, value) in attributes {
            line.push_str(&format!(" {}='{}'", key, escape(value)));
        }
        if let Some(flow_id) = &self.info.flow_id {
            line.push_str(&format!(" flowId='{}'", escape(flow_id)));
        }
        line.push(']');
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

impl<W: Write> TestEventListener for TeamCityEventListener<W> {
    fn on_test_event(&mut self, event: &TestEvent) -> Result<()> {
        match event {
            TestEvent::StartRun { name, .. } => {
                self.message("testSuiteStarted", &[("name", name.as_str())])?;
                self.suite = Some(name.clone());
            }
            TestEvent::StartTest(case) => {
                self.message(
                    "testStarted",
                    &[
                        ("name", case.full_name.as_str()),
                        ("captureStandardOutput", "false"),
                    ],
                )?;
            }
            TestEvent::TestCase(result) => {
                let name = result.case.full_name.as_str();
                let message = result.message.as_deref().unwrap_or_default();
                match result.status {
                    TestStatus::Skipped => {
                        self.message("testIgnored", &[("name", name), ("message", message)])?;
                    }
                    status => {
                        if status == TestStatus::Failed {
                            let summary = message.lines().next().unwrap_or_default();
                            self.message(
                                "testFailed",
                                &[("name", name), ("message", summary), ("details", message)],
                            )?;
                        }
                        let duration = result.duration.as_millis().to_string();
                        self.message("testFinished", &[("name", name), ("duration", duration.as_str())])?;
                    }
                }
            }
            TestEvent::TestRun(_) => {
                if let Some(suite) = self.suite.take() {
                    self.message("testSuiteFinished", &[("name", suite.as_str())])?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn kind(&self) -> SinkKind {
        SinkKind::TeamCity
    }
}

/// TeamCity's `|` escaping for service message values
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '|' => escaped.push_str("||"),
            '\'' => escaped.push_str("|'"),
            '\n' => escaped.push_str("|n"),
            '\r' => escaped.push_str("|r"),
            '[' => escaped.push_str("|["),
            ']' => escaped.push_str("|]"),
            '\u{0085}' => escaped.push_str("|x"),
            '\u{2028}' => escaped.push_str("|l"),
            '\u{2029}' => escaped.push_str("|p"),
            _ => escaped.push(c),
        }
    }
    escaped
}
