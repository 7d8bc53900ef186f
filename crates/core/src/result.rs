//! The report an engine hands back for an explore or a run

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{RunSummary, TestCase, TestCaseResult, TestStatus};

/// What the engine produced for each selected test
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcomes {
    /// Discovery only
    Explored(Vec<TestCase>),
    /// Tests were executed
    Executed(Vec<TestCaseResult>),
}

/// Result tree for one explore or run, serialised as `<test-run>` XML
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub target: PathBuf,
    pub outcomes: TestOutcomes,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl RunResult {
    pub fn explored(
        target: impl Into<PathBuf>,
        cases: Vec<TestCase>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            target: target.into(),
            outcomes: TestOutcomes::Explored(cases),
            start_time,
            end_time,
        }
    }

    pub fn executed(
        target: impl Into<PathBuf>,
        results: Vec<TestCaseResult>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            target: target.into(),
            outcomes: TestOutcomes::Executed(results),
            start_time,
            end_time,
        }
    }

    pub fn test_case_count(&self) -> usize {
        match &self.outcomes {
            TestOutcomes::Explored(cases) => cases.len(),
            TestOutcomes::Executed(results) => results.len(),
        }
    }

    /// Counts for an executed run; `None` for explore results
    pub fn summary(&self) -> Option<RunSummary> {
        match &self.outcomes {
            TestOutcomes::Explored(_) => None,
            TestOutcomes::Executed(results) => Some(RunSummary::from_results(results)),
        }
    }

    pub fn duration(&self) -> Duration {
        (self.end_time - self.start_time).to_std().unwrap_or_default()
    }

    /// The complete `<test-run>` element
    pub fn outer_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        let count = self.test_case_count().to_string();
        let suite_name = suite_name(&self.target);
        let full_name = self.target.display().to_string();
        let summary = self.summary();

        let mut run = BytesStart::new("test-run");
        run.push_attribute(("id", "2"));
        run.push_attribute(("testcasecount", count.as_str()));
        if let Some(summary) = &summary {
            push_summary(&mut run, summary);
        }
        run.push_attribute(("start-time", format_time(&self.start_time).as_str()));
        run.push_attribute(("end-time", format_time(&self.end_time).as_str()));
        run.push_attribute(("duration", format_seconds(self.duration()).as_str()));
        write(&mut writer, Event::Start(run))?;

        let mut suite = BytesStart::new("test-suite");
        suite.push_attribute(("type", "Assembly"));
        suite.push_attribute(("id", "0-1000"));
        suite.push_attribute(("name", suite_name.as_str()));
        suite.push_attribute(("fullname", full_name.as_str()));
        suite.push_attribute(("testcasecount", count.as_str()));
        if let Some(summary) = &summary {
            push_summary(&mut suite, summary);
        }
        write(&mut writer, Event::Start(suite))?;

        match &self.outcomes {
            TestOutcomes::Explored(cases) => {
                for case in cases {
                    write_explored_case(&mut writer, case)?;
                }
            }
            TestOutcomes::Executed(results) => {
                for result in results {
                    write_case_result(&mut writer, result)?;
                }
            }
        }

        write(&mut writer, Event::End(BytesEnd::new("test-suite")))?;
        write(&mut writer, Event::End(BytesEnd::new("test-run")))?;
        into_string(writer)
    }
}

fn suite_name(target: &Path) -> String {
    target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn push_summary(element: &mut BytesStart<'_>, summary: &RunSummary) {
    element.push_attribute(("result", summary.overall().as_str()));
    element.push_attribute(("total", summary.total.to_string().as_str()));
    element.push_attribute(("passed", summary.passed.to_string().as_str()));
    element.push_attribute(("failed", summary.failed.to_string().as_str()));
    element.push_attribute(("skipped", summary.skipped.to_string().as_str()));
}

pub(crate) fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn format_seconds(duration: Duration) -> String {
    format!("{:.6}", duration.as_secs_f64())
}

pub(crate) fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::XmlError(e.to_string()))
}

pub(crate) fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| Error::XmlError(e.to_string()))
}

fn case_element<'a>(case: &'a TestCase) -> BytesStart<'a> {
    let mut element = BytesStart::new("test-case");
    element.push_attribute(("id", case.id.as_str()));
    element.push_attribute(("name", case.name()));
    element.push_attribute(("fullname", case.full_name.as_str()));
    element.push_attribute(("classname", case.class_name()));
    element
}

pub(crate) fn write_explored_case(writer: &mut Writer<Vec<u8>>, case: &TestCase) -> Result<()> {
    let mut element = case_element(case);
    let run_state = if case.ignored { "Ignored" } else { "Runnable" };
    element.push_attribute(("runstate", run_state));
    write(writer, Event::Empty(element))
}

pub(crate) fn write_case_result(
    writer: &mut Writer<Vec<u8>>,
    result: &TestCaseResult,
) -> Result<()> {
    let mut element = case_element(&result.case);
    let duration = format_seconds(result.duration);
    element.push_attribute(("result", result.status.as_str()));
    element.push_attribute(("duration", duration.as_str()));

    let Some(message) = &result.message else {
        return write(writer, Event::Empty(element));
    };

    write(writer, Event::Start(element))?;
    let wrapper = match result.status {
        TestStatus::Skipped => "reason",
        _ => "failure",
    };
    write(writer, Event::Start(BytesStart::new(wrapper)))?;
    write(writer, Event::Start(BytesStart::new("message")))?;
    write(writer, Event::Text(BytesText::new(message)))?;
    write(writer, Event::End(BytesEnd::new("message")))?;
    write(writer, Event::End(BytesEnd::new(wrapper)))?;
    write(writer, Event::End(BytesEnd::new("test-case")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn times() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        (start, start + chrono::Duration::milliseconds(1500))
    }

    #[test]
    fn test_explore_xml() {
        let (start, end) = times();
        let result = RunResult::explored(
            "/work/deps/net-1a2b",
            vec![
                TestCase::new("0-1001", "tests::connects"),
                TestCase::new("0-1002", "tests::slow").ignored(true),
            ],
            start,
            end,
        );

        insta::assert_snapshot!(result.outer_xml().unwrap(), @r#"<test-run id="2" testcasecount="2" start-time="2024-05-01T12:00:00.000Z" end-time="2024-05-01T12:00:01.500Z" duration="1.500000"><test-suite type="Assembly" id="0-1000" name="net-1a2b" fullname="/work/deps/net-1a2b" testcasecount="2"><test-case id="0-1001" name="connects" fullname="tests::connects" classname="tests" runstate="Runnable"/><test-case id="0-1002" name="slow" fullname="tests::slow" classname="tests" runstate="Ignored"/></test-suite></test-run>"#);
        assert_eq!(result.summary(), None);
    }

    #[test]
    fn test_run_xml_has_summary_and_failure() {
        let (start, end) = times();
        let result = RunResult::executed(
            "/work/deps/net-1a2b",
            vec![
                TestCaseResult::passed(
                    TestCase::new("0-1001", "tests::connects"),
                    Duration::from_millis(250),
                ),
                TestCaseResult::failed(
                    TestCase::new("0-1002", "tests::refuses"),
                    Duration::from_millis(5),
                    "assertion `left == right` failed",
                ),
            ],
            start,
            end,
        );

        let xml = result.outer_xml().unwrap();
        assert!(xml.starts_with(
            r#"<test-run id="2" testcasecount="2" result="Failed" total="2" passed="1" failed="1" skipped="0""#
        ));
        assert!(xml.contains(
            r#"<test-case id="0-1001" name="connects" fullname="tests::connects" classname="tests" result="Passed" duration="0.250000"/>"#
        ));
        assert!(xml.contains(
            "<failure><message>assertion `left == right` failed</message></failure></test-case>"
        ));
        assert!(xml.ends_with("</test-suite></test-run>"));
    }

    #[test]
    fn test_attributes_and_text_are_escaped() {
        let (start, end) = times();
        let result = RunResult::executed(
            "/work/deps/t",
            vec![TestCaseResult::failed(
                TestCase::new("0-1001", "parse::handles_<T>"),
                Duration::ZERO,
                "expected <a> & got b",
            )],
            start,
            end,
        );

        let xml = result.outer_xml().unwrap();
        assert!(xml.contains(r#"fullname="parse::handles_&lt;T&gt;""#));
        assert!(xml.contains("<message>expected &lt;a&gt; &amp; got b</message>"));
    }
}
