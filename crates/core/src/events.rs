//! Events an engine emits while a run progresses

use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};

use crate::error::Result;
use crate::result::{RunResult, into_string, write, write_case_result};
use crate::types::{TestCase, TestCaseResult};

/// One test lifecycle transition
#[derive(Debug, Clone, PartialEq)]
pub enum TestEvent {
    /// The run over suite `name` is about to execute `count` tests
    StartRun { name: String, count: usize },
    /// A test is about to execute
    StartTest(TestCase),
    /// A test finished, or was skipped
    TestCase(TestCaseResult),
    /// The whole run finished (or discovery completed)
    TestRun(RunResult),
}

impl TestEvent {
    /// Serialised form sinks forward
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        match self {
            TestEvent::StartRun { name, count } => {
                let count = count.to_string();
                let mut element = BytesStart::new("start-run");
                element.push_attribute(("name", name.as_str()));
                element.push_attribute(("count", count.as_str()));
                write(&mut writer, Event::Empty(element))?;
            }
            TestEvent::StartTest(case) => {
                let mut element = BytesStart::new("start-test");
                element.push_attribute(("id", case.id.as_str()));
                element.push_attribute(("name", case.name()));
                element.push_attribute(("fullname", case.full_name.as_str()));
                write(&mut writer, Event::Empty(element))?;
            }
            TestEvent::TestCase(result) => write_case_result(&mut writer, result)?,
            TestEvent::TestRun(result) => return result.outer_xml(),
        }
        into_string(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_start_events() {
        assert_eq!(
            TestEvent::StartRun {
                name: "net-1a2b".into(),
                count: 3
            }
            .to_xml()
            .unwrap(),
            r#"<start-run name="net-1a2b" count="3"/>"#
        );
        assert_eq!(
            TestEvent::StartTest(TestCase::new("0-1001", "io::reads"))
                .to_xml()
                .unwrap(),
            r#"<start-test id="0-1001" name="reads" fullname="io::reads"/>"#
        );
    }

    #[test]
    fn test_skipped_case_carries_reason() {
        let event = TestEvent::TestCase(TestCaseResult::skipped(
            TestCase::new("0-1002", "io::slow").ignored(true),
            "ignored",
        ));
        insta::assert_snapshot!(event.to_xml().unwrap(), @r#"<test-case id="0-1002" name="slow" fullname="io::slow" classname="io" result="Skipped" duration="0.000000"><reason><message>ignored</message></reason></test-case>"#);
    }

    #[test]
    fn test_passed_case_is_empty_element() {
        let event = TestEvent::TestCase(TestCaseResult::passed(
            TestCase::new("0-1001", "reads"),
            Duration::from_millis(12),
        ));
        assert_eq!(
            event.to_xml().unwrap(),
            r#"<test-case id="0-1001" name="reads" fullname="reads" classname="" result="Passed" duration="0.012000"/>"#
        );
    }
}
