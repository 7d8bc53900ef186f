//! Test selection: explicit test names plus an optional expression

pub mod expression;

use quick_xml::escape::escape;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::RunOptions;
use crate::types::TestCase;

pub use expression::Expr;

/// Immutable test selection handed to the engine.
///
/// A test is selected when it is named explicitly (or no names were given)
/// and the expression holds (or there is none).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestFilter {
    tests: Vec<String>,
    expression: Option<Expr>,
}

impl TestFilter {
    /// A filter that selects everything
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty() && self.expression.is_none()
    }

    /// Explicitly named tests, in the order they were added
    pub fn tests(&self) -> &[String] {
        &self.tests
    }

    pub fn expression(&self) -> Option<&Expr> {
        self.expression.as_ref()
    }

    pub fn matches(&self, case: &TestCase) -> bool {
        let named = self.tests.is_empty() || self.tests.iter().any(|t| *t == case.full_name);
        named && self.expression.as_ref().is_none_or(|e| e.matches(case))
    }

    /// Filter rendered as `<filter>` XML for diagnostics
    pub fn to_xml(&self) -> String {
        if self.is_empty() {
            return "<filter />".to_string();
        }

        let mut xml = String::from("<filter>");
        if !self.tests.is_empty() {
            xml.push_str("<or>");
            for test in &self.tests {
                xml.push_str(&format!("<test>{}</test>", escape(test.as_str())));
            }
            xml.push_str("</or>");
        }
        if let Some(expr) = &self.expression {
            xml.push_str(&format!("<where>{}</where>", escape(expr.to_string().as_str())));
        }
        xml.push_str("</filter>");
        xml
    }
}

/// Accumulates selections until [`TestFilterBuilder::get_filter`] freezes them
#[derive(Debug, Default)]
pub struct TestFilterBuilder {
    tests: Vec<String>,
    expression: Option<Expr>,
}

impl TestFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include a test by its full name; empty names are kept as given
    pub fn add_test(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.tests.push(full_name.into());
        self
    }

    /// Parse `expression` and use it as the selection clause.
    ///
    /// Calling this again replaces the previous clause.
    pub fn select_where(&mut self, expression: &str) -> Result<&mut Self> {
        self.expression = Some(Expr::parse(expression)?);
        Ok(self)
    }

    pub fn get_filter(self) -> TestFilter {
        TestFilter {
            tests: self.tests,
            expression: self.expression,
        }
    }
}

/// Apply the test list file and filter expression from `options` to `builder`.
///
/// A configured test list that does not exist is fatal.
pub fn build_filter(options: &RunOptions, mut builder: TestFilterBuilder) -> Result<TestFilter> {
    if let Some(path) = options.test_list() {
        for test in read_test_list(path)? {
            builder.add_test(test);
        }
    }

    if let Some(expression) = options.filter_expression() {
        builder.select_where(expression)?;
    }

    let filter = builder.get_filter();
    debug!("Built test filter: {}", filter.to_xml());
    Ok(filter)
}

/// Read one test name per line, keeping blank lines as empty names.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_test_list(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(Error::TestListNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let tests = split_lines(&String::from_utf8_lossy(&bytes));
    debug!("Read {} test names from {}", tests.len(), path.display());
    Ok(tests)
}

/// Split on `\n`, `\r\n` or a lone `\r`; a trailing terminator does not start a new line
fn split_lines(contents: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = contents.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
