pub mod outcome;
pub mod test_case;

// Re-export commonly used types
pub use outcome::{RunSummary, TestCaseResult, TestStatus};
pub use test_case::TestCase;
