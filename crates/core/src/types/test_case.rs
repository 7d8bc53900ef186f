use serde::{Deserialize, Serialize};

/// A test discovered in the target binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Engine assigned id, e.g. `0-1001`
    pub id: String,
    /// Full libtest path, e.g. `net::tests::connects`
    pub full_name: String,
    /// Marked `#[ignore]` in the source
    #[serde(default)]
    pub ignored: bool,
}

impl TestCase {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            ignored: false,
        }
    }

    pub fn ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }

    /// Last `::` segment of the full name
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit_once("::")
            .map(|(_, name)| name)
            .unwrap_or(&self.full_name)
    }

    /// Module path holding the test; empty at the crate root
    pub fn class_name(&self) -> &str {
        self.full_name
            .rsplit_once("::")
            .map(|(class, _)| class)
            .unwrap_or("")
    }
}
