//! selfrunner - run a libtest binary's tests and report them to a sink
//!
//! This crate provides functionality to:
//! - Parse run options and `key=value` engine settings
//! - Build a test filter from a test list file and a selection expression
//! - Discover or execute tests through a pluggable engine
//! - Stream events to plain text, console, TeamCity or a redis queue
//! - Serialise the final result as XML
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod filter;
pub mod listeners;
pub mod options;
pub mod package;
pub mod queue;
pub mod result;
pub mod runner;
pub mod settings;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

pub use config::FileConfig;
pub use engine::{LibtestEngine, TestEngine, TestRunner};
pub use events::TestEvent;
pub use filter::{TestFilter, TestFilterBuilder};
pub use listeners::{SinkKind, TestEventListener, select_sink_kind};
pub use options::RunOptions;
pub use package::TestPackage;
pub use queue::{QueueConnector, QueuePublisher, RedisConnector};
pub use result::RunResult;
pub use runner::{RunReport, SelfRunner};
pub use settings::{SettingValue, SettingsMap};
