//! Sinks that receive test events
//!
//! Exactly one sink is active per invocation. [`select_sink_kind`] picks it
//! from the options in a fixed order:
//!
//! 1. a redis endpoint makes the queue the output target
//! 2. explore mode always uses the plain text sink (writing to that target)
//! 3. `--console` selects the concise console sink
//! 4. `--teamcity` selects TeamCity service messages
//! 5. otherwise plain text

mod console;
mod default;
mod queue;
mod teamcity;

pub use console::ConsoleEventListener;
pub use default::DefaultEventListener;
pub use queue::{QueueEventListener, QueueWriter};
pub use teamcity::{TeamCityEventListener, TeamCityInfo};

use std::fmt;
use std::io::Write;
use tracing::debug;

use crate::error::Result;
use crate::events::TestEvent;
use crate::options::RunOptions;
use crate::queue::QueueConnector;

/// Receives every event of a run, synchronously and in order
pub trait TestEventListener {
    fn on_test_event(&mut self, event: &TestEvent) -> Result<()>;

    /// Which sink this is
    fn kind(&self) -> SinkKind;
}

/// The available sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    PlainText,
    Console,
    TeamCity,
    Queue,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SinkKind::PlainText => "plain text",
            SinkKind::Console => "console",
            SinkKind::TeamCity => "teamcity",
            SinkKind::Queue => "queue",
        };
        f.write_str(name)
    }
}

/// Pick the sink for `options`; see the module docs for the order
pub fn select_sink_kind(options: &RunOptions) -> SinkKind {
    if options.queue_endpoint().is_some() && !options.explore {
        return SinkKind::Queue;
    }
    if options.explore {
        return SinkKind::PlainText;
    }
    if options.console {
        return SinkKind::Console;
    }
    if options.teamcity {
        return SinkKind::TeamCity;
    }
    SinkKind::PlainText
}

/// Build the sink for `options`.
///
/// `out` is the output target used unless a redis endpoint is configured, in
/// which case a connection is opened through `connector` first. Failing to
/// connect is fatal.
pub fn create_listener(
    options: &RunOptions,
    out: Box<dyn Write>,
    connector: &dyn QueueConnector,
) -> Result<Box<dyn TestEventListener>> {
    let kind = select_sink_kind(options);
    debug!("Selected {} sink", kind);

    let publisher = match options.queue_endpoint() {
        Some(endpoint) => Some(connector.connect(endpoint)?),
        None => None,
    };
    let channel = options.queue_name.clone();

    let listener: Box<dyn TestEventListener> = match (kind, publisher) {
        (SinkKind::Queue, Some(publisher)) => Box::new(QueueEventListener::new(publisher, channel)),
        (SinkKind::PlainText, Some(publisher)) => {
            Box::new(DefaultEventListener::new(QueueWriter::new(publisher, channel)))
        }
        (SinkKind::Console, _) => Box::new(ConsoleEventListener::new(out)),
        (SinkKind::TeamCity, _) => {
            Box::new(TeamCityEventListener::new(out, TeamCityInfo::from_env()))
        }
        (SinkKind::PlainText | SinkKind::Queue, _) => Box::new(DefaultEventListener::new(out)),
    };
    Ok(listener)
}
