use std::io::{self, Write};
use tracing::warn;

use super::{SinkKind, TestEventListener};
use crate::error::Result;
use crate::events::TestEvent;
use crate::queue::QueuePublisher;

/// Publishes every event's XML as one message on a channel
pub struct QueueEventListener {
    publisher: Box<dyn QueuePublisher>,
    channel: String,
}

impl QueueEventListener {
    pub fn new(publisher: Box<dyn QueuePublisher>, channel: impl Into<String>) -> Self {
        Self {
            publisher,
            channel: channel.into(),
        }
    }
}

impl TestEventListener for QueueEventListener {
    fn on_test_event(&mut self, event: &TestEvent) -> Result<()> {
        let xml = event.to_xml()?;
        self.publisher.publish(&self.channel, &xml)
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Queue
    }
}

/// A writer that publishes each completed line as a queue message
pub struct QueueWriter {
    publisher: Box<dyn QueuePublisher>,
    channel: String,
    buffer: Vec<u8>,
}

impl QueueWriter {
    pub fn new(publisher: Box<dyn QueuePublisher>, channel: impl Into<String>) -> Self {
        Self {
            publisher,
            channel: channel.into(),
            buffer: Vec::new(),
        }
    }

    fn publish_line(&mut self, line: &[u8]) -> io::Result<()> {
        let text = String::from_utf8_lossy(line);
        let text = text.strip_suffix('\r').unwrap_or(&text);
        self.publisher
            .publish(&self.channel, text)
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

impl Write for QueueWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.publish_line(&line[..pos])?;
        }
        Ok(buf.len())
    }

    /// Publishes any partial line still buffered
    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let line = std::mem::take(&mut self.buffer);
        self.publish_line(&line)
    }
}

impl Drop for QueueWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("Failed to publish buffered output to {}: {}", self.channel, e);
        }
    }
}
