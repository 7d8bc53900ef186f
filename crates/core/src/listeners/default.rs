use std::io::Write;

use super::{SinkKind, TestEventListener};
use crate::error::Result;
use crate::events::TestEvent;

/// Writes each event's XML on its own line
pub struct DefaultEventListener<W: Write> {
    out: W,
}

impl<W: Write> DefaultEventListener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TestEventListener for DefaultEventListener<W> {
    fn on_test_event(&mut self, event: &TestEvent) -> Result<()> {
        let xml = event.to_xml()?;
        writeln!(self.out, "{xml}")?;
        self.out.flush()?;
        Ok(())
    }

    fn kind(&self) -> SinkKind {
        SinkKind::PlainText
    }
}
