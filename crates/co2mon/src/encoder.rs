//! Snapshot output.

use std::io::Write;

use crate::{MonitorResult, Snapshot};

/// Sink for emitted snapshots. Any error is fatal to the monitor.
pub trait SnapshotEncoder {
    fn encode(&mut self, snapshot: &Snapshot) -> MonitorResult<()>;
}

/// Writes one JSON object per line and flushes after each.
///
/// ```text
/// {"time":1700000000,"co2":600,"temp":21.4375}
/// {"time":1700000005,"co2":612,"temp":null}
/// ```
pub struct JsonLinesEncoder<W> {
    writer: W,
}

impl<W: Write> JsonLinesEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SnapshotEncoder for JsonLinesEncoder<W> {
    fn encode(&mut self, snapshot: &Snapshot) -> MonitorResult<()> {
        let mut line = serde_json::to_vec(snapshot)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        Ok(())
    }
}
