//! Shared fixtures for monitor integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use co2mon_hid_protocol::RawReport;

pub const CO2_600_PLAIN: RawReport = [0x50, 0x02, 0x58, 0xAA, 0x0D, 0x00, 0x00, 0x00];
pub const TEMP_4500_PLAIN: RawReport = [0x42, 0x11, 0x94, 0xE7, 0x0D, 0x00, 0x00, 0x00];
pub const GARBAGE: RawReport = [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04];

#[derive(Default)]
struct SinkState {
    bytes: Vec<u8>,
    writes: usize,
    max_writes: Option<usize>,
}

/// In-memory output sink. Clones share the buffer. Optionally starts failing
/// with `BrokenPipe` after a number of successful writes.
#[derive(Clone, Default)]
pub struct SharedSink {
    state: Arc<Mutex<SinkState>>,
}

impl SharedSink {
    pub fn closing_after(max_writes: usize) -> Self {
        let sink = Self::default();
        sink.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .max_writes = Some(max_writes);
        sink
    }

    pub fn lines(&self) -> Vec<serde_json::Value> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&state.bytes)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn raw(&self) -> String {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&state.bytes).into_owned()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.max_writes.is_some_and(|max| state.writes >= max) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "sink closed",
            ));
        }
        state.writes += 1;
        state.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
