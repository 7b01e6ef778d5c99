//! Desktop CO₂ monitor daemon.
//!
//! Opens the monitor over USB HID, arms it with the device key, then runs
//! two tasks: a blocking producer that decodes reports into measurements and
//! an async aggregator that merges them into a [`Snapshot`] and writes it
//! through a [`SnapshotEncoder`] on a fixed interval.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod encoder;
pub mod error;
pub mod monitor;
pub mod snapshot;
pub mod transport;

pub use config::{Cli, DEFAULT_INTERVAL, MAX_INTERVAL, MonitorConfig, parse_interval};
pub use encoder::{JsonLinesEncoder, SnapshotEncoder};
pub use error::{MonitorError, MonitorResult};
pub use monitor::{Aggregator, process_report, produce, run};
pub use snapshot::Snapshot;
pub use transport::{Co2Transport, HidTransport, arm};
