//! Report producer and snapshot aggregator.
//!
//! ```text
//!  blocking pool                         async task
//! ┌──────────────────────┐   mpsc   ┌───────────────────────────┐
//! │ read → decode →      │ ───────► │ select! {                 │
//! │ validate → classify  │          │   measurement => apply    │
//! └──────────────────────┘          │   tick        => emit     │
//!                                   │ }                         │
//!                                   └───────────────────────────┘
//! ```
//!
//! The snapshot lives inside the aggregator task and is only touched from
//! its `select!` loop, so merges and emissions are serialized without a lock.

use std::time::Duration;

use co2mon_hid_protocol::{
    Classification, DeviceKey, FrameSource, Measurement, REPORT_LEN, RawReport, classify,
    recover_frame,
};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, trace, warn};

use crate::transport::Co2Transport;
use crate::config::MAX_INTERVAL;
use crate::{MonitorConfig, MonitorError, MonitorResult, Snapshot, SnapshotEncoder};

/// Measurements buffered between the producer and the aggregator.
pub const MEASUREMENT_QUEUE_DEPTH: usize = 64;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join("")
}

/// Run one raw report through the decode pipeline.
///
/// Undecodable reports are logged and dropped; unknown opcodes are dropped
/// quietly.
pub fn process_report(raw: &RawReport, key: &DeviceKey) -> Option<Measurement> {
    let Some(recovered) = recover_frame(raw, key) else {
        error!(raw = %hex(raw), "Failed to decode report");
        return None;
    };
    if recovered.source == FrameSource::Plaintext {
        trace!("Report was already plaintext");
    }

    match classify(&recovered.frame) {
        Classification::Measurement(measurement) => {
            debug!(?measurement, "Received measurement");
            Some(measurement)
        }
        Classification::Ignored { opcode } => {
            trace!(opcode, "Ignoring frame with unhandled opcode");
            None
        }
    }
}

/// Blocking read loop. Returns once the aggregator has gone away.
///
/// Read failures are logged and retried immediately.
pub fn produce<T: Co2Transport>(
    mut transport: T,
    key: DeviceKey,
    tx: mpsc::Sender<Measurement>,
) {
    let mut buf: RawReport = [0; REPORT_LEN];
    while !tx.is_closed() {
        match transport.read_report(&mut buf) {
            Ok(0) => continue,
            Ok(REPORT_LEN) => {}
            Ok(len) => {
                warn!(len, "Short read from device");
                continue;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read report");
                continue;
            }
        }

        let Some(measurement) = process_report(&buf, &key) else {
            continue;
        };
        if tx.blocking_send(measurement).is_err() {
            break;
        }
    }
    debug!("Report producer stopped");
}

/// Owns the snapshot and the encoder; merges measurements and emits on a
/// fixed period.
pub struct Aggregator<E> {
    snapshot: Snapshot,
    encoder: E,
    period: Duration,
}

impl<E: SnapshotEncoder> Aggregator<E> {
    /// The period must be non-zero and no longer than [`MAX_INTERVAL`].
    pub fn new(encoder: E, period: Duration) -> MonitorResult<Self> {
        if period.is_zero() || period > MAX_INTERVAL {
            return Err(MonitorError::InvalidInterval(period));
        }
        Ok(Self {
            snapshot: Snapshot::default(),
            encoder,
            period,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn apply(&mut self, measurement: Measurement) {
        self.snapshot.apply(measurement);
    }

    /// Stamp the snapshot with `now` (Unix seconds) and hand it to the encoder.
    pub fn emit(&mut self, now: i64) -> MonitorResult<()> {
        self.snapshot.stamp(now);
        self.encoder.encode(&self.snapshot)
    }

    /// Service measurements and ticks until the encoder fails or the
    /// producer hangs up.
    ///
    /// The first emission happens one full period after start.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Measurement>) -> MonitorResult<()> {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Some(measurement) => self.apply(measurement),
                    None => return Err(MonitorError::ProducerStopped),
                },
                _ = ticker.tick() => {
                    self.emit(chrono::Utc::now().timestamp())?;
                }
            }
        }
    }
}

/// Monitor an already armed transport until a fatal error occurs.
pub async fn run<T, E>(transport: T, config: &MonitorConfig, encoder: E) -> MonitorResult<()>
where
    T: Co2Transport + 'static,
    E: SnapshotEncoder,
{
    let aggregator = Aggregator::new(encoder, config.interval)?;
    info!(interval = ?config.interval, "Monitoring started");

    let (tx, rx) = mpsc::channel(MEASUREMENT_QUEUE_DEPTH);
    let key = config.key;
    // Detached: the producer notices the closed channel and exits on its own.
    let _producer = tokio::task::spawn_blocking(move || produce(transport, key, tx));

    aggregator.run(rx).await
}
