//! Device transport.
//!
//! The monitor core only needs two operations from the device: one feature
//! report write to arm it, then a stream of 8-byte input report reads.
//! Opening happens in the concrete type's constructor and closing on drop.

use co2mon_hid_protocol::{DeviceKey, RawReport};
use hidapi::{HidApi, HidDevice};
use tracing::{debug, info};

use crate::{MonitorError, MonitorResult};

/// How long a single read waits for a report before returning `Ok(0)`.
///
/// The device reports roughly every second, so a timed-out read is normal
/// idle time, not an error.
pub const READ_TIMEOUT_MS: i32 = 1000;

pub trait Co2Transport: Send {
    fn send_feature_report(&mut self, report: &[u8]) -> MonitorResult<()>;

    /// Read one input report into `buf`, returning the byte count.
    ///
    /// `Ok(0)` means no report arrived in time.
    fn read_report(&mut self, buf: &mut RawReport) -> MonitorResult<usize>;
}

/// Arm the device so it starts streaming reports scrambled with `key`.
pub fn arm<T: Co2Transport + ?Sized>(transport: &mut T, key: &DeviceKey) -> MonitorResult<()> {
    transport.send_feature_report(&key.feature_report())?;
    debug!("Device armed");
    Ok(())
}

/// `hidapi`-backed transport for a physical monitor.
pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    /// Open the first attached device matching `vendor_id`/`product_id`.
    pub fn open(vendor_id: u16, product_id: u16) -> MonitorResult<Self> {
        let api = HidApi::new().map_err(|e| MonitorError::HidInit(e.to_string()))?;
        let device = api
            .open(vendor_id, product_id)
            .map_err(|e| MonitorError::DeviceOpen {
                vendor_id,
                product_id,
                reason: e.to_string(),
            })?;

        match device.get_product_string() {
            Ok(Some(product)) => {
                info!(vendor_id, product_id, %product, "Opened CO2 monitor");
            }
            _ => info!(vendor_id, product_id, "Opened CO2 monitor"),
        }

        Ok(Self { device })
    }
}

impl Co2Transport for HidTransport {
    fn send_feature_report(&mut self, report: &[u8]) -> MonitorResult<()> {
        self.device
            .send_feature_report(report)
            .map_err(|e| MonitorError::FeatureReport(e.to_string()))
    }

    fn read_report(&mut self, buf: &mut RawReport) -> MonitorResult<usize> {
        self.device
            .read_timeout(buf, READ_TIMEOUT_MS)
            .map_err(|e| MonitorError::Read(e.to_string()))
    }
}

/// In-memory transport that replays a fixed script of reads.
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Pause before an exhausted script reports a timed-out read.
    const IDLE_READ: Duration = Duration::from_millis(1);

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ScriptedRead {
        /// A full 8-byte report.
        Report(RawReport),
        /// A read that returned only the first `n` bytes of the report.
        Short(RawReport, usize),
        /// A failed read.
        Error(String),
    }

    /// Cloning shares the script and the write history, so a test can keep a
    /// handle while the monitor owns the transport.
    #[derive(Clone, Default)]
    pub struct ScriptedTransport {
        reads: Arc<Mutex<VecDeque<ScriptedRead>>>,
        feature_reports: Arc<Mutex<Vec<Vec<u8>>>>,
        reject_feature_reports: bool,
    }

    impl ScriptedTransport {
        pub fn new(script: impl IntoIterator<Item = ScriptedRead>) -> Self {
            Self {
                reads: Arc::new(Mutex::new(script.into_iter().collect())),
                ..Self::default()
            }
        }

        /// A transport whose arming write always fails.
        pub fn rejecting_feature_reports() -> Self {
            Self {
                reject_feature_reports: true,
                ..Self::default()
            }
        }

        pub fn push(&self, read: ScriptedRead) {
            let mut reads = self.reads.lock().unwrap_or_else(|e| e.into_inner());
            reads.push_back(read);
        }

        pub fn remaining(&self) -> usize {
            self.reads.lock().unwrap_or_else(|e| e.into_inner()).len()
        }

        pub fn feature_reports(&self) -> Vec<Vec<u8>> {
            self.feature_reports
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }
    }

    impl Co2Transport for ScriptedTransport {
        fn send_feature_report(&mut self, report: &[u8]) -> MonitorResult<()> {
            if self.reject_feature_reports {
                return Err(MonitorError::FeatureReport("device rejected report".into()));
            }
            let mut history = self
                .feature_reports
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            history.push(report.to_vec());
            Ok(())
        }

        fn read_report(&mut self, buf: &mut RawReport) -> MonitorResult<usize> {
            let next = self
                .reads
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front();
            match next {
                Some(ScriptedRead::Report(report)) => {
                    *buf = report;
                    Ok(report.len())
                }
                Some(ScriptedRead::Short(report, len)) => {
                    *buf = report;
                    Ok(len.min(report.len()))
                }
                Some(ScriptedRead::Error(reason)) => Err(MonitorError::Read(reason)),
                None => {
                    std::thread::sleep(IDLE_READ);
                    Ok(0)
                }
            }
        }
    }
}
