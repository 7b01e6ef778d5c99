//! Error types for the monitor.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Failed to initialize HID API: {0}")]
    HidInit(String),

    #[error("Failed to open device VID=0x{vendor_id:04X} PID=0x{product_id:04X}: {reason}")]
    DeviceOpen {
        vendor_id: u16,
        product_id: u16,
        reason: String,
    },

    #[error("Failed to send feature report: {0}")]
    FeatureReport(String),

    #[error("Failed to read from device: {0}")]
    Read(String),

    #[error("Failed to write snapshot: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid snapshot interval {0:?}: must be non-zero and at most {max:?}", max = crate::config::MAX_INTERVAL)]
    InvalidInterval(std::time::Duration),

    #[error("Report producer stopped")]
    ProducerStopped,
}

impl MonitorError {
    /// Process exit status for a fatal error of this kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::HidInit(_) | Self::DeviceOpen { .. } => 2,
            Self::FeatureReport(_) => 3,
            Self::Output(_) | Self::Serialize(_) => 4,
            Self::Read(_) | Self::InvalidInterval(_) | Self::ProducerStopped => 1,
        }
    }
}

pub type MonitorResult<T> = Result<T, MonitorError>;
