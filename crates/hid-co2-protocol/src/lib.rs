//! USB HID protocol for ZyAura-based desktop CO₂ monitors.
//!
//! These devices (Holtek VID `0x04D9`, PID `0xA052`) stream 8-byte input
//! reports once they have been armed with an 8-byte key through a feature
//! report. Older firmware scrambles every report with that key; newer
//! firmware answers in plaintext.
//!
//! # Pipeline
//! 1. [`deobfuscate`] the raw report with the key.
//! 2. [`recover_frame`]: accept the decoded bytes if they [`validate`],
//!    otherwise accept the raw bytes if *they* validate, otherwise discard.
//! 3. [`classify`] the frame by opcode: `0x50` CO₂ ppm, `0x42` temperature,
//!    anything else ignored.
//!
//! This crate does no I/O and never allocates.
//!
//! # Sources
//! - Henryk Plötz, "Reverse-Engineering a low-cost USB CO₂ monitor" (hackaday.io)
//! - ZyAura ZG01 CO₂ module datasheet (opcode table)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod cipher;
pub mod frame;
pub mod ids;
pub mod measurement;

pub use cipher::{
    DeviceKey, FEATURE_REPORT_ID, FEATURE_REPORT_LEN, REPORT_LEN, RawReport, deobfuscate,
    obfuscate,
};
pub use frame::{Frame, FrameSource, RecoveredFrame, TERMINATOR, recover_frame, validate};
pub use ids::{CO2_MONITOR_PRODUCT_ID, CO2_MONITOR_VENDOR_ID, is_co2_monitor};
pub use measurement::{
    Classification, Measurement, OPCODE_CO2, OPCODE_TEMPERATURE, classify, temperature_celsius,
};
