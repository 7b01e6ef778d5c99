//! Plaintext frame layout, integrity check and the decode fallback policy.
//!
//! A plaintext frame looks like:
//!
//! | Byte | Meaning                                  |
//! |------|------------------------------------------|
//! | 0    | opcode                                   |
//! | 1..3 | value, big-endian `u16`                  |
//! | 3    | checksum: `(b0 + b1 + b2) mod 256`       |
//! | 4    | terminator, always `0x0D`                |
//! | 5..8 | padding, ignored                         |

use crate::cipher::{DeviceKey, REPORT_LEN, RawReport, deobfuscate};

/// Offset of the opcode byte.
pub const OPCODE_OFFSET: usize = 0;

/// Offset of the checksum byte.
pub const CHECKSUM_OFFSET: usize = 3;

/// Offset of the terminator byte.
pub const TERMINATOR_OFFSET: usize = 4;

/// Value of the terminator byte in every valid frame.
pub const TERMINATOR: u8 = 0x0D;

/// Returns `true` iff `frame` is exactly [`REPORT_LEN`] bytes long, carries
/// the terminator and has a matching checksum.
pub fn validate(frame: &[u8]) -> bool {
    let Ok(bytes) = <&RawReport>::try_from(frame) else {
        return false;
    };
    let [opcode, hi, lo, checksum, terminator, ..] = *bytes;
    terminator == TERMINATOR && opcode.wrapping_add(hi).wrapping_add(lo) == checksum
}

/// A frame that has passed [`validate`].
///
/// The only way to obtain one is [`Frame::parse`] (or [`recover_frame`]),
/// so nothing downstream can see unchecked bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame(RawReport);

impl Frame {
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if !validate(bytes) {
            return None;
        }
        let bytes: RawReport = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn opcode(&self) -> u8 {
        self.0[OPCODE_OFFSET]
    }

    /// Big-endian 16-bit payload from bytes 1 and 2.
    pub fn value(&self) -> u16 {
        let [_, hi, lo, ..] = self.0;
        u16::from_be_bytes([hi, lo])
    }

    pub fn as_bytes(&self) -> &[u8; REPORT_LEN] {
        &self.0
    }
}

/// Where a recovered frame came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// The deobfuscated report validated.
    Decoded,
    /// The deobfuscated report did not validate but the raw report did;
    /// the device is answering in plaintext.
    Plaintext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredFrame {
    pub frame: Frame,
    pub source: FrameSource,
}

/// Turn one raw report into a validated frame.
///
/// The deobfuscated bytes are tried first, then the raw bytes. Returns
/// `None` when neither validates; the report must then be discarded.
pub fn recover_frame(raw: &RawReport, key: &DeviceKey) -> Option<RecoveredFrame> {
    if let Some(frame) = Frame::parse(&deobfuscate(raw, key)) {
        return Some(RecoveredFrame {
            frame,
            source: FrameSource::Decoded,
        });
    }
    Frame::parse(raw).map(|frame| RecoveredFrame {
        frame,
        source: FrameSource::Plaintext,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::obfuscate;

    const CO2_600: RawReport = [0x50, 0x02, 0x58, 0xAA, 0x0D, 0x00, 0x00, 0x00];

    #[test]
    fn valid_plain_frame_accepted() {
        assert!(validate(&CO2_600));
    }

    #[test]
    fn wrong_terminator_rejected() {
        let mut frame = CO2_600;
        frame[TERMINATOR_OFFSET] = 0x0A;
        assert!(!validate(&frame));
    }

    #[test]
    fn wrong_checksum_rejected() {
        let mut frame = CO2_600;
        frame[CHECKSUM_OFFSET] = 0xAB;
        assert!(!validate(&frame));
    }

    #[test]
    fn checksum_wraps_modulo_256() {
        // 0xFF + 0xFF + 0x03 = 0x201 -> 0x01
        assert!(validate(&[0xFF, 0xFF, 0x03, 0x01, 0x0D, 0, 0, 0]));
    }

    #[test]
    fn short_and_long_inputs_rejected() {
        assert!(!validate(&[]));
        assert!(!validate(&CO2_600[..5]));
        assert!(!validate(&CO2_600[..7]));
        let mut long = CO2_600.to_vec();
        long.push(0);
        assert!(!validate(&long));
    }

    #[test]
    fn padding_bytes_are_ignored() {
        assert!(validate(&[0x50, 0x02, 0x58, 0xAA, 0x0D, 0xDE, 0xAD, 0xFF]));
    }

    #[test]
    fn frame_accessors() {
        let frame = Frame::parse(&CO2_600).expect("valid frame");
        assert_eq!(frame.opcode(), 0x50);
        assert_eq!(frame.value(), 600);
        assert_eq!(frame.as_bytes(), &CO2_600);
    }

    #[test]
    fn parse_rejects_invalid_bytes() {
        assert_eq!(Frame::parse(&[0; REPORT_LEN]), None);
    }

    #[test]
    fn scrambled_report_recovered_as_decoded() {
        let key = DeviceKey::DEFAULT;
        let raw = obfuscate(&CO2_600, &key);
        let recovered = recover_frame(&raw, &key).expect("recoverable");
        assert_eq!(recovered.source, FrameSource::Decoded);
        assert_eq!(recovered.frame.as_bytes(), &CO2_600);
    }

    #[test]
    fn plaintext_report_falls_back_to_raw_bytes() {
        let recovered = recover_frame(&CO2_600, &DeviceKey::DEFAULT).expect("recoverable");
        assert_eq!(recovered.source, FrameSource::Plaintext);
        assert_eq!(recovered.frame.as_bytes(), &CO2_600);
    }

    #[test]
    fn garbage_report_discarded() {
        let raw = [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04];
        assert_eq!(recover_frame(&raw, &DeviceKey::DEFAULT), None);
    }
}
