//! Report deobfuscation.
//!
//! Every 8-byte input report from the monitor is scrambled with a fixed
//! four-stage transform keyed by the 8 bytes the host sends in the arming
//! feature report. The key is not a secret: the host chooses it, the device
//! echoes it back into the transform. Stages, in decode order:
//!
//! 1. byte permutation ([`SHUFFLE`]),
//! 2. XOR with the key,
//! 3. rotate right by 3 bits across all 64 bits (big-endian byte order),
//! 4. wrapping subtraction of [`MASK`].
//!
//! Firmware revisions from roughly 2020 onwards skip the scrambling and send
//! plaintext; see [`crate::frame::recover_frame`] for how both are handled.

/// Length of every input report and of the device key.
pub const REPORT_LEN: usize = 8;

/// One raw input report as read from the device.
pub type RawReport = [u8; REPORT_LEN];

/// Output position `j` takes input byte `SHUFFLE[j]`.
///
/// The permutation is its own inverse, so the same table serves both
/// directions.
pub const SHUFFLE: [usize; REPORT_LEN] = [2, 4, 0, 7, 1, 6, 5, 3];

/// Nibble-swapped ASCII `"Htemp99e"`.
pub const MASK: [u8; REPORT_LEN] = [0x84, 0x47, 0x56, 0xD6, 0x07, 0x93, 0x93, 0x56];

/// Bit rotation applied across the 64-bit report.
const ROTATION_BITS: u32 = 3;

/// Report ID prepended to the key in the arming feature report.
pub const FEATURE_REPORT_ID: u8 = 0x00;

/// Length of the arming feature report including its report ID byte.
pub const FEATURE_REPORT_LEN: usize = REPORT_LEN + 1;

/// The 8-byte key shared by the arming feature report and the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceKey([u8; REPORT_LEN]);

impl DeviceKey {
    /// Key used by the reference host software for this device family.
    pub const DEFAULT: Self = Self([0x86, 0x41, 0xC9, 0xA8, 0x7F, 0x41, 0x3C, 0xAC]);

    pub const fn new(bytes: [u8; REPORT_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; REPORT_LEN] {
        &self.0
    }

    /// Build the feature report that arms the device with this key.
    ///
    /// The leading byte is the HID report ID; the device has no numbered
    /// reports, so it is always [`FEATURE_REPORT_ID`].
    pub fn feature_report(&self) -> [u8; FEATURE_REPORT_LEN] {
        let [k0, k1, k2, k3, k4, k5, k6, k7] = self.0;
        [FEATURE_REPORT_ID, k0, k1, k2, k3, k4, k5, k6, k7]
    }
}

impl Default for DeviceKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn shuffle(bytes: RawReport) -> RawReport {
    let [b0, b1, b2, b3, b4, b5, b6, b7] = bytes;
    [b2, b4, b0, b7, b1, b6, b5, b3]
}

fn xor_key(bytes: &mut RawReport, key: &DeviceKey) {
    for (byte, k) in bytes.iter_mut().zip(key.as_bytes()) {
        *byte ^= k;
    }
}

/// Recover a candidate plaintext frame from a scrambled report.
///
/// Total and pure: the result is not necessarily a valid frame, callers must
/// check it with [`crate::frame::validate`].
pub fn deobfuscate(raw: &RawReport, key: &DeviceKey) -> RawReport {
    let mut state = shuffle(*raw);
    xor_key(&mut state, key);
    let mut state = u64::from_be_bytes(state)
        .rotate_right(ROTATION_BITS)
        .to_be_bytes();
    for (byte, mask) in state.iter_mut().zip(MASK) {
        *byte = byte.wrapping_sub(mask);
    }
    state
}

/// Scramble a plaintext frame the way the device does.
///
/// Exact inverse of [`deobfuscate`] for the same key. Used to build test
/// fixtures and by simulated transports.
pub fn obfuscate(frame: &RawReport, key: &DeviceKey) -> RawReport {
    let mut state = *frame;
    for (byte, mask) in state.iter_mut().zip(MASK) {
        *byte = byte.wrapping_add(mask);
    }
    let mut state = u64::from_be_bytes(state)
        .rotate_left(ROTATION_BITS)
        .to_be_bytes();
    xor_key(&mut state, key);
    shuffle(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CO2_600_SCRAMBLED: RawReport = [0xBD, 0xDB, 0x24, 0x1A, 0x0C, 0xA6, 0xDD, 0xA8];
    const CO2_600_PLAIN: RawReport = [0x50, 0x02, 0x58, 0xAA, 0x0D, 0x00, 0x00, 0x00];

    #[test]
    fn mask_is_nibble_swapped_htemp99e() {
        let expected: Vec<u8> = b"Htemp99e".iter().map(|b| b.rotate_left(4)).collect();
        assert_eq!(MASK.to_vec(), expected);
    }

    #[test]
    fn shuffle_table_matches_shuffle_fn() {
        let input: RawReport = [10, 11, 12, 13, 14, 15, 16, 17];
        let shuffled = shuffle(input);
        for (j, src) in SHUFFLE.iter().enumerate() {
            assert_eq!(shuffled[j], input[*src]);
        }
    }

    #[test]
    fn shuffle_is_an_involution() {
        let input: RawReport = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(shuffle(shuffle(input)), input);
    }

    #[test]
    fn deobfuscate_known_vector() {
        assert_eq!(
            deobfuscate(&CO2_600_SCRAMBLED, &DeviceKey::DEFAULT),
            CO2_600_PLAIN
        );
    }

    #[test]
    fn obfuscate_known_vector() {
        assert_eq!(
            obfuscate(&CO2_600_PLAIN, &DeviceKey::DEFAULT),
            CO2_600_SCRAMBLED
        );
    }

    #[test]
    fn deobfuscate_all_zero_input() {
        assert_eq!(
            deobfuscate(&[0; REPORT_LEN], &DeviceKey::DEFAULT),
            [0x0C, 0x81, 0xE3, 0x5F, 0x08, 0x55, 0x94, 0x3F]
        );
    }

    #[test]
    fn feature_report_prefixes_report_id() {
        let report = DeviceKey::DEFAULT.feature_report();
        assert_eq!(report[0], FEATURE_REPORT_ID);
        assert_eq!(&report[1..], DeviceKey::DEFAULT.as_bytes());
    }

    #[test]
    fn default_key_is_reference_key() {
        assert_eq!(DeviceKey::default(), DeviceKey::DEFAULT);
    }
}
