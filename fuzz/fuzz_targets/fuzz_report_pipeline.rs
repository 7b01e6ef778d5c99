//! Fuzzes the report decode pipeline with arbitrary reports and keys.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_report_pipeline
#![no_main]
use co2mon_hid_protocol::{DeviceKey, classify, obfuscate, recover_frame, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = validate(data);
    if data.len() < 16 {
        return;
    }
    let mut raw = [0u8; 8];
    let mut key = [0u8; 8];
    raw.copy_from_slice(&data[..8]);
    key.copy_from_slice(&data[8..16]);
    let key = DeviceKey::new(key);

    if let Some(recovered) = recover_frame(&raw, &key) {
        assert!(validate(recovered.frame.as_bytes()));
        let _ = classify(&recovered.frame);
    }

    let plain = co2mon_hid_protocol::deobfuscate(&raw, &key);
    assert_eq!(obfuscate(&plain, &key), raw);
});
