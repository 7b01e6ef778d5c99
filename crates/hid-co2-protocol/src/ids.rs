//! USB vendor and product ID constants for the CO₂ monitor family.
//!
//! The desktop CO₂ meters sold under the TFA Dostmann AirCO2NTROL, CO2Meter
//! RAD-0301 and similar brands all enumerate with the Holtek vendor ID and a
//! single product ID, and all share the ZyAura 8-byte report protocol.
//!
//! Sources:
//! - usb-ids database: `04d9` = "Holtek Semiconductor, Inc."
//! - `lsusb` on an AirCO2NTROL Mini: `04d9:a052 Holtek Semiconductor, Inc. USB-zyTemp`

/// Holtek Semiconductor USB vendor ID.
pub const CO2_MONITOR_VENDOR_ID: u16 = 0x04D9;

/// ZyAura "USB-zyTemp" product ID.
pub const CO2_MONITOR_PRODUCT_ID: u16 = 0xA052;

/// Returns `true` if `(vendor_id, product_id)` identifies a supported monitor.
///
/// # Examples
/// ```
/// use co2mon_hid_protocol::ids::is_co2_monitor;
/// assert!(is_co2_monitor(0x04d9, 0xa052));
/// assert!(!is_co2_monitor(0x04d9, 0x0001));
/// ```
pub fn is_co2_monitor(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == CO2_MONITOR_VENDOR_ID && product_id == CO2_MONITOR_PRODUCT_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_device_recognised() {
        assert!(is_co2_monitor(CO2_MONITOR_VENDOR_ID, CO2_MONITOR_PRODUCT_ID));
    }

    #[test]
    fn other_holtek_products_not_recognised() {
        assert!(!is_co2_monitor(CO2_MONITOR_VENDOR_ID, 0x0000));
        assert!(!is_co2_monitor(CO2_MONITOR_VENDOR_ID, 0xFFFF));
    }

    #[test]
    fn product_id_under_other_vendor_not_recognised() {
        assert!(!is_co2_monitor(0x045B, CO2_MONITOR_PRODUCT_ID));
    }
}
