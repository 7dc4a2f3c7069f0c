//! USB presence checks
//!
//! A thin wrapper over libusb enumeration: one snapshot pass over the bus,
//! no hotplug subscription. Used to answer "is the phone physically
//! plugged in" independently of the bridge daemon's view.

use crate::core::error::Result;
use log::warn;

/// Vendor ID of the reference phone (Google)
pub const DEFAULT_VENDOR_ID: u16 = 0x18d1;

/// Product ID of the reference phone (Pixel in USB-debugging mode)
pub const DEFAULT_PRODUCT_ID: u16 = 0x4ee7;

/// Identity of one enumerated USB device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbDeviceSummary {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus_number: u8,
    pub address: u8,
}

/// Enumerate all USB devices currently on the bus.
///
/// Devices whose descriptor cannot be read are skipped with a warning
/// rather than failing the whole pass.
pub fn list_usb_devices() -> Result<Vec<UsbDeviceSummary>> {
    let devices = rusb::devices()?;

    Ok(devices
        .iter()
        .filter_map(|device| match device.device_descriptor() {
            Ok(descriptor) => Some(UsbDeviceSummary {
                vendor_id: descriptor.vendor_id(),
                product_id: descriptor.product_id(),
                bus_number: device.bus_number(),
                address: device.address(),
            }),
            Err(e) => {
                warn!(
                    "Skipping USB device on bus {} (descriptor unreadable: {})",
                    device.bus_number(),
                    e
                );
                None
            }
        })
        .collect())
}

/// Whether a snapshot contains a device with exactly this vendor/product pair
pub fn contains_device(devices: &[UsbDeviceSummary], vendor_id: u16, product_id: u16) -> bool {
    devices
        .iter()
        .any(|d| d.vendor_id == vendor_id && d.product_id == product_id)
}

/// Check whether a device with this vendor/product pair is plugged in.
///
/// An enumeration failure counts as "not present" (logged), never an error.
pub fn has_usb_device(vendor_id: u16, product_id: u16) -> bool {
    match list_usb_devices() {
        Ok(devices) => contains_device(&devices, vendor_id, product_id),
        Err(e) => {
            warn!("USB enumeration failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(vendor_id: u16, product_id: u16) -> UsbDeviceSummary {
        UsbDeviceSummary {
            vendor_id,
            product_id,
            bus_number: 1,
            address: 4,
        }
    }

    #[test]
    fn test_contains_device_exact_match() {
        let devices = [summary(0x05ac, 0x12a8), summary(0x18d1, 0x4ee7)];
        assert!(contains_device(
            &devices,
            DEFAULT_VENDOR_ID,
            DEFAULT_PRODUCT_ID
        ));
    }

    #[test]
    fn test_contains_device_requires_both_ids() {
        // Right vendor with the wrong product is not a match, and vice versa
        let devices = [summary(0x18d1, 0x0001), summary(0x0001, 0x4ee7)];
        assert!(!contains_device(
            &devices,
            DEFAULT_VENDOR_ID,
            DEFAULT_PRODUCT_ID
        ));
    }

    #[test]
    fn test_contains_device_empty_snapshot() {
        assert!(!contains_device(&[], DEFAULT_VENDOR_ID, DEFAULT_PRODUCT_ID));
    }
}
