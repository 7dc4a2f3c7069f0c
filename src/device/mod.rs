//! Device-facing helpers
//!
//! # Submodules
//!
//! - `inspector` - Best-effort identity and wireless-address lookup over a
//!   live bridge handle
//! - `store` - Persistence of known devices (serial, ip, model) to JSON
//! - `usb` - USB presence checks via libusb

pub mod inspector;
pub mod store;
pub mod usb;

// Re-export commonly used types for convenience
pub use inspector::DeviceIdentity;
pub use store::{DeviceDirectory, DeviceRecord, DeviceStore};
pub use usb::UsbDeviceSummary;
