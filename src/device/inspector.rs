//! Best-effort device inspection
//!
//! Pulls a display name and the wireless interface address out of a live
//! bridge handle. Both lookups are best-effort: a device that refuses the
//! shell queries (locked, unauthorized, mid-boot) yields the sentinel
//! values instead of an error, and the caller carries on.

use crate::bridge::client::BridgeDevice;
use log::{debug, warn};
use regex::Regex;

/// Display name used when the property queries fail
pub const UNKNOWN_MODEL: &str = "Unknown Model";

/// First IPv4 literal following "inet " in `ip addr` output
const IPV4_PATTERN: &str = r"inet (\d{1,3}(?:\.\d{1,3}){3})";

/// Identity snapshot of one inspected device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Display name, [`UNKNOWN_MODEL`] when the queries failed
    pub name: String,
    /// Wireless address, empty when unknown
    pub ip: String,
}

/// Query name and wireless address in one go
pub fn inspect<D: BridgeDevice>(device: &D) -> DeviceIdentity {
    DeviceIdentity {
        name: device_name(device),
        ip: device_ip(device),
    }
}

/// Query the device's display name ("Manufacturer Model").
///
/// Returns exactly [`UNKNOWN_MODEL`] when either property query fails; a
/// half-assembled name is never produced.
pub fn device_name<D: BridgeDevice>(device: &D) -> String {
    let manufacturer = device.shell("getprop ro.product.manufacturer");
    let model = device.shell("getprop ro.product.model");

    match (manufacturer, model) {
        (Ok(manufacturer), Ok(model)) => {
            format!("{} {}", manufacturer.trim(), model.trim())
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("Could not query device name for {}: {}", device.serial(), e);
            UNKNOWN_MODEL.to_string()
        }
    }
}

/// Query the device's wireless interface address.
///
/// Returns the first IPv4 literal in the interface dump, or an empty string
/// when the query fails or no address is configured (wifi off). An empty
/// result is expected, not an error.
pub fn device_ip<D: BridgeDevice>(device: &D) -> String {
    match device.shell("ip addr show wlan0") {
        Ok(output) => extract_ipv4(&output),
        Err(e) => {
            debug!("Could not query wlan0 address for {}: {}", device.serial(), e);
            String::new()
        }
    }
}

/// Pull the first IPv4 literal out of an `ip addr` dump
fn extract_ipv4(text: &str) -> String {
    let pattern = Regex::new(IPV4_PATTERN).expect("valid IPv4 pattern");
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ConnectorError, Result};
    use std::collections::HashMap;

    /// Bridge handle answering from a canned command table
    struct FakeDevice {
        serial: String,
        responses: HashMap<String, String>,
    }

    impl FakeDevice {
        fn new(responses: &[(&str, &str)]) -> Self {
            Self {
                serial: "FAKE001".to_string(),
                responses: responses
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl BridgeDevice for FakeDevice {
        fn serial(&self) -> &str {
            &self.serial
        }

        fn shell(&self, command: &str) -> Result<String> {
            self.responses
                .get(command)
                .cloned()
                .ok_or_else(|| ConnectorError::ShellError("device offline".to_string()))
        }
    }

    #[test]
    fn test_device_name_concatenates_properties() {
        let device = FakeDevice::new(&[
            ("getprop ro.product.manufacturer", "Google\n"),
            ("getprop ro.product.model", "Pixel 7\n"),
        ]);
        assert_eq!(device_name(&device), "Google Pixel 7");
    }

    #[test]
    fn test_device_name_unknown_when_manufacturer_fails() {
        let device = FakeDevice::new(&[("getprop ro.product.model", "Pixel 7\n")]);
        assert_eq!(device_name(&device), UNKNOWN_MODEL);
    }

    #[test]
    fn test_device_name_unknown_when_model_fails() {
        // No partially-concatenated name when only one half is available
        let device = FakeDevice::new(&[("getprop ro.product.manufacturer", "Google\n")]);
        assert_eq!(device_name(&device), UNKNOWN_MODEL);
    }

    #[test]
    fn test_device_ip_extracts_first_address() {
        let dump = "\
30: wlan0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc mq state UP qlen 3000
    link/ether aa:bb:cc:dd:ee:ff brd ff:ff:ff:ff:ff:ff
    inet 192.168.2.10/24 brd 192.168.2.255 scope global wlan0
    inet 10.0.0.3/8 scope global wlan0
    inet6 fe80::1/64 scope link
";
        let device = FakeDevice::new(&[("ip addr show wlan0", dump)]);
        assert_eq!(device_ip(&device), "192.168.2.10");
    }

    #[test]
    fn test_device_ip_empty_when_no_match() {
        let dump = "30: wlan0: <BROADCAST,MULTICAST> mtu 1500 qdisc mq state DOWN qlen 3000\n";
        let device = FakeDevice::new(&[("ip addr show wlan0", dump)]);
        assert_eq!(device_ip(&device), "");
    }

    #[test]
    fn test_device_ip_empty_on_shell_failure() {
        let device = FakeDevice::new(&[]);
        assert_eq!(device_ip(&device), "");
    }

    #[test]
    fn test_extract_ipv4_ignores_inet6() {
        assert_eq!(extract_ipv4("    inet6 fe80::1/64 scope link\n"), "");
    }

    #[test]
    fn test_inspect_combines_name_and_ip() {
        let device = FakeDevice::new(&[
            ("getprop ro.product.manufacturer", "Google\n"),
            ("getprop ro.product.model", "Pixel 7\n"),
            (
                "ip addr show wlan0",
                "    inet 192.168.2.10/24 brd 192.168.2.255 scope global wlan0\n",
            ),
        ]);
        let identity = inspect(&device);
        assert_eq!(identity.name, "Google Pixel 7");
        assert_eq!(identity.ip, "192.168.2.10");
    }

    #[test]
    fn test_inspect_degrades_per_field() {
        // Name queries fail, the address query still answers
        let device = FakeDevice::new(&[(
            "ip addr show wlan0",
            "    inet 10.1.2.3/8 scope global wlan0\n",
        )]);
        let identity = inspect(&device);
        assert_eq!(identity.name, UNKNOWN_MODEL);
        assert_eq!(identity.ip, "10.1.2.3");
    }
}
