//! Saved-device store
//!
//! Remembers every device the tool has successfully inspected, so a later
//! `mirror --serial` can find the wireless address without the cable. The
//! backing file is a single JSON document of shape
//! `{ "devices": [ {"serial", "ip", "model"}, ... ] }`.
//!
//! The store is append-only and keyed by serial: adding a serial that is
//! already present leaves the stored record untouched. A missing or
//! unreadable file is never an error, it just means an empty directory.
//!
//! The file is read-modify-written as a whole with no locking, so two
//! processes racing on the same store can lose one of the updates.

use crate::core::error::{ConnectorError, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// One remembered device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Stable unique identifier reported by the bridge
    pub serial: String,

    /// Wireless interface address, empty if not known yet
    pub ip: String,

    /// Display name ("Manufacturer Model" or "Unknown Model")
    pub model: String,
}

/// The full collection of remembered devices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDirectory {
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

impl DeviceDirectory {
    /// Whether a serial is already remembered
    pub fn contains(&self, serial: &str) -> bool {
        self.devices.iter().any(|d| d.serial == serial)
    }

    /// Look a remembered device up by serial
    pub fn find(&self, serial: &str) -> Option<&DeviceRecord> {
        self.devices.iter().find(|d| d.serial == serial)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Load/save access to one saved-device file
pub struct DeviceStore {
    path: PathBuf,
}

impl DeviceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the directory from disk.
    ///
    /// A missing file yields an empty directory silently; an unreadable or
    /// malformed file yields an empty directory and tells the operator.
    /// Never fails.
    pub fn load(&self) -> DeviceDirectory {
        if !self.path.exists() {
            debug!(
                "Saved-device file {} does not exist yet, starting empty",
                self.path.display()
            );
            return DeviceDirectory::default();
        }

        match self.try_load() {
            Ok(directory) => {
                debug!(
                    "Loaded {} saved device(s) from {}",
                    directory.len(),
                    self.path.display()
                );
                directory
            }
            Err(e) => {
                eprintln!(
                    "Could not read saved devices from {}: {}",
                    self.path.display(),
                    e
                );
                warn!(
                    "Saved-device file {} unreadable ({}), treating as empty",
                    self.path.display(),
                    e
                );
                DeviceDirectory::default()
            }
        }
    }

    fn try_load(&self) -> Result<DeviceDirectory> {
        let file = File::open(&self.path)
            .map_err(|e| ConnectorError::IoError(format!("Failed to open store file: {}", e)))?;

        let reader = BufReader::new(file);
        let directory: DeviceDirectory = serde_json::from_reader(reader)
            .map_err(|e| ConnectorError::IoError(format!("Failed to parse store file: {}", e)))?;

        Ok(directory)
    }

    /// Persist the full directory to disk
    pub fn save(&self, directory: &DeviceDirectory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ConnectorError::IoError(format!("Failed to create store directory: {}", e))
                })?;
            }
        }

        let file = File::create(&self.path)
            .map_err(|e| ConnectorError::IoError(format!("Failed to create store file: {}", e)))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, directory)
            .map_err(|e| ConnectorError::IoError(format!("Failed to write store file: {}", e)))?;

        debug!(
            "Saved {} device(s) to {}",
            directory.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Remember a device, unless its serial is already present.
    ///
    /// Returns whether a record was appended. A duplicate serial is an
    /// idempotent no-op: the existing record keeps its stored ip and model.
    pub fn add(&self, serial: &str, ip: &str, model: &str) -> Result<bool> {
        let mut directory = self.load();

        if directory.contains(serial) {
            info!("Device with serial {} already saved, keeping existing record", serial);
            return Ok(false);
        }

        directory.devices.push(DeviceRecord {
            serial: serial.to_string(),
            ip: ip.to_string(),
            model: model.to_string(),
        });
        self.save(&directory)?;

        info!("Device with serial {} added to {}", serial, self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> DeviceStore {
        DeviceStore::new(dir.path().join("saved_devices.json"))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json at all {{{").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_missing_devices_key_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{}").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_add_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.add("S1", "1.2.3.4", "Pixel").unwrap());

        let directory = store.load();
        assert_eq!(directory.len(), 1);
        assert_eq!(
            directory.devices[0],
            DeviceRecord {
                serial: "S1".to_string(),
                ip: "1.2.3.4".to_string(),
                model: "Pixel".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.add("S1", "1.2.3.4", "Pixel").unwrap());
        // Same serial with different details must not replace the record
        assert!(!store.add("S1", "9.9.9.9", "Other").unwrap());

        let directory = store.load();
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.devices[0].ip, "1.2.3.4");
        assert_eq!(directory.devices[0].model, "Pixel");
    }

    #[test]
    fn test_add_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add("S1", "1.2.3.4", "Pixel").unwrap();
        store.add("S2", "", "Galaxy S24").unwrap();

        let directory = store.load();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.devices[0].serial, "S1");
        assert_eq!(directory.devices[1].serial, "S2");
        assert_eq!(directory.devices[1].ip, "");
    }

    #[test]
    fn test_find_by_serial() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add("S1", "1.2.3.4", "Pixel").unwrap();
        store.add("S2", "5.6.7.8", "Galaxy S24").unwrap();

        let directory = store.load();
        assert_eq!(directory.find("S2").unwrap().ip, "5.6.7.8");
        assert!(directory.find("S3").is_none());
    }

    #[test]
    fn test_file_shape_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add("S1", "1.2.3.4", "Pixel").unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["devices"][0]["serial"], "S1");
        assert_eq!(value["devices"][0]["ip"], "1.2.3.4");
        assert_eq!(value["devices"][0]["model"], "Pixel");
    }
}
