//! Configuration module for the screen mirror tool
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\screen_mirror_tool\config.toml
//! - Linux/macOS: ~/.config/screen_mirror_tool/config.toml

use crate::device::usb::{DEFAULT_PRODUCT_ID, DEFAULT_VENDOR_ID};
use crate::tcpip::DEFAULT_TCPIP_PORT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config directory
const APP_NAME: &str = "screen_mirror_tool";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the standard configuration directory for the application.
///
/// Returns:
/// - Windows: %APPDATA%\screen_mirror_tool
/// - Linux/macOS: ~/.config/screen_mirror_tool
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Initialize the configuration file if it doesn't exist.
///
/// Creates the config directory and copies the default config template.
/// Returns the path to the config file.
pub fn init_config() -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        let default_config = Config::generate_default_config();
        fs::write(&config_path, default_config)
            .map_err(|e| ConfigError::WriteError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Open the configuration file in the default application.
pub fn open_config_in_editor() -> Result<PathBuf, ConfigError> {
    // Ensure config exists first
    let config_path = init_config()?;

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", config_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(&config_path)
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(&config_path)
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Debug-bridge settings
    pub bridge: BridgeConfig,

    /// USB presence-check settings
    pub usb: UsbConfig,

    /// Saved-device store settings
    pub store: StoreConfig,

    /// Mirroring tool settings
    pub mirror: MirrorConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Debug-bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Path of the adb executable (bare name is resolved via PATH)
    pub adb_path: String,

    /// TCP port the device listens on after the switch to wireless mode
    pub port: u16,
}

/// USB presence-check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbConfig {
    /// Vendor ID of the reference phone
    pub vendor_id: u16,

    /// Product ID of the reference phone
    pub product_id: u16,
}

/// Saved-device store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON file remembering known devices
    pub path: PathBuf,
}

/// Mirroring tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Path of the scrcpy executable
    pub scrcpy_path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file in addition to the console
    pub log_to_file: bool,

    /// Log file path (appended to, never truncated)
    pub log_file: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            adb_path: "adb".to_string(),
            port: DEFAULT_TCPIP_PORT,
        }
    }
}

impl Default for UsbConfig {
    fn default() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("saved_devices.json"),
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            scrcpy_path: "scrcpy".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: true,
            log_file: PathBuf::from("connect_to_phone.log"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./config.toml (current directory - for development/override)
    /// 2. ./screen_mirror.toml (current directory - alternative name)
    /// 3. Standard config location (%APPDATA%\screen_mirror_tool\config.toml on Windows)
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        // First check local directory (allows for project-specific overrides)
        let local_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("./screen_mirror.toml"),
        ];

        for path in &local_paths {
            if path.exists() {
                return Self::load(path);
            }
        }

        // Then check standard config location
        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Get the path where the config file is (or would be) located.
    ///
    /// Returns the first existing config file path, or the standard location if none exists.
    pub fn get_active_config_path() -> PathBuf {
        let local_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("./screen_mirror.toml"),
        ];

        for path in &local_paths {
            if path.exists() {
                return path.clone();
            }
        }

        get_config_path().unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Save configuration to a TOML file
    #[allow(dead_code)]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    /// This uses the example config file to ensure it stays up to date
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
#[allow(dead_code)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
    /// Failed to open config file in editor
    OpenError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(
                    f,
                    "Failed to write config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::OpenError(path, err) => {
                write!(
                    f,
                    "Failed to open config file '{}': {}",
                    path.display(),
                    err
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bridge.adb_path, "adb");
        assert_eq!(config.bridge.port, 5555);
        assert_eq!(config.usb.vendor_id, 0x18d1);
        assert_eq!(config.usb.product_id, 0x4ee7);
        assert_eq!(config.store.path, PathBuf::from("saved_devices.json"));
        assert_eq!(config.mirror.scrcpy_path, "scrcpy");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.log_to_file);
        assert_eq!(
            config.logging.log_file,
            PathBuf::from("connect_to_phone.log")
        );
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: Config =
            toml::from_str(&Config::generate_default_config()).expect("example config parses");
        assert_eq!(config.bridge.adb_path, "adb");
        assert_eq!(config.bridge.port, 5555);
        assert_eq!(config.usb.vendor_id, 0x18d1);
        assert_eq!(config.usb.product_id, 0x4ee7);
        assert_eq!(config.logging.log_file, PathBuf::from("connect_to_phone.log"));
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [bridge]
            port = 5556
            "#,
        )
        .unwrap();
        assert_eq!(config.bridge.port, 5556);
        assert_eq!(config.bridge.adb_path, "adb");
        assert_eq!(config.mirror.scrcpy_path, "scrcpy");
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = Config::default();
        config.bridge.adb_path = "/opt/platform-tools/adb".to_string();
        config.store.path = PathBuf::from("/tmp/devices.json");

        let serialized = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(restored.bridge.adb_path, "/opt/platform-tools/adb");
        assert_eq!(restored.store.path, PathBuf::from("/tmp/devices.json"));
        assert_eq!(restored.bridge.port, 5555);
    }
}
