//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Connect an Android phone over USB, switch its debug bridge to TCP/IP and
/// mirror the screen wirelessly with scrcpy
#[derive(Parser, Debug)]
#[command(name = "screen_mirror_tool")]
#[command(version)]
#[command(
    about = "Switch an Android phone's debug bridge to TCP/IP and mirror its screen wirelessly",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path of the adb executable (overrides config)
    #[arg(long, global = true)]
    pub adb_path: Option<String>,

    /// TCP port for wireless debugging (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full flow: inspect the attached phone, remember it, switch it to
    /// TCP/IP mode and mirror its screen (default when no command is given)
    Connect {
        /// Serial of the device to connect (needed with several attached)
        #[arg(short, long)]
        serial: Option<String>,

        /// Stop after enabling TCP/IP mode, don't launch the mirroring tool
        #[arg(long)]
        no_mirror: bool,
    },

    /// Only switch a device to TCP/IP mode
    Enable {
        /// Serial of the device to switch
        #[arg(short, long)]
        serial: Option<String>,
    },

    /// Only launch the mirroring tool against a wireless address
    Mirror {
        /// Address to mirror (e.g. 192.168.2.10)
        address: Option<String>,

        /// Look the address up in the saved-device file by serial
        #[arg(short, long, conflicts_with = "address")]
        serial: Option<String>,
    },

    /// List attached bridge devices (name, serial, ip)
    List {
        /// Also dump the raw USB device table
        #[arg(long)]
        usb: bool,
    },

    /// Show devices remembered in the saved-device file
    Saved,

    /// Open the configuration file in your default editor
    ///
    /// The config file is stored at:
    /// - Windows: %APPDATA%\screen_mirror_tool\config.toml
    /// - Linux/macOS: ~/.config/screen_mirror_tool/config.toml
    ///
    /// If no config file exists, a default one will be created.
    Config {
        /// Show the config file path without opening it
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration
    ShowConfig,
}
