//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::bridge::classify::LiteralClassifier;
use crate::bridge::client::{BridgeClient, BridgeDevice, CliBridgeClient, CliDevice};
use crate::bridge::runner::SystemRunner;
use crate::cli::output::{
    print_error, print_header, print_info, print_step, print_success, print_warning,
};
use crate::cli::{Args, Commands};
use crate::core::config::{
    get_config_path, init_config, open_config_in_editor, Config,
};
use crate::core::error::ConnectorError;
use crate::device::store::DeviceStore;
use crate::device::{inspector, usb};
use crate::mirror::MirrorLauncher;
use crate::tcpip::{ConnectTarget, ConsolePrompter, EnableOutcome, TcpipEnabler};
use anyhow::{bail, Result};
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Run the appropriate command based on CLI arguments
pub fn run_command(args: &Args, config: &Config, shutdown_flag: Arc<AtomicBool>) -> Result<()> {
    match &args.command {
        Some(Commands::Config { path, reset }) => handle_config_command(*path, *reset),
        Some(Commands::GenerateConfig { output }) => generate_config_file(output.clone()),
        Some(Commands::ShowConfig) => {
            show_config(config);
            Ok(())
        }
        Some(Commands::List { usb }) => list_devices(config, *usb),
        Some(Commands::Saved) => {
            list_saved(config);
            Ok(())
        }
        Some(Commands::Mirror { address, serial }) => {
            mirror_command(config, address.as_deref(), serial.as_deref())
        }
        Some(Commands::Enable { serial }) => {
            enable_command(config, serial.as_deref(), shutdown_flag)
        }
        Some(Commands::Connect { serial, no_mirror }) => {
            connect_command(config, serial.as_deref(), *no_mirror, shutdown_flag)
        }
        None => connect_command(config, None, false, shutdown_flag),
    }
}

/// Pick the device to operate on from the attached set
fn select_device<'a>(
    devices: &'a [CliDevice<SystemRunner>],
    serial: Option<&str>,
) -> std::result::Result<&'a CliDevice<SystemRunner>, ConnectorError> {
    match serial {
        Some(serial) => devices
            .iter()
            .find(|d| d.serial() == serial)
            .ok_or_else(|| ConnectorError::DeviceNotFound(serial.to_string())),
        None => {
            let first = devices.first().ok_or(ConnectorError::NoDevicesFound)?;
            if devices.len() > 1 {
                warn!(
                    "{} devices attached and no serial given, using {}",
                    devices.len(),
                    first.serial()
                );
                print_warning(&format!(
                    "{} devices attached, using {} (pass --serial to pick another)",
                    devices.len(),
                    first.serial()
                ));
            }
            Ok(first)
        }
    }
}

/// Full flow: inspect, remember, enable TCP/IP, mirror
fn connect_command(
    config: &Config,
    serial: Option<&str>,
    no_mirror: bool,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    print_header("Wireless Screen Mirror");

    let runner = SystemRunner;
    let client = CliBridgeClient::new(&config.bridge.adb_path, runner);

    // `adb devices` warms the daemon up and shows the operator the table
    client.start_server()?;
    let devices = client.devices()?;
    if devices.is_empty() {
        if usb::has_usb_device(config.usb.vendor_id, config.usb.product_id) {
            print_warning(
                "The phone is on USB, but the bridge does not list it. Is USB debugging enabled?",
            );
        }
        return Err(ConnectorError::NoDevicesFound.into());
    }
    let device = select_device(&devices, serial)?;

    print_step(1, 4, "Inspecting device");
    let identity = inspector::inspect(device);
    print_info(&format!("Device: {} ({})", identity.name, device.serial()));
    if identity.ip.is_empty() {
        print_warning("No wireless address found. Is the phone's wifi on?");
    } else {
        print_info(&format!("Wireless address: {}", identity.ip));
    }

    print_step(2, 4, "Remembering device");
    let store = DeviceStore::new(&config.store.path);
    if let Err(e) = store.add(device.serial(), &identity.ip, &identity.name) {
        eprintln!("Could not save device: {}", e);
        error!("Saving device {} failed: {}", device.serial(), e);
    }

    print_step(3, 4, "Enabling TCP/IP mode");
    let classifier = LiteralClassifier::default();
    let prompter = ConsolePrompter;
    let target = ConnectTarget::new(device.serial(), &identity.ip);
    let enabler = TcpipEnabler::new(
        &config.bridge.adb_path,
        config.bridge.port,
        target.clone(),
        &runner,
        &classifier,
        &prompter,
    )
    .with_interrupt(shutdown_flag);

    match enabler.run() {
        EnableOutcome::Success(step) => {
            print_success(&format!(
                "TCP/IP mode enabled on port {} (via {:?})",
                config.bridge.port, step
            ));
        }
        EnableOutcome::Fatal => {
            print_error("Could not enable TCP/IP mode, see the log for details");
            bail!("wireless enablement failed for {}", device.serial());
        }
        EnableOutcome::Interrupted => {
            print_warning("Interrupted before TCP/IP mode was enabled");
            return Ok(());
        }
    }

    if no_mirror {
        print_info("Skipping mirror launch (--no-mirror)");
        return Ok(());
    }

    if target.address.is_empty() {
        print_warning("Skipping mirror launch: no wireless address to connect to");
        return Ok(());
    }

    print_step(4, 4, "Launching mirror");
    MirrorLauncher::new(&config.mirror.scrcpy_path, &runner).mirror(&target.address);
    Ok(())
}

/// Only run the enablement ladder
fn enable_command(
    config: &Config,
    serial: Option<&str>,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    let runner = SystemRunner;
    let client = CliBridgeClient::new(&config.bridge.adb_path, runner);
    let devices = client.devices()?;
    if devices.is_empty() {
        return Err(ConnectorError::NoDevicesFound.into());
    }
    let device = select_device(&devices, serial)?;

    let classifier = LiteralClassifier::default();
    let prompter = ConsolePrompter;
    let target = ConnectTarget::new(device.serial(), "");
    let enabler = TcpipEnabler::new(
        &config.bridge.adb_path,
        config.bridge.port,
        target,
        &runner,
        &classifier,
        &prompter,
    )
    .with_interrupt(shutdown_flag);

    match enabler.run() {
        EnableOutcome::Success(step) => {
            print_success(&format!(
                "Device {} is listening on port {} (via {:?})",
                device.serial(),
                config.bridge.port,
                step
            ));
            Ok(())
        }
        EnableOutcome::Fatal => {
            print_error("Could not enable TCP/IP mode, see the log for details");
            bail!("wireless enablement failed for {}", device.serial());
        }
        EnableOutcome::Interrupted => {
            print_warning("Interrupted before TCP/IP mode was enabled");
            Ok(())
        }
    }
}

/// Only launch the mirroring tool
fn mirror_command(config: &Config, address: Option<&str>, serial: Option<&str>) -> Result<()> {
    let address = match (address, serial) {
        (Some(address), _) => address.to_string(),
        (None, Some(serial)) => {
            let store = DeviceStore::new(&config.store.path);
            let directory = store.load();
            match directory.find(serial) {
                Some(record) if !record.ip.is_empty() => record.ip.clone(),
                Some(_) => {
                    print_error(&format!(
                        "Device {} is saved without a wireless address, run `connect` first",
                        serial
                    ));
                    bail!("no saved address for {}", serial);
                }
                None => {
                    print_error(&format!("No saved device with serial {}", serial));
                    bail!("unknown serial {}", serial);
                }
            }
        }
        (None, None) => {
            bail!("provide an address or --serial to look one up");
        }
    };

    let runner = SystemRunner;
    MirrorLauncher::new(&config.mirror.scrcpy_path, &runner).mirror(&address);
    Ok(())
}

/// List attached bridge devices, optionally with the raw USB table
fn list_devices(config: &Config, with_usb: bool) -> Result<()> {
    let runner = SystemRunner;
    let client = CliBridgeClient::new(&config.bridge.adb_path, runner);
    let devices = client.devices()?;

    if devices.is_empty() {
        print_warning("No bridge devices attached");
    } else {
        println!();
        println!("  {:<28} {:<20} {}", "MODEL", "SERIAL", "IP");
        println!("  {}", "-".repeat(64));
        for device in &devices {
            let identity = inspector::inspect(device);
            let ip = if identity.ip.is_empty() {
                "-".to_string()
            } else {
                identity.ip
            };
            println!("  {:<28} {:<20} {}", identity.name, device.serial(), ip);
        }
        println!();
    }

    if with_usb {
        let usb_devices = usb::list_usb_devices()?;
        println!("  {:<10} {:<10} {:<6} {}", "VID", "PID", "BUS", "ADDR");
        println!("  {}", "-".repeat(36));
        for dev in &usb_devices {
            println!(
                "  {:04x}       {:04x}       {:<6} {}",
                dev.vendor_id, dev.product_id, dev.bus_number, dev.address
            );
        }
        println!();

        let vid = config.usb.vendor_id;
        let pid = config.usb.product_id;
        if usb::contains_device(&usb_devices, vid, pid) {
            print_success(&format!("Reference phone ({:04x}:{:04x}) is plugged in", vid, pid));
        } else {
            print_info(&format!("Reference phone ({:04x}:{:04x}) is not plugged in", vid, pid));
        }
    }

    Ok(())
}

/// Show devices remembered in the saved-device file
fn list_saved(config: &Config) {
    let store = DeviceStore::new(&config.store.path);
    let directory = store.load();

    println!("\nSaved devices ({}):", store.path().display());
    if directory.is_empty() {
        println!("  (none yet - run `connect` with a phone attached)\n");
        return;
    }

    for record in &directory.devices {
        let ip = if record.ip.is_empty() { "-" } else { &record.ip };
        println!("  {:<28} {:<20} {}", record.model, record.serial, ip);
    }
    println!();
}

/// Handle the config command (open in editor, show path, or reset)
fn handle_config_command(show_path: bool, reset: bool) -> Result<()> {
    if show_path {
        match get_config_path() {
            Some(path) => {
                println!("{}", path.display());
                if !path.exists() {
                    println!("(file does not exist yet - run `config` to create it)");
                }
            }
            None => println!("Could not determine config directory"),
        }
        return Ok(());
    }

    if reset {
        let path = init_config()?;
        fs::write(&path, Config::generate_default_config())?;
        print_success(&format!("Config reset to defaults: {}", path.display()));
        return Ok(());
    }

    let path = open_config_in_editor()?;
    info!("Opened config file: {}", path.display());
    println!("Opened config file: {}", path.display());
    Ok(())
}

/// Generate a config file at the given (or standard) location
fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let path = match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, Config::generate_default_config())?;
            path
        }
        None => init_config()?,
    };

    print_success(&format!("Config file written: {}", path.display()));
    Ok(())
}

/// Print the effective configuration as TOML
fn show_config(config: &Config) {
    println!("Active config file: {}", Config::get_active_config_path().display());
    println!();
    match toml::to_string_pretty(config) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => print_error(&format!("Could not render config: {}", e)),
    }
}
