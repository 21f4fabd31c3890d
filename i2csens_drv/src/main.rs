//! # i2csens Command-Line Tool
//!
//! Binds the configured sensor and reads or writes its attributes.
//!
//! # Usage
//!
//! ```bash
//! # Read the temperature from a simulated sensor
//! i2csens --simulate show data
//!
//! # Enable the sensor described in the config file
//! i2csens --config /etc/i2csens/i2csens.toml store enable 1
//!
//! # Poll the temperature every 500ms until Ctrl-C, verbose logging
//! i2csens -v watch --interval-ms 500
//!
//! # Dump the raw registers, JSON logs
//! i2csens --json regs
//! ```

#![deny(warnings)]

use clap::{Parser, Subcommand};
use i2csens_common::config::{ConfigError, ConfigLoader, LogLevel};
use i2csens_common::consts::DEFAULT_CONFIG_PATH;
use i2csens_common::hal::config::{BusConfig, DeviceConfig, SimulationConfig};
use i2csens_drv::drivers::open_transport;
use i2csens_drv::{DeviceDescriptor, DeviceHost, DriverRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const REGISTER_NAMES: [&str; 3] = ["ID", "CTRL", "DATA"];

/// i2csens - I2C temperature sensor driver tool
#[derive(Parser, Debug)]
#[command(name = "i2csens")]
#[command(version)]
#[command(about = "Bind an i2csens sensor and access its attributes")]
#[command(long_about = None)]
struct Args {
    /// Path to the device configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Use the simulated sensor regardless of the configured bus
    #[arg(short = 's', long)]
    simulate: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print an attribute
    Show {
        /// Attribute name (`enable` or `data`)
        attr: String,
    },
    /// Write an attribute
    Store {
        /// Attribute name
        attr: String,
        /// Value to write
        value: String,
    },
    /// Print the temperature periodically until interrupted
    Watch {
        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// Dump the raw register contents
    Regs,
    /// List the exposed attributes
    Attrs,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("i2csens: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args)?;

    setup_tracing(&args, config.shared.log_level);
    info!(
        "i2csens v{} ({}) starting...",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    let transport = open_transport(&config.bus)?;
    let name = config.device.name.clone();
    let mut host = DeviceHost::new(DriverRegistry::with_builtin());
    host.discover(
        DeviceDescriptor {
            name: name.clone(),
            compatible: config.device.compatible.clone(),
            id: config.device.id.clone(),
        },
        transport,
    )?;

    let result = run_command(&host, &name, &args.command);
    if let Err(e) = &result {
        error!("{name}: {e}");
    }

    host.shutdown();
    result
}

/// Load and validate the config file. With `--simulate` a missing file falls
/// back to defaults and the bus is replaced by the simulated sensor.
fn load_config(args: &Args) -> Result<DeviceConfig, ConfigError> {
    let mut config = match DeviceConfig::load(&args.config) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) if args.simulate => DeviceConfig::default(),
        Err(e) => return Err(e),
    };
    config.validate()?;

    if args.simulate && !matches!(config.bus, BusConfig::Simulated(_)) {
        config.bus = BusConfig::Simulated(SimulationConfig::default());
    }
    Ok(config)
}

fn run_command(
    host: &DeviceHost,
    name: &str,
    command: &Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Show { attr } => {
            print!("{}", host.read_attr(name, attr)?);
        }
        Command::Store { attr, value } => {
            let written = host.write_attr(name, attr, value)?;
            info!("{name}: wrote {written} bytes to '{attr}'");
        }
        Command::Watch { interval_ms } => {
            let running = Arc::new(AtomicBool::new(true));
            let flag = Arc::clone(&running);
            ctrlc::set_handler(move || {
                flag.store(false, Ordering::SeqCst);
            })?;

            let interval = Duration::from_millis(*interval_ms);
            while running.load(Ordering::SeqCst) {
                match host.read_attr(name, "data") {
                    Ok(value) => print!("{value}"),
                    Err(e) => warn!("{name}: data read failed: {e}"),
                }
                std::thread::sleep(interval);
            }
            info!("Received shutdown signal");
        }
        Command::Regs => {
            let device = host
                .device(name)
                .ok_or_else(|| format!("device '{name}' is not bound"))?;
            device.with_regmap(|map| {
                for address in 0..map.config().address_space_size() {
                    let address = address as u8;
                    let label = REGISTER_NAMES.get(usize::from(address)).unwrap_or(&"?");
                    match map.read(address) {
                        Ok(value) => println!("{address:#04x} {label:<4} {value:#04x}"),
                        Err(e) => println!("{address:#04x} {label:<4} <{e}>"),
                    }
                }
            });
        }
        Command::Attrs => {
            for entry in host.namespace().describe(name) {
                println!("{entry}");
            }
        }
    }
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        configured
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
