//! Device configuration file tests.
//!
//! Loads the shipped sample config and checks loader error reporting and
//! validation on files written to a temp dir.

use i2csens_common::config::{ConfigError, ConfigLoader, LogLevel};
use i2csens_common::consts::I2CSENS_ID;
use i2csens_common::hal::config::{BusConfig, DeviceConfig, SimulationConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn sample_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/i2csens.toml")
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("i2csens.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn shipped_sample_config_is_valid() {
    let config = DeviceConfig::load(&sample_config()).expect("sample config loads");
    config.validate().expect("sample config validates");

    assert_eq!(config.shared.log_level, LogLevel::Info);
    assert_eq!(config.device.compatible.as_deref(), Some("mistra,i2csens"));
    assert_eq!(
        config.bus,
        BusConfig::Simulated(SimulationConfig {
            id: I2CSENS_ID,
            ctrl: 0,
            data: 50,
        })
    );
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    match DeviceConfig::load(&path) {
        Err(ConfigError::FileNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn missing_shared_section_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[bus]
kind = "simulated"
"#,
    );
    assert!(matches!(
        DeviceConfig::load(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn unknown_bus_kind_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[shared]
service_name = "x"

[bus]
kind = "spi"
"#,
    );
    assert!(matches!(
        DeviceConfig::load(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn i2c_dev_address_must_be_seven_bit() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[shared]
service_name = "x"

[bus]
kind = "i2c-dev"
path = "/dev/i2c-1"
address = 0x80
"#,
    );
    let config = DeviceConfig::load(&path).expect("parses");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn empty_service_name_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[shared]
service_name = ""
"#,
    );
    let config = DeviceConfig::load(&path).expect("parses");
    assert!(config.validate().is_err());
}
