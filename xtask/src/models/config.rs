use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fxhash::FxHashMap;
use serde::Deserialize;

/// Serial adapter the hardware-facing tests should open.
pub const SERIAL_PORT_ENV: &str = "LODESTAR_SERIAL_TEST_PORT";
/// Baud rate for the serial adapter.
pub const SERIAL_BAUD_ENV: &str = "LODESTAR_SERIAL_TEST_BAUD";

/// Developer-local test settings, read from `build/tests/test_config.json`
/// when the file is present. CI runs never consult it.
#[derive(Debug, Default, Deserialize)]
pub struct TestConfig {
    #[serde(default)]
    serial: Option<SerialConfig>,
}

/// Serial adapter parameters for tests that talk to real hardware.
#[derive(Debug, Default, Deserialize)]
struct SerialConfig {
    #[serde(default)]
    port: Option<String>,
    #[serde(default)]
    baud: Option<String>,
}

impl TestConfig {
    /// Loads the config from `path`; an absent file yields the empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    /// A malformed config aborts the session rather than silently running
    /// the tests without the hardware settings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Malformed test config in {}", path.display()))
    }

    /// Folds the configured serial parameters into the test environment.
    /// Absent keys leave the environment untouched.
    pub fn apply(&self, env: &mut FxHashMap<String, String>) {
        let Some(serial) = &self.serial else {
            return;
        };

        if let Some(port) = &serial.port {
            env.insert(SERIAL_PORT_ENV.to_owned(), port.clone());
        }
        if let Some(baud) = &serial.baud {
            env.insert(SERIAL_BAUD_ENV.to_owned(), baud.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(json: &str) -> FxHashMap<String, String> {
        let config: TestConfig = serde_json::from_str(json).expect("valid test fixture");
        let mut env = FxHashMap::default();
        config.apply(&mut env);
        env
    }

    #[test]
    fn full_serial_section_maps_to_both_variables() {
        let env = apply(r#"{"serial": {"port": "/dev/ttyUSB0", "baud": "115200"}}"#);

        assert_eq!(env.get(SERIAL_PORT_ENV).map(String::as_str), Some("/dev/ttyUSB0"));
        assert_eq!(env.get(SERIAL_BAUD_ENV).map(String::as_str), Some("115200"));
    }

    #[test]
    fn partial_serial_section_maps_only_present_keys() {
        let env = apply(r#"{"serial": {"port": "/dev/ttyACM1"}}"#);

        assert_eq!(env.get(SERIAL_PORT_ENV).map(String::as_str), Some("/dev/ttyACM1"));
        assert!(!env.contains_key(SERIAL_BAUD_ENV));
    }

    #[test]
    fn missing_serial_section_leaves_environment_untouched() {
        assert!(apply("{}").is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let env = apply(r#"{"serial": {"port": "COM3"}, "jtag": {"adapter": "ftdi"}}"#);

        assert_eq!(env.get(SERIAL_PORT_ENV).map(String::as_str), Some("COM3"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test_config.json");
        fs::write(&path, "{not json").expect("fixture write");

        let error = TestConfig::load(&path).expect_err("parse failure surfaces");
        assert!(error.to_string().contains("Malformed test config"));
    }

    #[test]
    fn absent_file_yields_empty_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = TestConfig::load(&dir.path().join("missing.json")).expect("empty config");

        let mut env = FxHashMap::default();
        config.apply(&mut env);
        assert!(env.is_empty());
    }
}
