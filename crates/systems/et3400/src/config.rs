//! Machine configuration, stored as JSON

use emu_core::logging::{log, LogCategory, LogLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::keypad::KeyPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub key_policy: KeyPolicy,
    /// Zero RAM on every power-on
    pub clear_ram_on_power_on: bool,
    /// CPU clock in Hz
    pub clock_hz: u32,
    /// Scheduling slices per second; each `run_tick` spends `clock_hz / ticks_per_second` cycles
    pub ticks_per_second: u32,
    pub breakpoints: Vec<u16>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            key_policy: KeyPolicy::SingleKey,
            clear_ram_on_power_on: true,
            clock_hz: 1_000_000,
            ticks_per_second: 60,
            breakpoints: Vec::new(),
        }
    }
}

impl MachineConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Load `path`, falling back to defaults with a warning on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log(LogCategory::Power, LogLevel::Warn, || {
                    format!("{} ({}); using defaults", e, path.display())
                });
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_hz == 0 {
            return Err(ConfigError::Invalid("clock_hz must be non-zero".into()));
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid(
                "ticks_per_second must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Cycle budget of one tick, never less than one cycle
    pub fn cycles_per_tick(&self) -> u64 {
        (self.clock_hz as u64 / self.ticks_per_second.max(1) as u64).max(1)
    }
}
