use crate::error::ConfigError;
use crate::models::mount::{OutputFormat, SortKey, Unit};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk configuration. Every field is optional in the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub warning_pct:  u8,
    pub critical_pct: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// KB, MB, GB or TB; anything else is treated as GB.
    pub unit:      String,
    pub sort:      SortKey,
    pub color:     bool,
    pub timestamp: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { warning_pct: 85, critical_pct: 95 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unit:      Unit::Gb.label().to_string(),
            sort:      SortKey::Percent,
            color:     true,
            timestamp: true,
        }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load from `explicit` if given, else from the default path.
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => read_config(path),
            None => match Config::config_path() {
                Some(path) if path.exists() => read_config(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("capacity").join("capacity.toml"))
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

// ── Validated settings ────────────────────────────────────────────────

/// Warning/critical thresholds in percent. Construction guarantees
/// `0 <= warning <= critical <= 100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    warning:  u8,
    critical: u8,
}

impl Thresholds {
    pub fn new(warning: u8, critical: u8) -> Result<Self, ConfigError> {
        if warning > 100 {
            return Err(ConfigError::WarningOutOfRange(warning));
        }
        if critical > 100 {
            return Err(ConfigError::CriticalOutOfRange(critical));
        }
        if warning > critical {
            return Err(ConfigError::ThresholdOrder { warning, critical });
        }
        Ok(Self { warning, critical })
    }

    pub fn warning(&self) -> u8 { self.warning }
    pub fn critical(&self) -> u8 { self.critical }

    pub fn warning_pct(&self) -> f64 { f64::from(self.warning) }
    pub fn critical_pct(&self) -> f64 { f64::from(self.critical) }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { warning: 85, critical: 95 }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub warning_pct:   Option<u8>,
    pub critical_pct:  Option<u8>,
    pub unit:          Option<Unit>,
    pub sort:          Option<SortKey>,
    pub include_all:   bool,
    pub physical_only: bool,
    pub format:        OutputFormat,
    pub no_color:      bool,
    pub no_timestamp:  bool,
}

/// Immutable run configuration threaded through every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub thresholds:    Thresholds,
    pub unit:          Unit,
    pub sort:          SortKey,
    pub include_all:   bool,
    pub physical_only: bool,
    pub format:        OutputFormat,
    pub color:         bool,
    pub timestamp:     bool,
}

impl Settings {
    pub fn resolve(cfg: &Config, cli: &Overrides) -> Result<Self, ConfigError> {
        let thresholds = Thresholds::new(
            cli.warning_pct.unwrap_or(cfg.thresholds.warning_pct),
            cli.critical_pct.unwrap_or(cfg.thresholds.critical_pct),
        )?;
        Ok(Self {
            thresholds,
            unit:          cli.unit.unwrap_or_else(|| Unit::from_name(&cfg.display.unit)),
            sort:          cli.sort.unwrap_or(cfg.display.sort),
            include_all:   cli.include_all,
            physical_only: cli.physical_only,
            format:        cli.format,
            color:         cfg.display.color && !cli.no_color,
            timestamp:     cfg.display.timestamp && !cli.no_timestamp,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds:    Thresholds::default(),
            unit:          Unit::Gb,
            sort:          SortKey::Percent,
            include_all:   false,
            physical_only: false,
            format:        OutputFormat::Table,
            color:         true,
            timestamp:     true,
        }
    }
}
