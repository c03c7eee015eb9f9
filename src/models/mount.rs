use crate::alerts::Status;
use clap::ValueEnum;
use serde::Deserialize;

/// One line of the mount table, before any usage query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device:     String,
    pub mountpoint: String,
    pub fs_type:    String,
}

impl MountEntry {
    pub fn new(device: impl Into<String>, mountpoint: impl Into<String>, fs_type: impl Into<String>) -> Self {
        Self { device: device.into(), mountpoint: mountpoint.into(), fs_type: fs_type.into() }
    }
}

/// Raw counters returned by the usage query for one mountpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageCounts {
    pub total_bytes: u64,
    pub used_bytes:  u64,
    pub free_bytes:  u64,
    /// Percent as computed by the OS-side query; trusted, never recomputed.
    pub percent:     f64,
}

/// One mounted filesystem with its usage counters.
#[derive(Debug, Clone, PartialEq)]
pub struct MountRecord {
    pub device:        String,
    pub mountpoint:    String,
    pub fs_type:       String,
    pub total_bytes:   u64,
    pub used_bytes:    u64,
    pub free_bytes:    u64,
    pub usage_percent: f64,
}

impl MountRecord {
    pub fn new(entry: MountEntry, usage: UsageCounts) -> Self {
        let fs_type = if entry.fs_type.is_empty() { "unknown".to_string() } else { entry.fs_type };
        Self {
            device:        entry.device,
            mountpoint:    entry.mountpoint,
            fs_type,
            total_bytes:   usage.total_bytes,
            used_bytes:    usage.used_bytes,
            free_bytes:    usage.free_bytes,
            usage_percent: usage.percent,
        }
    }
}

/// A record plus its display sizes and status tier.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageRow {
    pub record: MountRecord,
    pub total:  f64,
    pub used:   f64,
    pub free:   f64,
    pub status: Status,
}

impl StorageRow {
    pub fn percent(&self) -> f64 {
        self.record.usage_percent
    }
}

// ── Display unit ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Unit {
    #[value(name = "KB")]
    Kb,
    #[value(name = "MB")]
    Mb,
    #[default]
    #[value(name = "GB")]
    Gb,
    #[value(name = "TB")]
    Tb,
}

impl Unit {
    pub fn divisor(&self) -> f64 {
        match self {
            Self::Kb => 1_024.0,
            Self::Mb => 1_048_576.0,
            Self::Gb => 1_073_741_824.0,
            Self::Tb => 1_099_511_627_776.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Kb => "KB",
            Self::Mb => "MB",
            Self::Gb => "GB",
            Self::Tb => "TB",
        }
    }

    /// Lowercase suffix used in JSON field names: `total_gb`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Kb => "kb",
            Self::Mb => "mb",
            Self::Gb => "gb",
            Self::Tb => "tb",
        }
    }

    /// Case-insensitive lookup; anything unrecognised is GB.
    pub fn from_name(name: &str) -> Self {
        match name.to_uppercase().as_str() {
            "KB" => Self::Kb,
            "MB" => Self::Mb,
            "TB" => Self::Tb,
            _    => Self::Gb,
        }
    }
}

// ── Sort key ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Mount,
    Total,
    Used,
    Free,
    #[default]
    Percent,
}

impl SortKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mount   => "mount",
            Self::Total   => "total",
            Self::Used    => "used",
            Self::Free    => "free",
            Self::Percent => "percent",
        }
    }
}

// ── Output format ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    /// Pretty JSON, highlighted when colors are on.
    Json,
    /// Plain pretty JSON.
    RawJson,
}
