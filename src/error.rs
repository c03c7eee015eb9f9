use nix::errno::Errno;
use std::path::PathBuf;
use thiserror::Error;

/// Failure querying one mountpoint. Never escapes the collector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UsageError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("{0}")]
    Os(Errno),

    #[error("invalid usage percent: {0}")]
    InvalidPercent(f64),
}

impl From<Errno> for UsageError {
    fn from(errno: Errno) -> Self {
        match errno {
            Errno::EACCES | Errno::EPERM => UsageError::PermissionDenied,
            other                        => UsageError::Os(other),
        }
    }
}

/// Failures that abort the whole collection pass.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to read {path}: {source}")]
    Enumerate {
        path:   &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled by user")]
    Interrupted,
}

/// Rejected configuration. Reported before any collection runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("warning threshold must be 0-100 (got {0})")]
    WarningOutOfRange(u8),

    #[error("critical threshold must be 0-100 (got {0})")]
    CriticalOutOfRange(u8),

    #[error("warning threshold ({warning}) cannot be greater than critical threshold ({critical})")]
    ThresholdOrder { warning: u8, critical: u8 },

    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path:   PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
