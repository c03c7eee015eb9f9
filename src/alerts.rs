use crate::config::Thresholds;
use crate::models::mount::{MountRecord, StorageRow, Unit};
use crate::util::human::bytes_to_unit;

/// Status tier of one filesystem. Ordered so that `max` is the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok       => "OK",
            Status::Warning  => "WARNING",
            Status::Critical => "CRITICAL",
        }
    }
}

/// Single signal for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overall {
    AllOk,
    AnyWarning,
    AnyCritical,
}

impl Overall {
    /// Monitoring exit code: 0=OK, 1=WARNING, 2=CRITICAL (nagios/cron compatible)
    pub fn exit_code(&self) -> i32 {
        match self {
            Overall::AllOk       => 0,
            Overall::AnyWarning  => 1,
            Overall::AnyCritical => 2,
        }
    }
}

/// Map a usage percent to its tier. Both thresholds are inclusive lower
/// bounds of the higher tier. A NaN percent compares false everywhere and
/// lands in `Ok`.
pub fn classify(percent: f64, thr: &Thresholds) -> Status {
    if percent >= thr.critical_pct() {
        Status::Critical
    } else if percent >= thr.warning_pct() {
        Status::Warning
    } else {
        Status::Ok
    }
}

/// Derive display sizes and status for each record, preserving order.
pub fn classify_records(records: Vec<MountRecord>, unit: Unit, thr: &Thresholds) -> Vec<StorageRow> {
    records
        .into_iter()
        .map(|record| StorageRow {
            total:  bytes_to_unit(record.total_bytes, unit),
            used:   bytes_to_unit(record.used_bytes, unit),
            free:   bytes_to_unit(record.free_bytes, unit),
            status: classify(record.usage_percent, thr),
            record,
        })
        .collect()
}

/// Worst tier present across all rows, critical taking priority.
pub fn aggregate(rows: &[StorageRow]) -> Overall {
    match rows.iter().map(|r| r.status).max() {
        Some(Status::Critical) => Overall::AnyCritical,
        Some(Status::Warning)  => Overall::AnyWarning,
        _                      => Overall::AllOk,
    }
}
