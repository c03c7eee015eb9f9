use crate::collectors::mounts::MountSource;
use crate::error::{CollectError, UsageError};
use crate::models::mount::{MountEntry, MountRecord, UsageCounts};
use nix::errno::Errno;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, warn};

/// Filesystem types dropped by `--physical`.
pub const PSEUDO_FS: &[&str] = &[
    "proc", "sysfs", "tmpfs", "devtmpfs", "devpts", "cgroup", "cgroup2",
    "pstore", "bpf", "securityfs", "mqueue", "hugetlbfs", "tracefs",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Passed through to the enumerator; no extra filtering here.
    pub include_all:   bool,
    pub physical_only: bool,
}

fn is_pseudo(entry: &MountEntry) -> bool {
    PSEUDO_FS.contains(&entry.fs_type.as_str()) || entry.device.starts_with("/dev/loop")
}

/// Reject counters whose percent cannot be classified.
fn checked(usage: UsageCounts) -> Result<UsageCounts, UsageError> {
    if usage.percent.is_finite() {
        Ok(usage)
    } else {
        Err(UsageError::InvalidPercent(usage.percent))
    }
}

/// Enumerate mounts and query usage for each, in enumerator order.
///
/// Per-mount failures are logged and the mount is skipped. Only a failed
/// enumeration or a raised `cancel` flag ends the pass early.
pub fn collect_storage_info(
    source: &dyn MountSource,
    opts:   CollectOptions,
    cancel: &AtomicBool,
) -> Result<Vec<MountRecord>, CollectError> {
    debug!(include_all = opts.include_all, physical_only = opts.physical_only, "collecting storage info");

    let mounts = source.list_mounts(opts.include_all)?;
    let mut out = Vec::with_capacity(mounts.len());

    for entry in mounts {
        if cancel.load(Ordering::SeqCst) {
            return Err(CollectError::Interrupted);
        }
        if entry.mountpoint.is_empty() {
            debug!(device = %entry.device, "skipping: empty mountpoint");
            continue;
        }
        if opts.physical_only && is_pseudo(&entry) {
            debug!(device = %entry.device, mountpoint = %entry.mountpoint, "skipping: pseudo-filesystem or loop device");
            continue;
        }

        match source.usage(&entry.mountpoint).and_then(checked) {
            Ok(usage) => {
                if !(0.0..=100.0).contains(&usage.percent) {
                    warn!(mountpoint = %entry.mountpoint, percent = usage.percent, "usage percent outside 0-100");
                }
                let record = MountRecord::new(entry, usage);
                debug!(?record, "adding row");
                out.push(record);
            }
            // a query cut short by Ctrl-C belongs to the interrupt, not the mount
            Err(_) if cancel.load(Ordering::SeqCst) => {
                return Err(CollectError::Interrupted);
            }
            Err(UsageError::Os(Errno::EINTR)) => {
                debug!(mountpoint = %entry.mountpoint, "skipping: usage query interrupted");
            }
            Err(UsageError::PermissionDenied) => {
                warn!("Permission denied for mountpoint: {}", entry.mountpoint);
            }
            Err(e) => {
                error!("Error accessing {}: {}", entry.mountpoint, e);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::mounts::MockMountSource;
    use std::sync::Arc;

    fn counts(percent: f64) -> UsageCounts {
        UsageCounts { total_bytes: 1_000, used_bytes: 400, free_bytes: 600, percent }
    }

    fn source_with(mounts: Vec<MountEntry>) -> MockMountSource {
        let mut src = MockMountSource::new();
        src.expect_list_mounts().returning(move |_| Ok(mounts.clone()));
        src
    }

    fn mountpoints(records: &[MountRecord]) -> Vec<&str> {
        records.iter().map(|r| r.mountpoint.as_str()).collect()
    }

    fn run(src: &MockMountSource, physical_only: bool) -> Vec<MountRecord> {
        let opts = CollectOptions { include_all: false, physical_only };
        collect_storage_info(src, opts, &AtomicBool::new(false)).unwrap()
    }

    #[test]
    fn physical_only_drops_tmpfs() {
        let mounts = vec![
            MountEntry::new("/dev/sda1", "/", "ext4"),
            MountEntry::new("tmpfs", "/run", "tmpfs"),
        ];

        let mut src = source_with(mounts.clone());
        src.expect_usage().returning(|_| Ok(counts(40.0)));
        assert_eq!(mountpoints(&run(&src, true)), vec!["/"]);

        let mut src = source_with(mounts);
        src.expect_usage().returning(|_| Ok(counts(40.0)));
        assert_eq!(mountpoints(&run(&src, false)), vec!["/", "/run"]);
    }

    #[test]
    fn physical_only_drops_every_pseudo_type_and_loop_devices() {
        let mut mounts: Vec<MountEntry> = PSEUDO_FS
            .iter()
            .map(|fs| MountEntry::new(*fs, format!("/pseudo/{}", fs), *fs))
            .collect();
        mounts.push(MountEntry::new("/dev/loop3", "/snap/app/12", "squashfs"));
        mounts.push(MountEntry::new("/dev/nvme0n1p2", "/home", "btrfs"));

        let mut src = source_with(mounts);
        src.expect_usage().returning(|_| Ok(counts(10.0)));
        assert_eq!(mountpoints(&run(&src, true)), vec!["/home"]);
    }

    #[test]
    fn empty_mountpoint_never_produces_a_record() {
        for physical_only in [false, true] {
            let mut src = source_with(vec![
                MountEntry::new("/dev/sdc1", "", "ext4"),
                MountEntry::new("/dev/sda1", "/", "ext4"),
            ]);
            src.expect_usage()
                .withf(|mp: &str| !mp.is_empty())
                .returning(|_| Ok(counts(20.0)));
            assert_eq!(mountpoints(&run(&src, physical_only)), vec!["/"]);
        }
    }

    #[test]
    fn permission_denied_skips_only_that_mount() {
        let mut src = source_with(vec![
            MountEntry::new("/dev/sda1", "/", "ext4"),
            MountEntry::new("/dev/sdb1", "/secret", "ext4"),
            MountEntry::new("/dev/sdc1", "/data", "xfs"),
        ]);
        src.expect_usage().returning(|mp: &str| {
            if mp == "/secret" { Err(UsageError::PermissionDenied) } else { Ok(counts(30.0)) }
        });
        assert_eq!(mountpoints(&run(&src, false)), vec!["/", "/data"]);
    }

    #[test]
    fn os_errors_and_bad_percents_are_skipped() {
        let mut src = source_with(vec![
            MountEntry::new("server:/export", "/mnt/stale", "nfs4"),
            MountEntry::new("/dev/sda1", "/", "ext4"),
            MountEntry::new("/dev/sdd1", "/weird", "ext4"),
        ]);
        src.expect_usage().returning(|mp: &str| match mp {
            "/mnt/stale" => Err(UsageError::Os(Errno::ESTALE)),
            "/weird"     => Ok(counts(f64::NAN)),
            _            => Ok(counts(55.5)),
        });
        let records = run(&src, false);
        assert_eq!(mountpoints(&records), vec!["/"]);
        assert_eq!(records[0].usage_percent, 55.5);
    }

    #[test]
    fn out_of_range_percent_is_kept() {
        let mut src = source_with(vec![MountEntry::new("/dev/sda1", "/", "ext4")]);
        src.expect_usage().returning(|_| Ok(counts(101.5)));
        let records = run(&src, false);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].usage_percent, 101.5);
    }

    #[test]
    fn include_all_is_passed_to_enumerator() {
        let mut src = MockMountSource::new();
        src.expect_list_mounts()
            .withf(|all: &bool| *all)
            .times(1)
            .returning(|_| Ok(vec![MountEntry::new("proc", "/proc", "proc")]));
        src.expect_usage().returning(|_| Ok(counts(0.0)));

        let opts = CollectOptions { include_all: true, physical_only: false };
        let records = collect_storage_info(&src, opts, &AtomicBool::new(false)).unwrap();
        assert_eq!(mountpoints(&records), vec!["/proc"]);
    }

    #[test]
    fn enumeration_failure_propagates() {
        let mut src = MockMountSource::new();
        src.expect_list_mounts().returning(|_| {
            Err(CollectError::Enumerate {
                path:   "/proc/self/mounts",
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });
        let err = collect_storage_info(&src, CollectOptions::default(), &AtomicBool::new(false)).unwrap_err();
        assert!(matches!(err, CollectError::Enumerate { .. }));
    }

    #[test]
    fn raised_cancel_flag_interrupts() {
        let mut src = source_with(vec![MountEntry::new("/dev/sda1", "/", "ext4")]);
        src.expect_usage().times(0);
        let err = collect_storage_info(&src, CollectOptions::default(), &AtomicBool::new(true)).unwrap_err();
        assert!(matches!(err, CollectError::Interrupted));
    }

    #[test]
    fn failure_after_cancel_reports_the_interrupt() {
        let cancel = Arc::new(AtomicBool::new(false));
        let raised = Arc::clone(&cancel);
        let mut src = source_with(vec![
            MountEntry::new("/dev/sda1", "/", "ext4"),
            MountEntry::new("/dev/sdb1", "/data", "xfs"),
        ]);
        src.expect_usage().times(1).returning(move |_| {
            raised.store(true, Ordering::SeqCst);
            Err(UsageError::Os(Errno::EINTR))
        });
        let err = collect_storage_info(&src, CollectOptions::default(), &cancel).unwrap_err();
        assert!(matches!(err, CollectError::Interrupted));
    }

    #[test]
    fn eintr_without_cancel_skips_the_mount() {
        let mut src = source_with(vec![
            MountEntry::new("/dev/sda1", "/", "ext4"),
            MountEntry::new("/dev/sdb1", "/data", "xfs"),
        ]);
        src.expect_usage().returning(|mp: &str| {
            if mp == "/" { Err(UsageError::Os(Errno::EINTR)) } else { Ok(counts(12.0)) }
        });
        assert_eq!(mountpoints(&run(&src, false)), vec!["/data"]);
    }

    #[test]
    fn missing_fs_type_becomes_unknown() {
        let mut src = source_with(vec![MountEntry::new("/dev/sde1", "/odd", "")]);
        src.expect_usage().returning(|_| Ok(counts(5.0)));
        assert_eq!(run(&src, false)[0].fs_type, "unknown");
    }
}
