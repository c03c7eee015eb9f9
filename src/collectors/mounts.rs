use crate::error::{CollectError, UsageError};
use crate::models::mount::{MountEntry, UsageCounts};
use crate::util::human::round1;
use std::collections::HashSet;

const MOUNT_TABLES: &[&str] = &["/proc/self/mounts", "/proc/mounts"];
const FILESYSTEMS: &str = "/proc/filesystems";

/// Source of mount entries and per-mountpoint usage counters.
#[cfg_attr(test, mockall::automock)]
pub trait MountSource {
    /// List mounted filesystems. With `include_all == false` only entries
    /// backed by a physical filesystem type are returned.
    fn list_mounts(&self, include_all: bool) -> Result<Vec<MountEntry>, CollectError>;

    /// Query usage counters for one mountpoint.
    fn usage(&self, mountpoint: &str) -> Result<UsageCounts, UsageError>;
}

/// Linux mount table plus `statvfs(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcMounts;

impl MountSource for ProcMounts {
    fn list_mounts(&self, include_all: bool) -> Result<Vec<MountEntry>, CollectError> {
        let table = read_mount_table()?;
        if include_all {
            return Ok(parse_mounts(&table, None));
        }
        let fs_list = std::fs::read_to_string(FILESYSTEMS)
            .map_err(|source| CollectError::Enumerate { path: FILESYSTEMS, source })?;
        let physical = parse_physical_fs_types(&fs_list);
        Ok(parse_mounts(&table, Some(&physical)))
    }

    fn usage(&self, mountpoint: &str) -> Result<UsageCounts, UsageError> {
        use nix::sys::statvfs::statvfs;
        let stat = statvfs(mountpoint)?;

        Ok(usage_from_blocks(
            stat.blocks() as u64,
            stat.blocks_free() as u64,
            stat.blocks_available() as u64,
            stat.fragment_size() as u64,
        ))
    }
}

fn read_mount_table() -> Result<String, CollectError> {
    let mut last_err = None;
    for path in MOUNT_TABLES {
        match std::fs::read_to_string(path) {
            Ok(text) => return Ok(text),
            Err(source) => last_err = Some(CollectError::Enumerate { path: *path, source }),
        }
    }
    Err(last_err.unwrap_or(CollectError::Enumerate {
        path:   MOUNT_TABLES[0],
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    }))
}

/// Parse `/proc/mounts` content. With `physical` set, entries whose fstype is
/// not in the set, or whose device is empty or `none`, are dropped.
pub fn parse_mounts(content: &str, physical: Option<&HashSet<String>>) -> Vec<MountEntry> {
    let mut out = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 { continue; }

        let mut device = unescape_octal(fields[0]);
        let mountpoint = unescape_octal(fields[1]);
        let fs_type    = fields[2].to_string();

        match physical {
            Some(set) => {
                if device.is_empty() || device == "none" || !set.contains(&fs_type) { continue; }
            }
            None => {
                if device == "none" { device.clear(); }
            }
        }
        out.push(MountEntry::new(device, mountpoint, fs_type));
    }
    out
}

/// Filesystem types from `/proc/filesystems` that need a block device.
pub fn parse_physical_fs_types(content: &str) -> HashSet<String> {
    let mut set: HashSet<String> = content
        .lines()
        .filter(|l| !l.starts_with("nodev"))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    // zfs registers as nodev but is disk-backed
    set.insert("zfs".to_string());
    set
}

/// The kernel escapes space, tab, newline and backslash as `\ooo`.
fn unescape_octal(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\'
            && i + 3 < bytes.len()
            && bytes[i + 1..i + 4].iter().all(|b| (b'0'..=b'7').contains(b))
        {
            let v = (bytes[i + 1] - b'0') as u32 * 64
                  + (bytes[i + 2] - b'0') as u32 * 8
                  + (bytes[i + 3] - b'0') as u32;
            if let Ok(b) = u8::try_from(v) {
                out.push(b);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Byte counters and percent from raw statvfs block counts.
/// `used` counts reserved blocks, `free` only what unprivileged users can
/// allocate, so the percent is `used / (used + free)`.
pub fn usage_from_blocks(blocks: u64, bfree: u64, bavail: u64, frsize: u64) -> UsageCounts {
    let total_bytes = blocks.saturating_mul(frsize);
    let free_bytes  = bavail.saturating_mul(frsize);
    let used_bytes  = blocks.saturating_sub(bfree).saturating_mul(frsize);

    let avail_total = used_bytes.saturating_add(free_bytes);
    let percent = if avail_total == 0 {
        0.0
    } else {
        round1(used_bytes as f64 / avail_total as f64 * 100.0)
    };

    UsageCounts { total_bytes, used_bytes, free_bytes, percent }
}
