use crate::models::mount::{SortKey, StorageRow};

/// Order rows by `key`: mountpoint ascending, every numeric key descending.
/// The sort is stable so equal keys keep enumerator order.
pub fn sort_rows(mut rows: Vec<StorageRow>, key: SortKey) -> Vec<StorageRow> {
    match key {
        SortKey::Mount   => rows.sort_by(|a, b| a.record.mountpoint.cmp(&b.record.mountpoint)),
        SortKey::Total   => rows.sort_by(|a, b| b.total.total_cmp(&a.total)),
        SortKey::Used    => rows.sort_by(|a, b| b.used.total_cmp(&a.used)),
        SortKey::Free    => rows.sort_by(|a, b| b.free.total_cmp(&a.free)),
        SortKey::Percent => rows.sort_by(|a, b| b.percent().total_cmp(&a.percent())),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::Status;
    use crate::models::mount::MountRecord;
    use proptest::prelude::*;

    fn row(mount: &str, total: f64, used: f64, free: f64, percent: f64) -> StorageRow {
        StorageRow {
            record: MountRecord {
                device:        format!("dev{}", mount),
                mountpoint:    mount.to_string(),
                fs_type:       "ext4".to_string(),
                total_bytes:   0,
                used_bytes:    0,
                free_bytes:    0,
                usage_percent: percent,
            },
            total,
            used,
            free,
            status: Status::Ok,
        }
    }

    fn mounts(rows: &[StorageRow]) -> Vec<&str> {
        rows.iter().map(|r| r.record.mountpoint.as_str()).collect()
    }

    fn sample() -> Vec<StorageRow> {
        vec![
            row("/var", 50.0, 10.0, 40.0, 20.0),
            row("/", 100.0, 90.0, 10.0, 90.0),
            row("/home", 500.0, 100.0, 400.0, 20.0),
            row("/boot", 1.0, 0.5, 0.5, 50.0),
        ]
    }

    #[test]
    fn percent_is_descending_by_default_key() {
        let sorted = sort_rows(sample(), SortKey::default());
        assert_eq!(mounts(&sorted), vec!["/", "/boot", "/var", "/home"]);
    }

    #[test]
    fn mount_is_ascending() {
        let sorted = sort_rows(sample(), SortKey::Mount);
        assert_eq!(mounts(&sorted), vec!["/", "/boot", "/home", "/var"]);
    }

    #[test]
    fn size_keys_are_descending() {
        assert_eq!(mounts(&sort_rows(sample(), SortKey::Total)), vec!["/home", "/", "/var", "/boot"]);
        assert_eq!(mounts(&sort_rows(sample(), SortKey::Used)), vec!["/home", "/", "/var", "/boot"]);
        assert_eq!(mounts(&sort_rows(sample(), SortKey::Free)), vec!["/home", "/var", "/", "/boot"]);
    }

    #[test]
    fn equal_keys_keep_original_order() {
        let rows = vec![
            row("/b", 10.0, 5.0, 5.0, 42.0),
            row("/a", 10.0, 5.0, 5.0, 42.0),
            row("/c", 10.0, 9.0, 1.0, 90.0),
        ];
        let sorted = sort_rows(rows.clone(), SortKey::Percent);
        assert_eq!(mounts(&sorted), vec!["/c", "/b", "/a"]);

        let sorted = sort_rows(rows, SortKey::Total);
        assert_eq!(mounts(&sorted), vec!["/b", "/a", "/c"]);
    }

    proptest! {
        #[test]
        fn percent_order_never_increases(percents in prop::collection::vec(0.0f64..100.0, 0..20)) {
            let rows: Vec<StorageRow> = percents
                .iter()
                .enumerate()
                .map(|(i, &p)| row(&format!("/m{}", i), 1.0, 1.0, 1.0, p))
                .collect();
            let sorted = sort_rows(rows, SortKey::Percent);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].percent() >= pair[1].percent());
            }
        }

        #[test]
        fn mount_order_is_lexicographic(names in prop::collection::vec("/[a-z]{0,6}", 0..20)) {
            let rows: Vec<StorageRow> = names.iter().map(|n| row(n, 1.0, 1.0, 1.0, 1.0)).collect();
            let sorted = sort_rows(rows, SortKey::Mount);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].record.mountpoint <= pair[1].record.mountpoint);
            }
        }

        #[test]
        fn ties_preserve_input_order(n in 1usize..15, p in 0.0f64..100.0) {
            let rows: Vec<StorageRow> = (0..n).map(|i| row(&format!("/t{:02}", n - i), 1.0, 1.0, 1.0, p)).collect();
            let before: Vec<String> = rows.iter().map(|r| r.record.mountpoint.clone()).collect();
            let sorted = sort_rows(rows, SortKey::Percent);
            let after: Vec<String> = sorted.iter().map(|r| r.record.mountpoint.clone()).collect();
            prop_assert_eq!(before, after);
        }
    }
}
