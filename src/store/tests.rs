use super::*;
use crate::parser::parse_for_year;
use tempfile::TempDir;

const SAMPLE: &str = "3月15日 10:30\n【丰巢】取件码1111\n3月16日 09:00\n【蜜罐】取件码2222 保管48小时";

#[test]
fn test_new_store_seeds_default_lockers() {
    let store = ParcelStore::open_in_memory().unwrap();
    let settings = store.load_settings().unwrap();

    assert_eq!(settings, LockerSettings::with_defaults());
}

#[test]
fn test_defaults_not_reseeded_after_removal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lockers.db");

    {
        let store = ParcelStore::open(&path).unwrap();
        for (name, _) in DEFAULT_LOCKERS {
            assert!(store.delete_setting(name).unwrap());
        }
    }

    let reopened = ParcelStore::open(&path).unwrap();
    assert!(reopened.load_settings().unwrap().is_empty());
}

#[test]
fn test_save_and_delete_setting() {
    let store = ParcelStore::open_in_memory().unwrap();

    store.save_setting(" 菜鸟驿站 ", 48).unwrap();
    store.save_setting("丰巢", 12).unwrap();
    let settings = store.load_settings().unwrap();
    assert_eq!(settings.get("菜鸟驿站"), Some(48));
    assert_eq!(settings.get("丰巢"), Some(12));

    assert!(store.delete_setting("菜鸟驿站").unwrap());
    assert!(!store.delete_setting("菜鸟驿站").unwrap());
}

#[test]
fn test_save_setting_validates() {
    let store = ParcelStore::open_in_memory().unwrap();

    let err = store.save_setting("丰巢", 0).unwrap_err();
    assert!(err.downcast_ref::<crate::settings::SettingsError>().is_some());
    assert!(store.save_setting("", 5).is_err());
    assert_eq!(store.load_settings().unwrap().get("丰巢"), Some(18));
}

#[test]
fn test_parcels_round_trip_in_order() {
    let mut store = ParcelStore::open_in_memory().unwrap();
    let records = parse_for_year(SAMPLE, 2025);

    assert_eq!(store.append_parcels(&records).unwrap(), 2);
    let loaded = store.list_parcels().unwrap();

    assert_eq!(loaded, records);
    assert_eq!(loaded[1].free_hours_override(), Some(48));
    assert_eq!(loaded[0].free_hours_override(), None);
}

#[test]
fn test_append_keeps_existing_parcels_first() {
    let mut store = ParcelStore::open_in_memory().unwrap();
    let first = parse_for_year("1月1日 08:00 取件码1", 2025);
    let second = parse_for_year("1月2日 08:00 取件码2", 2025);

    store.append_parcels(&first).unwrap();
    store.append_parcels(&second).unwrap();

    let codes: Vec<_> = store
        .list_parcels()
        .unwrap()
        .iter()
        .map(|r| r.pickup_code().to_string())
        .collect();
    assert_eq!(codes, vec!["1", "2"]);
}

#[test]
fn test_delete_and_clear_parcels() {
    let mut store = ParcelStore::open_in_memory().unwrap();
    let records = parse_for_year(SAMPLE, 2025);
    store.append_parcels(&records).unwrap();

    assert!(store.delete_parcel(records[0].id()).unwrap());
    assert!(!store.delete_parcel(records[0].id()).unwrap());
    assert_eq!(store.stats().unwrap().parcel_count, 1);

    assert_eq!(store.clear_parcels().unwrap(), 1);
    let stats = store.stats().unwrap();
    assert_eq!(stats.parcel_count, 0);
    assert_eq!(stats.locker_count, 3);
}

#[test]
fn test_backup_copies_everything() {
    let dir = TempDir::new().unwrap();
    let backup = dir.path().join("backup.db");

    let mut store = ParcelStore::open_in_memory().unwrap();
    store.append_parcels(&parse_for_year(SAMPLE, 2025)).unwrap();
    store.backup_to(&backup).unwrap();
    // Second backup over an existing file
    store.backup_to(&backup).unwrap();

    let restored = ParcelStore::open(&backup).unwrap();
    assert_eq!(restored.list_parcels().unwrap().len(), 2);
    assert_eq!(restored.load_settings().unwrap().len(), 3);
}

#[test]
fn test_failed_backup_leaves_target_and_no_staging_file() {
    let dir = TempDir::new().unwrap();
    // A directory at the target makes the final rename fail after the vacuum.
    let target = dir.path().join("backup.db");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep.txt"), b"old").unwrap();

    let store = ParcelStore::open_in_memory().unwrap();
    assert!(store.backup_to(&target).is_err());

    assert_eq!(std::fs::read(target.join("keep.txt")).unwrap(), b"old");
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .filter(|name| name != "backup.db")
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);
}

#[test]
fn test_backup_into_missing_directory_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("missing").join("backup.db");

    let store = ParcelStore::open_in_memory().unwrap();
    assert!(store.backup_to(&target).is_err());
    assert!(!target.exists());
}
