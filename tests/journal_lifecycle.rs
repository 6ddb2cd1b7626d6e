use chrono::{NaiveDate, NaiveDateTime};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use selfie_journal::order::ORDER_DICT_KEY;
use selfie_journal::prefs::{notifications_enabled, set_notifications_enabled};
use selfie_journal::{
    DisplayOrder, ItemCollection, JournalConfig, Preferences, SqlitePreferences,
};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

fn setup() -> (TempDir, JournalConfig) {
    let dir = TempDir::new().unwrap();
    let config = JournalConfig {
        documents_dir: dir.path().join("Documents"),
        cache_dir: dir.path().join("Caches"),
        preferences_path: dir.path().join("preferences.db"),
        ..JournalConfig::default()
    };
    (dir, config)
}

fn open(config: &JournalConfig) -> ItemCollection<SqlitePreferences> {
    ItemCollection::load_all(config.storage().unwrap(), config.open_preferences().unwrap())
        .unwrap()
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

fn at(second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 7, 28)
        .unwrap()
        .and_hms_opt(9, 30, second)
        .unwrap()
}

fn labels(selfies: &ItemCollection<SqlitePreferences>) -> Vec<String> {
    selfies
        .iter()
        .map(|item| item.label(selfies.prefs()).unwrap())
        .collect()
}

#[test]
fn order_and_labels_survive_restart() {
    let (_dir, config) = setup();

    {
        let mut selfies = open(&config);
        for (second, label) in ["A", "B", "C"].iter().enumerate() {
            let index = selfies.append_at(&jpeg_bytes(64, 48), at(second as u32)).unwrap();
            selfies.set_label(index, label).unwrap();
        }

        selfies.move_element(0, 2).unwrap();
        assert_eq!(labels(&selfies), vec!["B", "C", "A"]);
    }

    let reopened = open(&config);
    assert_eq!(labels(&reopened), vec!["B", "C", "A"]);

    let order = reopened.display_order();
    let positions: Vec<i64> = reopened
        .iter()
        .map(|item| order.position(&item.order_key()).unwrap())
        .collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn reload_matches_persisted_order() {
    let (_dir, config) = setup();
    {
        let mut selfies = open(&config);
        for second in 0..5 {
            selfies.append_at(&jpeg_bytes(16, 16), at(second)).unwrap();
        }
        selfies.move_element(4, 1).unwrap();
        selfies.remove_at(2).unwrap();
    }

    let selfies = open(&config);
    let stored = DisplayOrder::load(selfies.prefs()).unwrap().unwrap();
    let in_memory: Vec<String> = selfies.iter().map(|item| item.order_key()).collect();

    assert_eq!(stored.keys_in_order(), in_memory);
}

#[test]
fn deleting_the_only_photo_cleans_everything() {
    let (_dir, config) = setup();
    let mut selfies = open(&config);
    selfies.append(&jpeg_bytes(32, 32)).unwrap();
    selfies.set_label(0, "Beach").unwrap();
    let file_name = selfies[0].file_name().to_string();
    let photo: PathBuf = selfies[0].photo_path().to_path_buf();
    let thumb: PathBuf = selfies[0].thumb_path().to_path_buf();

    assert!(selfies.remove_at(0).unwrap().is_complete());

    assert!(selfies.is_empty());
    assert!(!photo.exists());
    assert!(!thumb.exists());
    assert_eq!(selfies.prefs().get(&file_name).unwrap(), None);
    assert_eq!(
        selfies.prefs().get(ORDER_DICT_KEY).unwrap().as_deref(),
        Some("{}")
    );
}

#[test]
fn batch_delete_of_checked_photos() {
    let (_dir, config) = setup();
    let mut selfies = open(&config);
    for (second, label) in ["A", "B", "C", "D", "E"].iter().enumerate() {
        let index = selfies.append_at(&jpeg_bytes(8, 8), at(second as u32)).unwrap();
        selfies.set_label(index, label).unwrap();
    }

    assert_eq!(selfies.check_all(), 5);
    assert_eq!(selfies.uncheck_item(2).unwrap(), 4);
    assert_eq!(selfies.uncheck_item(0).unwrap(), 3);
    assert_eq!(selfies.remove_checked().unwrap(), 3);

    assert_eq!(labels(&selfies), vec!["A", "C"]);
    drop(selfies);
    assert_eq!(labels(&open(&config)), vec!["A", "C"]);
}

#[test]
fn label_resets_to_capture_time() {
    let (_dir, config) = setup();
    let mut selfies = open(&config);
    selfies.append_at(&jpeg_bytes(8, 8), at(7)).unwrap();

    assert_eq!(selfies.label(0).unwrap(), "Jul 28, 2015, 9:30:07 AM");
    selfies.set_label(0, "Beach").unwrap();
    assert_eq!(selfies.label(0).unwrap(), "Beach");
    selfies.reset_label(0).unwrap();
    assert_eq!(selfies.label(0).unwrap(), "Jul 28, 2015, 9:30:07 AM");
}

#[test]
fn thumbnail_cache_is_reused_across_restarts() {
    let (_dir, config) = setup();
    let thumb = {
        let mut selfies = open(&config);
        selfies.append(&jpeg_bytes(96, 64)).unwrap();
        selfies[0].thumb_path().to_path_buf()
    };
    let bytes = fs::read(&thumb).unwrap();
    let modified = fs::metadata(&thumb).unwrap().modified().unwrap();

    let selfies = open(&config);

    assert!(selfies[0].thumbnail().is_some());
    assert_eq!(fs::read(&thumb).unwrap(), bytes);
    assert_eq!(fs::metadata(&thumb).unwrap().modified().unwrap(), modified);
}

#[test]
fn purged_thumbnail_cache_is_rebuilt_on_load() {
    let (_dir, config) = setup();
    {
        let mut selfies = open(&config);
        selfies.append(&jpeg_bytes(96, 64)).unwrap();
    }
    let storage = config.storage().unwrap();
    fs::remove_dir_all(storage.thumbnail_dir()).unwrap();

    let selfies = open(&config);

    assert!(selfies[0].thumbnail().is_some());
    assert!(selfies[0].thumb_path().is_file());
}

#[test]
fn notification_flag_persists() {
    let (_dir, config) = setup();
    {
        let prefs = config.open_preferences().unwrap();
        assert!(!notifications_enabled(&prefs).unwrap());
        set_notifications_enabled(&prefs, true).unwrap();
    }

    let prefs = config.open_preferences().unwrap();
    assert!(notifications_enabled(&prefs).unwrap());
}

#[tokio::test]
async fn background_load_with_sqlite() {
    let (_dir, config) = setup();
    {
        let mut selfies = open(&config);
        selfies.append_at(&jpeg_bytes(8, 8), at(0)).unwrap();
        selfies.append_at(&jpeg_bytes(8, 8), at(1)).unwrap();
        selfies.move_element(1, 0).unwrap();
    }

    let selfies = ItemCollection::load_all_async(
        config.storage().unwrap(),
        config.open_preferences().unwrap(),
    )
    .await
    .unwrap();

    let names: Vec<&str> = selfies.iter().map(|item| item.file_name()).collect();
    assert_eq!(
        names,
        vec!["Tue_Jul_28_2015_09:30:01", "Tue_Jul_28_2015_09:30:00"]
    );
}
