use assert_fs::prelude::*;
use assert_fs::TempDir;
use webpcbz::{ConversionSettings, SettingsStore};

#[test]
fn missing_file_gives_defaults() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::new(temp.child("settings.json").path());

    assert_eq!(store.load(), ConversionSettings::default());
}

#[test]
fn saved_settings_are_read_back() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::new(temp.child("nested/settings.json").path());
    let settings = ConversionSettings {
        quality: 70,
        lossless: true,
        archive_output: true,
        effort: 6,
        resize_enabled: true,
        max_size: 2560,
    };

    store.save(&settings).unwrap();
    assert_eq!(store.load(), settings);
}

#[test]
fn saved_record_uses_stable_key_names() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("settings.json");
    SettingsStore::new(file.path())
        .save(&ConversionSettings::default())
        .unwrap();

    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
    for key in ["quality", "lossless", "save_as_cbz", "webp_method", "resize_enabled", "max_size"] {
        assert!(record.get(key).is_some(), "missing key {}", key);
    }
}

#[test]
fn invalid_keys_fall_back_individually() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("settings.json");
    file.write_str(r#"{"quality": 150, "lossless": true, "webp_method": "fast", "max_size": 800}"#)
        .unwrap();

    let settings = SettingsStore::new(file.path()).load();
    let defaults = ConversionSettings::default();

    assert_eq!(settings.quality, defaults.quality);
    assert!(settings.lossless);
    assert_eq!(settings.effort, defaults.effort);
    assert_eq!(settings.max_size, 800);
    assert_eq!(settings.archive_output, defaults.archive_output);
}

#[test]
fn unparsable_file_gives_defaults() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("settings.json");
    file.write_str("{ quality: ninety").unwrap();

    assert_eq!(SettingsStore::new(file.path()).load(), ConversionSettings::default());
}
