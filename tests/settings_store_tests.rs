use terminatr::constants::SETTINGS_FILE;
use terminatr::settings::store::{FileStore, SettingsStore, select_store};
use terminatr::settings::{Settings, Theme, TimeFormat};

#[test]
fn settings_survive_a_store_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let settings = Settings {
        theme: Theme::Dark,
        time_format: TimeFormat::H24,
        cities: vec![
            "Tokyo".to_string(),
            "London".to_string(),
            "Buenos Aires".to_string(),
        ],
    };

    {
        let store = FileStore::new(dir.path());
        store.save(&settings).unwrap();
    }

    // A fresh store over the same directory sees the same state
    let reopened = FileStore::new(dir.path());
    assert_eq!(reopened.load(), settings);
}

#[test]
fn city_order_is_preserved_across_saves() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let mut settings = Settings {
        cities: vec!["Cairo".to_string(), "Sydney".to_string()],
        ..Settings::default()
    };
    store.save(&settings).unwrap();

    settings.cities.push("Lima".to_string());
    store.save(&settings).unwrap();

    assert_eq!(
        store.load().cities,
        vec!["Cairo".to_string(), "Sydney".to_string(), "Lima".to_string()]
    );
}

#[test]
fn hand_edited_file_with_missing_keys_loads_defaults_for_them() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(
        dir.path().join(SETTINGS_FILE),
        "cities = [\"Nairobi\"]\n",
    )
    .unwrap();

    let settings = store.load();
    assert_eq!(settings.cities, vec!["Nairobi".to_string()]);
    assert_eq!(settings.theme, Theme::Light);
    assert_eq!(settings.time_format, TimeFormat::H12);
}

#[test]
fn unknown_keys_in_the_file_are_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(
        dir.path().join(SETTINGS_FILE),
        "theme = \"dark\"\nfuture-option = true\n",
    )
    .unwrap();

    // Forward compatibility: extra keys do not reject the file
    assert_eq!(store.load().theme, Theme::Dark);
}

#[test]
fn select_store_round_trips_through_an_explicit_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = select_store(Some(dir.path().join("config")));

    let settings = Settings {
        theme: Theme::Auto,
        ..Settings::default()
    };
    store.save(&settings).unwrap();
    assert_eq!(store.load().theme, Theme::Auto);
    assert!(dir.path().join("config").join(SETTINGS_FILE).exists());
}
