//! Settings persistence behind a capability-checked store.
//!
//! The store is selected once at startup: a TOML file under the user config
//! directory when that directory is writable, otherwise an in-memory store
//! so settings survive the session even when the disk does not. Load failures
//! are never fatal; a corrupt file is logged and replaced by defaults on the
//! next save.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::constants::SETTINGS_FILE;

use super::{Settings, SettingsFile};

/// Persistence backend for [`Settings`].
pub trait SettingsStore {
    /// Load settings, substituting defaults for anything missing or broken.
    fn load(&self) -> Settings;

    /// Persist the settings. Errors are reported, not swallowed, so the
    /// caller can decide whether to warn.
    fn save(&self, settings: &Settings) -> Result<()>;

    /// Where the settings live, for log output.
    fn describe(&self) -> String;
}

/// TOML file store under the user config directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Settings {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            // First run: no file yet
            Err(_) => return Settings::default(),
        };
        match toml::from_str::<SettingsFile>(&raw) {
            Ok(file) => Settings::from(file),
            Err(e) => {
                log_pipe!();
                log_warning!("Settings file is unreadable, starting from defaults: {e}");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(&SettingsFile::from(settings))
            .context("failed to serialize settings")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Session-only fallback when no writable config directory exists.
#[derive(Default)]
pub struct MemoryStore {
    settings: RefCell<Settings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Settings {
        self.settings.borrow().clone()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.borrow_mut() = settings.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory (session only)".to_string()
    }
}

/// Pick the store for this run: the file store when the config directory can
/// actually be created, the memory store otherwise.
///
/// An explicit `--config-dir` overrides the platform default.
pub fn select_store(config_dir: Option<PathBuf>) -> Box<dyn SettingsStore> {
    let dir = config_dir.or_else(|| dirs::config_dir().map(|base| base.join("terminatr")));

    match dir {
        Some(dir) => match fs::create_dir_all(&dir) {
            Ok(()) => Box::new(FileStore::new(&dir)),
            Err(e) => {
                log_pipe!();
                log_warning!("Config directory {} is not writable: {e}", dir.display());
                log_indented!("Settings will not survive this session");
                Box::new(MemoryStore::new())
            }
        },
        None => {
            log_pipe!();
            log_warning!("No config directory available on this system");
            log_indented!("Settings will not survive this session");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Theme, TimeFormat};

    #[test]
    fn file_store_round_trips_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let settings = Settings {
            theme: Theme::Dark,
            time_format: TimeFormat::H24,
            cities: vec!["Tokyo".to_string(), "Lagos".to_string()],
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn corrupt_file_loads_defaults_instead_of_failing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(), "theme = [this is not toml").unwrap();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(&nested);
        store.save(&Settings::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn memory_store_round_trips_within_session() {
        let store = MemoryStore::new();
        let settings = Settings {
            theme: Theme::Auto,
            time_format: TimeFormat::H12,
            cities: vec!["Quito".to_string()],
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn select_store_prefers_the_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = select_store(Some(dir.path().join("terminatr")));
        assert!(store.describe().contains(SETTINGS_FILE));
    }
}
