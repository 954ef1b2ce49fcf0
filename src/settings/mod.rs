//! User settings: theme, time format, and the selected city list.
//!
//! Settings are plain values; persistence lives in [`store`]. Every field
//! has a default so a missing or partial settings file never blocks startup.

pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Color theme preference. `Auto` resolves from the terminal environment at
/// startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

/// A theme with `Auto` already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl Theme {
    /// Resolve `Auto` against the terminal's advertised background.
    ///
    /// `COLORFGBG` reports "fg;bg" color indices; a high background index
    /// (7 or 15) means a light terminal. Absent or unparseable, dark wins,
    /// since dark terminals are the common case.
    pub fn resolve(self) -> ResolvedTheme {
        match self {
            Theme::Light => ResolvedTheme::Light,
            Theme::Dark => ResolvedTheme::Dark,
            Theme::Auto => match std::env::var("COLORFGBG") {
                Ok(value) => {
                    let bg = value.rsplit(';').next().and_then(|s| s.parse::<u8>().ok());
                    match bg {
                        Some(7) | Some(15) => ResolvedTheme::Light,
                        _ => ResolvedTheme::Dark,
                    }
                }
                Err(_) => ResolvedTheme::Dark,
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::Auto => write!(f, "auto"),
        }
    }
}

/// 12-hour or 24-hour digital display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12")]
    H12,
    #[serde(rename = "24")]
    H24,
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::H12 => write!(f, "12"),
            TimeFormat::H24 => write!(f, "24"),
        }
    }
}

/// The complete user settings, with defaults for everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub theme: Theme,
    pub time_format: TimeFormat,
    /// Selected city names in insertion order.
    pub cities: Vec<String>,
}

/// On-disk representation. Every field optional so partial files load; the
/// TOML key names are the stable storage schema.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsFile {
    pub theme: Option<Theme>,
    #[serde(rename = "time-format")]
    pub time_format: Option<TimeFormat>,
    pub cities: Option<Vec<String>>,
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        Settings {
            theme: file.theme.unwrap_or_default(),
            time_format: file.time_format.unwrap_or_default(),
            cities: file.cities.unwrap_or_default(),
        }
    }
}

impl From<&Settings> for SettingsFile {
    fn from(settings: &Settings) -> Self {
        SettingsFile {
            theme: Some(settings.theme),
            time_format: Some(settings.time_format),
            cities: Some(settings.cities.clone()),
        }
    }
}
