//! Light/dark theme state with a persisted explicit choice.
//!
//! The active theme comes from, in order: an explicit saved choice, the
//! system preference, and finally light. Once the user picks a theme it
//! wins over later system preference changes until it is reset.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key the theme is stored under.
pub const THEME_KEY: &str = "theme";

/// A color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse a stored token. Anything but `light` or `dark` is absent.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Token used for storage and the `data-theme` attribute.
    pub fn token(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(&s.to_ascii_lowercase()).ok_or_else(|| ThemeError::UnknownTheme(s.to_string()))
    }
}

/// Errors that can occur with theme persistence.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Unknown theme {0:?} (expected light or dark)")]
    UnknownTheme(String),

    #[error("Failed to read preferences from {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to write preferences to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Storage for the single theme preference string.
pub trait PreferenceStore {
    /// The stored value, if any.
    fn load(&self) -> Result<Option<String>, ThemeError>;

    /// Store a value.
    fn save(&mut self, value: &str) -> Result<(), ThemeError>;

    /// Remove the stored value.
    fn clear(&mut self) -> Result<(), ThemeError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// The raw stored value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, ThemeError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &str) -> Result<(), ThemeError> {
        self.value = Some(value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ThemeError> {
        self.value = None;
        Ok(())
    }
}

/// Store backed by a JSON object file; the theme lives under [`THEME_KEY`].
///
/// Other keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use the given preferences file. It need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the preferences file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_map(&self) -> Result<serde_json::Map<String, serde_json::Value>, ThemeError> {
        if !self.path.exists() {
            return Ok(serde_json::Map::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| ThemeError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        if content.trim().is_empty() {
            return Ok(serde_json::Map::new());
        }

        serde_json::from_str(&content).map_err(|e| ThemeError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_map(&self, map: &serde_json::Map<String, serde_json::Value>) -> Result<(), ThemeError> {
        let write_err = |message: String| ThemeError::Write {
            path: self.path.clone(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(map).map_err(|e| write_err(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| write_err(e.to_string()))
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> Result<Option<String>, ThemeError> {
        Ok(self
            .read_map()?
            .get(THEME_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }

    fn save(&mut self, value: &str) -> Result<(), ThemeError> {
        let mut map = self.read_map()?;
        map.insert(THEME_KEY.to_string(), serde_json::Value::String(value.to_string()));
        self.write_map(&map)
    }

    fn clear(&mut self) -> Result<(), ThemeError> {
        let mut map = self.read_map()?;
        if map.remove(THEME_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Two-state theme switch with persisted explicit choice.
#[derive(Debug)]
pub struct ThemeController<S> {
    store: S,
    system: Option<Theme>,
    explicit: Option<Theme>,
    active: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Resolve the initial theme from the store and the system preference.
    pub fn new(store: S, system: Option<Theme>) -> Result<Self, ThemeError> {
        let explicit = store.load()?.as_deref().and_then(Theme::from_token);
        let active = explicit.or(system).unwrap_or_default();

        tracing::debug!(
            "Initial theme {} (saved: {:?}, system: {:?})",
            active,
            explicit,
            system
        );

        Ok(Self {
            store,
            system,
            explicit,
            active,
        })
    }

    /// The active theme.
    pub fn current(&self) -> Theme {
        self.active
    }

    /// Whether an explicit choice is in effect.
    pub fn has_explicit_choice(&self) -> bool {
        self.explicit.is_some()
    }

    /// Flip the theme and persist the choice.
    pub fn toggle(&mut self) -> Result<Theme, ThemeError> {
        self.set(self.active.toggled())
    }

    /// Choose a theme explicitly and persist it.
    pub fn set(&mut self, theme: Theme) -> Result<Theme, ThemeError> {
        self.store.save(theme.token())?;
        self.explicit = Some(theme);
        self.active = theme;
        Ok(theme)
    }

    /// Record a system preference change. Ignored while an explicit choice exists.
    pub fn on_system_change(&mut self, theme: Theme) -> Theme {
        self.system = Some(theme);
        if self.explicit.is_none() {
            self.active = theme;
        }
        self.active
    }

    /// Forget the explicit choice and follow the system preference again.
    pub fn reset(&mut self) -> Result<Theme, ThemeError> {
        self.store.clear()?;
        self.explicit = None;
        self.active = self.system.unwrap_or_default();
        Ok(self.active)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_to_light() {
        let controller = ThemeController::new(MemoryStore::new(), None).unwrap();
        assert_eq!(controller.current(), Theme::Light);
    }

    #[test]
    fn saved_choice_beats_system() {
        let controller =
            ThemeController::new(MemoryStore::with_value("light"), Some(Theme::Dark)).unwrap();
        assert_eq!(controller.current(), Theme::Light);
    }

    #[test]
    fn unknown_saved_value_is_ignored() {
        let controller =
            ThemeController::new(MemoryStore::with_value("sepia"), Some(Theme::Dark)).unwrap();
        assert_eq!(controller.current(), Theme::Dark);
        assert!(!controller.has_explicit_choice());
    }

    #[test]
    fn manual_choice_survives_system_change() {
        let mut controller = ThemeController::new(MemoryStore::new(), Some(Theme::Dark)).unwrap();
        assert_eq!(controller.current(), Theme::Dark);

        assert_eq!(controller.toggle().unwrap(), Theme::Light);
        assert_eq!(controller.store().value(), Some("light"));

        assert_eq!(controller.on_system_change(Theme::Light), Theme::Light);
        assert_eq!(controller.on_system_change(Theme::Dark), Theme::Light);
        assert_eq!(controller.current(), Theme::Light);
    }

    #[test]
    fn system_change_applies_without_choice() {
        let mut controller = ThemeController::new(MemoryStore::new(), None).unwrap();
        assert_eq!(controller.on_system_change(Theme::Dark), Theme::Dark);
    }

    #[test]
    fn reset_follows_system_again() {
        let mut controller = ThemeController::new(MemoryStore::new(), Some(Theme::Dark)).unwrap();
        controller.toggle().unwrap();

        assert_eq!(controller.reset().unwrap(), Theme::Dark);
        assert_eq!(controller.store().value(), None);
        assert_eq!(controller.on_system_change(Theme::Light), Theme::Light);
    }

    #[test]
    fn file_store_round_trip_keeps_other_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("prefs").join("folio.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "font": "serif" }"#).unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.load().unwrap(), None);

        store.save("dark").unwrap();
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some("dark".to_string()));

        store.clear().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("serif"));
        assert!(!content.contains("dark"));
    }

    #[test]
    fn controller_persists_through_file_store() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("prefs.json");

        let mut controller = ThemeController::new(FileStore::new(&path), None).unwrap();
        controller.toggle().unwrap();

        let again = ThemeController::new(FileStore::new(&path), Some(Theme::Light)).unwrap();
        assert_eq!(again.current(), Theme::Dark);
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
