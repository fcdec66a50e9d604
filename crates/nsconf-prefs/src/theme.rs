//! Theme preference.
//!
//! Startup picks the persisted value, then the system preference, then
//! light. Every change is written back under the `theme` key. Storage
//! failures are logged and never stop the theme from working.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::storage::PreferenceStorage;

pub const THEME_KEY: &str = "theme";

/// Environment variable carrying the system color scheme.
pub const SYSTEM_SCHEME_VAR: &str = "NSCONF_COLOR_SCHEME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// System color scheme hint from the environment, if it names a theme.
pub fn system_preference() -> Option<Theme> {
    std::env::var(SYSTEM_SCHEME_VAR).ok()?.parse().ok()
}

pub struct ThemeStore {
    storage: Box<dyn PreferenceStorage>,
    current: Mutex<Theme>,
}

impl ThemeStore {
    /// Resolve the initial theme and persist it.
    pub fn load(storage: Box<dyn PreferenceStorage>, system_hint: Option<Theme>) -> Self {
        let stored = match storage.get(THEME_KEY) {
            Ok(value) => value.and_then(|v| v.parse::<Theme>().ok()),
            Err(e) => {
                warn!(error = %e, "failed to read theme preference");
                None
            }
        };
        let theme = stored.or(system_hint).unwrap_or_default();
        debug!(%theme, persisted = stored.is_some(), "theme resolved");

        let store = Self {
            storage,
            current: Mutex::new(theme),
        };
        store.persist(theme);
        store
    }

    pub fn theme(&self) -> Theme {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flip between dark and light and persist the result.
    pub fn toggle(&self) -> Theme {
        let theme = {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            *current = current.toggled();
            *current
        };
        info!(%theme, "theme toggled");
        self.persist(theme);
        theme
    }

    fn persist(&self, theme: Theme) {
        if let Err(e) = self.storage.set(THEME_KEY, theme.as_str()) {
            warn!(error = %e, "failed to persist theme preference");
        }
    }
}

// ── Process-wide theme ─────────────────────────────────────────────

static THEME: OnceLock<ThemeStore> = OnceLock::new();

/// Initialize the process-wide theme. Later calls return the existing store.
pub fn init(storage: Box<dyn PreferenceStorage>, system_hint: Option<Theme>) -> &'static ThemeStore {
    THEME.get_or_init(|| ThemeStore::load(storage, system_hint))
}

/// Current process-wide theme, if initialized.
pub fn current() -> Option<Theme> {
    THEME.get().map(ThemeStore::theme)
}

/// Toggle the process-wide theme. `None` before [`init`].
pub fn toggle() -> Option<Theme> {
    THEME.get().map(ThemeStore::toggle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PrefsError, PrefsResult};
    use crate::storage::MemoryStorage;

    struct BrokenStorage;

    impl PreferenceStorage for BrokenStorage {
        fn get(&self, _key: &str) -> PrefsResult<Option<String>> {
            Err(PrefsError::Unavailable("disabled".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> PrefsResult<()> {
            Err(PrefsError::Unavailable("disabled".into()))
        }
    }

    fn storage_with(theme: &str) -> Box<MemoryStorage> {
        let storage = MemoryStorage::default();
        storage.set(THEME_KEY, theme).unwrap();
        Box::new(storage)
    }

    #[test]
    fn test_persisted_value_wins() {
        let store = ThemeStore::load(storage_with("dark"), Some(Theme::Light));
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn test_system_hint_then_light() {
        let store = ThemeStore::load(Box::new(MemoryStorage::default()), Some(Theme::Dark));
        assert_eq!(store.theme(), Theme::Dark);

        let store = ThemeStore::load(Box::new(MemoryStorage::default()), None);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_unknown_persisted_value_is_ignored() {
        let store = ThemeStore::load(storage_with("sepia"), None);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let store = ThemeStore::load(Box::new(MemoryStorage::default()), None);
        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(
            store.storage.get(THEME_KEY).unwrap().as_deref(),
            Some("dark")
        );
        assert_eq!(store.toggle(), Theme::Light);
    }

    #[test]
    fn test_broken_storage_still_toggles() {
        let store = ThemeStore::load(Box::new(BrokenStorage), None);
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.toggle(), Theme::Dark);
    }

    #[test]
    fn test_global_init_once() {
        let first = init(storage_with("dark"), None);
        let second = init(storage_with("light"), None);
        assert!(std::ptr::eq(first, second));
        assert_eq!(current(), Some(Theme::Dark));
        assert_eq!(toggle(), Some(Theme::Light));
    }
}
