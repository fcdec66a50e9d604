//! nsconf-prefs: persisted client preferences.
//!
//! Only the theme is stored today, under the `theme` key of a small JSON
//! preferences file.

pub mod error;
pub mod storage;
pub mod theme;

pub use error::{PrefsError, PrefsResult};
pub use storage::{JsonFileStorage, MemoryStorage, PreferenceStorage};
pub use theme::{system_preference, Theme, ThemeStore};
