//! Display theme flag
//!
//! The front end owns the current theme; other components only sample it.
//! `ThemeState` is a cheap, cloneable handle to that shared flag. An unset
//! flag means no rendering context is attached and reads as [`Theme::Light`].

use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

/// Store key of the persisted theme choice
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The theme a toggle switches to
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => anyhow::bail!("unknown theme '{}', expected 'dark' or 'light'", other),
        }
    }
}

/// Shared, observable theme flag
#[derive(Debug, Clone, Default)]
pub struct ThemeState {
    current: Arc<RwLock<Option<Theme>>>,
}

impl ThemeState {
    /// A flag with no rendering context attached
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        let state = Self::default();
        state.set(theme);
        state
    }

    /// Restore the persisted choice, falling back to the default theme
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        let theme = store
            .get_item(THEME_KEY)
            .and_then(|value| match value.parse() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    log::warn!("Ignoring stored theme: {}", e);
                    None
                }
            })
            .unwrap_or_default();
        Self::with_theme(theme)
    }

    /// Sample the current theme
    pub fn current(&self) -> Theme {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .unwrap_or_default()
    }

    pub fn is_attached(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn set(&self, theme: Theme) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(theme);
    }

    /// Set the theme and remember it across runs
    pub fn set_and_persist(&self, theme: Theme, store: &dyn KeyValueStore) {
        self.set(theme);
        if let Err(e) = store.set_item(THEME_KEY, theme.as_str()) {
            log::warn!("Failed to persist theme: {:#}", e);
        }
    }
}
