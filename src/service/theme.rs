use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

pub trait ThemeStore: Send + Sync {
    fn theme(&self) -> Theme;
    fn toggle(&self) -> Theme;

    fn is_dark(&self) -> bool {
        self.theme() == Theme::Dark
    }
}

#[derive(Default)]
pub struct InMemoryThemeStore {
    theme: Mutex<Theme>,
}

impl InMemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStore for InMemoryThemeStore {
    fn theme(&self) -> Theme {
        *self.theme.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn toggle(&self) -> Theme {
        let mut theme = self.theme.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *theme = match *theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        *theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_light_and_toggles_back_and_forth() {
        let store = InMemoryThemeStore::new();
        assert!(!store.is_dark());
        assert_eq!(store.toggle(), Theme::Dark);
        assert!(store.is_dark());
        assert_eq!(store.toggle(), Theme::Light);
    }
}
