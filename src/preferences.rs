//! Shell display flags: sidebar visibility and light theme.

use crate::error::Result;
use crate::storage::{KeyValueStore, LIGHT_THEME_KEY, SHOW_SIDEBAR_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub show_sidebar: bool,
    pub light_theme: bool,
}

impl Preferences {
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self> {
        Ok(Self {
            show_sidebar: store.get(SHOW_SIDEBAR_KEY)?.as_deref() == Some("true"),
            light_theme: store.get(LIGHT_THEME_KEY)?.as_deref() == Some("enabled"),
        })
    }

    pub fn set_sidebar<S: KeyValueStore>(&mut self, store: &mut S, show: bool) -> Result<()> {
        store.set(SHOW_SIDEBAR_KEY, if show { "true" } else { "false" })?;
        self.show_sidebar = show;
        Ok(())
    }

    pub fn set_light_theme<S: KeyValueStore>(&mut self, store: &mut S, light: bool) -> Result<()> {
        store.set(LIGHT_THEME_KEY, if light { "enabled" } else { "disabled" })?;
        self.light_theme = light;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_when_unset() {
        let prefs = Preferences::load(&MemoryStore::default()).unwrap();
        assert!(!prefs.show_sidebar);
        assert!(!prefs.light_theme);
    }

    #[test]
    fn test_flags_round_trip() {
        let mut store = MemoryStore::default();
        let mut prefs = Preferences::load(&store).unwrap();
        prefs.set_sidebar(&mut store, true).unwrap();
        prefs.set_light_theme(&mut store, true).unwrap();
        assert_eq!(store.entries.get(LIGHT_THEME_KEY).map(String::as_str), Some("enabled"));
        assert_eq!(Preferences::load(&store).unwrap(), prefs);

        prefs.set_light_theme(&mut store, false).unwrap();
        assert_eq!(store.entries.get(LIGHT_THEME_KEY).map(String::as_str), Some("disabled"));
    }

    #[test]
    fn test_failed_write_leaves_flag_unchanged() {
        let mut store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut prefs = Preferences::load(&store).unwrap();
        assert!(prefs.set_sidebar(&mut store, true).is_err());
        assert!(!prefs.show_sidebar);
    }
}
