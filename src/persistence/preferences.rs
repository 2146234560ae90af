use super::storage::KeyValueStore;
use crate::domain::{Appearance, ColorTheme};
use anyhow::Result;

pub const MODE_KEY: &str = "mode";
pub const COLOR_THEME_KEY: &str = "colorTheme";

/// Display preferences, stored next to the to-dos under their own keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub appearance: Appearance,
    pub color_theme: ColorTheme,
}

/// Load preferences, falling back to light mode and the amethyst theme
pub fn load_preferences<S: KeyValueStore>(storage: &S) -> Result<Preferences> {
    let appearance = storage
        .get_item(MODE_KEY)?
        .map(|v| Appearance::from_value(&v))
        .unwrap_or_default();
    let color_theme = storage
        .get_item(COLOR_THEME_KEY)?
        .map(|v| ColorTheme::from_value(&v))
        .unwrap_or_default();

    Ok(Preferences {
        appearance,
        color_theme,
    })
}

pub fn save_appearance<S: KeyValueStore>(storage: &mut S, appearance: Appearance) -> Result<()> {
    storage.set_item(MODE_KEY, appearance.as_value())
}

pub fn save_color_theme<S: KeyValueStore>(storage: &mut S, theme: ColorTheme) -> Result<()> {
    storage.set_item(COLOR_THEME_KEY, theme.as_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FileStorage, MemoryStorage};
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_empty() {
        let storage = MemoryStorage::new();
        let prefs = load_preferences(&storage).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.appearance, Appearance::Light);
        assert_eq!(prefs.color_theme, ColorTheme::Amethyst);
    }

    #[test]
    fn test_save_and_load_preferences() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        save_appearance(&mut storage, Appearance::Dark).unwrap();
        save_color_theme(&mut storage, ColorTheme::Forest).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        let prefs = load_preferences(&reopened).unwrap();
        assert_eq!(prefs.appearance, Appearance::Dark);
        assert_eq!(prefs.color_theme, ColorTheme::Forest);
        assert_eq!(reopened.get_item(COLOR_THEME_KEY).unwrap().as_deref(), Some("theme-forest"));
    }
}
