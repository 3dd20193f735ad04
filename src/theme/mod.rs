use crate::storage::{Storage, THEME_KEY};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn load(storage: &Storage) -> Self {
        storage.get(THEME_KEY, Theme::default())
    }

    pub fn save(self, storage: &Storage) {
        storage.set(THEME_KEY, &self);
    }

    /// Label for the header toggle (names the theme it switches to).
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    /// Set or clear the `dark` class on `<html>`.
    pub fn apply_to_document(self) {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        let classes = root.class_list();
        let _ = match self {
            Theme::Dark => classes.add_1("dark"),
            Theme::Light => classes.remove_1("dark"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_light() {
        assert_eq!(Theme::load(&Storage::in_memory()), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let s = Storage::in_memory();
        Theme::load(&s).toggled().save(&s);
        assert_eq!(Theme::load(&s), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_stored_as_plain_name() {
        let s = Storage::in_memory();
        Theme::Dark.save(&s);
        assert_eq!(s.load::<String>(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
