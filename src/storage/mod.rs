use serde::de::DeserializeOwned;
use serde::Serialize;
#[cfg(test)]
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(test)]
use std::sync::Mutex;

pub(crate) const AUTH_KEY: &str = "auth";
pub(crate) const THEME_KEY: &str = "theme";

/// Raw string key-value persistence.
pub(crate) trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// `window.localStorage`. Every call re-resolves the storage handle, so a
/// blocked or missing storage simply reads as empty.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserStorage;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-process map for native tests.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}

/// JSON-valued view over a [`KeyValueStore`].
#[derive(Clone)]
pub(crate) struct Storage {
    inner: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(inner: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn browser() -> Self {
        Self::new(BrowserStorage)
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    /// Missing or unparsable values read as `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.inner.get_item(key)?;
        serde_json::from_str(&json).ok()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.load(key).unwrap_or(default)
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(json) = serde_json::to_string(value) {
            self.inner.set_item(key, &json);
        }
    }

    pub fn remove(&self, key: &str) {
        self.inner.remove_item(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_default_for_missing_key() {
        let s = Storage::in_memory();
        assert_eq!(s.get("missing", 7_u32), 7);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let s = Storage::in_memory();
        s.set("k", &vec!["a".to_string(), "b".to_string()]);
        assert_eq!(s.get::<Vec<String>>("k", vec![]), vec!["a", "b"]);
    }

    #[test]
    fn test_unparsable_value_reads_as_default() {
        let raw = MemoryStorage::default();
        raw.set_item("k", "{not json");
        let s = Storage::new(raw);
        assert_eq!(s.get("k", 1_i32), 1);
    }

    #[test]
    fn test_remove_clears_value() {
        let s = Storage::in_memory();
        s.set("k", &"v");
        s.remove("k");
        assert!(s.load::<String>("k").is_none());
    }

    #[test]
    fn test_clones_share_backing_map() {
        let s = Storage::in_memory();
        let t = s.clone();
        s.set("shared", &true);
        assert!(t.get("shared", false));
    }
}
