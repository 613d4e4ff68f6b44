//! Configuration stores: where persisted control properties live.

use crate::error::Result;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

/// A flat key/value store for persisted control properties.
///
/// Keys are derived as `{control_name}_{property_name}`; values are plain
/// JSON scalars, arrays or tuples (colors are stored as `[r, g, b]`).
pub trait ConfigStore {
    /// Look up a stored value.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store a value, replacing any previous one.
    fn set(&mut self, key: &str, value: Value);
}

/// Build the storage key for `property` of the control named `owner`.
pub fn config_key(owner: &str, property: &str) -> String {
    format!("{owner}_{property}")
}

/// An in-memory store that can be round-tripped through JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryConfig {
    values: BTreeMap<String, Value>,
}

impl MemoryConfig {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a store from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let values = serde_json::from_str(json)?;
        Ok(Self { values })
    }

    /// Serialize the store as a pretty-printed JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }

    /// Load a store from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the store to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigStore for MemoryConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

/// A store shared with the application, so it can still be saved after
/// it was handed to the [`Ui`](crate::tree::Ui).
impl<S: ConfigStore + ?Sized> ConfigStore for Rc<RefCell<S>> {
    fn get(&self, key: &str) -> Option<Value> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.borrow_mut().set(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_key() {
        assert_eq!(config_key("roi", "width"), "roi_width");
    }

    #[test]
    fn test_memory_config_json_round_trip() {
        let mut store = MemoryConfig::new();
        store.set("slider_pos", json!(12));
        store.set("cell_color", json!([1, 2, 3]));

        let text = store.to_json().unwrap();
        let back = MemoryConfig::from_json(&text).unwrap();
        assert_eq!(back, store);
        assert_eq!(back.get("slider_pos"), Some(json!(12)));
        assert_eq!(back.get("missing"), None);
    }

    #[test]
    fn test_memory_config_rejects_non_object() {
        assert!(MemoryConfig::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_shared_store_sees_writes() {
        let shared = Rc::new(RefCell::new(MemoryConfig::new()));
        let mut handle = Rc::clone(&shared);
        handle.set("grid_zoom", json!(4));
        assert_eq!(shared.borrow().get("grid_zoom"), Some(json!(4)));
        assert_eq!(shared.borrow().len(), 1);
    }
}
