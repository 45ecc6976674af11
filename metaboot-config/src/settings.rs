//! Flat key/value settings store

use crate::SettingValue;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Resolved configuration values keyed by flat dotted names
///
/// Nested data from configuration files is flattened on the way in, so a
/// TOML table `[metaboot.archive] scanner = "x"` and a dotted key
/// `"metaboot.archive.scanner" = "x"` land on the same entry.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
}

impl Settings {
    /// Create an empty settings store
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Build settings from nested JSON data, flattening objects into dotted keys
    ///
    /// `null` leaves are dropped. When a quoted dotted key and a nested table
    /// spell the same flat key, the spelling with fewer table levels wins;
    /// equal spellings are ordered by their top-level key.
    pub fn from_nested(data: HashMap<String, serde_json::Value>) -> Self {
        let mut leaves = Vec::new();
        for (key, value) in data {
            collect_leaves(&key, key.clone(), value, 0, &mut leaves);
        }
        leaves.sort_by(|a, b| {
            b.depth
                .cmp(&a.depth)
                .then_with(|| a.key.cmp(&b.key))
                .then_with(|| a.root.cmp(&b.root))
        });

        let mut settings = Self::new();
        for leaf in leaves {
            trace!("Setting {} = {}", leaf.key, leaf.value);
            if let Some(previous) = settings
                .values
                .insert(leaf.key.clone(), SettingValue::Value(leaf.value))
            {
                debug!(
                    "Setting {} is spelled more than once; replacing {:?}",
                    leaf.key, previous
                );
            }
        }
        debug!("Flattened configuration into {} settings", settings.len());
        settings
    }

    /// Get a setting by key
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Get a setting rendered as text
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(SettingValue::to_text)
    }

    /// Get a setting interpreted as a boolean
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(SettingValue::as_bool)
    }

    /// Set a setting, replacing any previous value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<SettingValue>,
    {
        let key = key.into();
        let value = value.into();
        trace!("Setting {} = {:?}", key, value);
        self.values.insert(key, value);
    }

    /// Set a setting to an object supplied in code
    pub fn set_object<T>(&mut self, key: impl Into<String>, object: T)
    where
        T: std::any::Any + Send + Sync,
    {
        self.set(key, SettingValue::object(object));
    }

    /// Remove a setting, returning its previous value
    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.values.remove(key)
    }

    /// Check if a setting exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over all setting keys
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Merge another store into this one; values from `other` win
    pub fn merge(&mut self, other: Settings) {
        debug!("Merging {} settings", other.len());
        self.values.extend(other.values);
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of settings
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

struct Leaf {
    key: String,
    root: String,
    depth: usize,
    value: serde_json::Value,
}

fn collect_leaves(
    root: &str,
    key: String,
    value: serde_json::Value,
    depth: usize,
    leaves: &mut Vec<Leaf>,
) {
    match value {
        serde_json::Value::Null => trace!("Skipping null setting {}", key),
        serde_json::Value::Object(map) if !map.is_empty() => {
            for (child, nested) in map {
                collect_leaves(root, format!("{key}.{child}"), nested, depth + 1, leaves);
            }
        }
        value => leaves.push(Leaf {
            key,
            root: root.to_string(),
            depth,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_nested_flattens_tables() {
        let mut data = HashMap::new();
        data.insert(
            "metaboot".to_string(),
            json!({"archive": {"scanner": "fast", "autodetection": "class"}, "flag": true}),
        );
        data.insert("plain".to_string(), json!([1, 2]));

        let settings = Settings::from_nested(data);

        assert_eq!(settings.len(), 4);
        assert_eq!(
            settings.get_string("metaboot.archive.scanner").as_deref(),
            Some("fast")
        );
        assert_eq!(settings.get_bool("metaboot.flag"), Some(true));
        assert_eq!(settings.get("plain"), Some(&SettingValue::from(json!([1, 2]))));
    }

    #[test]
    fn test_empty_table_is_kept_as_value() {
        let mut data = HashMap::new();
        data.insert("empty".to_string(), json!({}));

        let settings = Settings::from_nested(data);
        assert!(settings.contains_key("empty"));
    }

    #[test]
    fn test_null_leaves_are_unset() {
        let mut data = HashMap::new();
        data.insert(
            "metaboot".to_string(),
            json!({"archive": {"scanner": null, "autodetection": "hbm"}}),
        );
        data.insert("top".to_string(), json!(null));

        let settings = Settings::from_nested(data);

        assert_eq!(settings.len(), 1);
        assert!(!settings.contains_key("metaboot.archive.scanner"));
        assert!(!settings.contains_key("top"));
    }

    #[test]
    fn test_dotted_key_wins_over_nested_table() {
        for _ in 0..16 {
            let mut data = HashMap::new();
            data.insert("metaboot.archive.scanner".to_string(), json!("dotted"));
            data.insert(
                "metaboot".to_string(),
                json!({"archive": {"scanner": "nested"}, "archive.interpreter": "partly"}),
            );
            data.insert("metaboot.archive".to_string(), json!({"interpreter": "other"}));

            let settings = Settings::from_nested(data);

            assert_eq!(
                settings.get_string("metaboot.archive.scanner").as_deref(),
                Some("dotted")
            );
            // Same depth on both sides: ordered by top-level key
            assert_eq!(
                settings.get_string("metaboot.archive.interpreter").as_deref(),
                Some("other")
            );
        }
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Settings::new();
        base.set("a", "base");
        base.set("b", "base");

        let mut overrides = Settings::new();
        overrides.set("b", "override");

        base.merge(overrides);
        assert_eq!(base.get_string("a").as_deref(), Some("base"));
        assert_eq!(base.get_string("b").as_deref(), Some("override"));
    }

    #[test]
    fn test_set_and_remove() {
        let mut settings = Settings::new();
        assert!(settings.is_empty());

        settings.set_object("obj", 5_u32);
        assert_eq!(
            settings.get("obj").and_then(|v| v.downcast_ref::<u32>()),
            Some(&5)
        );
        assert!(settings.remove("obj").is_some());
        assert!(settings.remove("obj").is_none());
    }
}
