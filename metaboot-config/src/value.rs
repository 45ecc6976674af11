//! Opaque setting values

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A single configuration value
///
/// Values loaded from files or the environment are plain JSON data. Values
/// applied programmatically may instead carry an arbitrary object, such as a
/// ready-made strategy instance. Nothing at this layer interprets either form.
#[derive(Clone)]
pub enum SettingValue {
    /// Data read from a configuration source
    Value(serde_json::Value),
    /// An object supplied in code
    Object(Arc<dyn Any + Send + Sync>),
}

impl SettingValue {
    /// Wrap an object supplied in code
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        SettingValue::Object(Arc::new(value))
    }

    /// Borrow the JSON data, if this is a data value
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            SettingValue::Value(value) => Some(value),
            SettingValue::Object(_) => None,
        }
    }

    /// Whether this is JSON `null`, which counts as unset
    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Value(serde_json::Value::Null))
    }

    /// Borrow the value as a string slice if it is a JSON string
    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(|v| v.as_str())
    }

    /// Render scalars as text
    ///
    /// Strings, numbers and booleans stringify; everything else is `None`.
    pub fn to_text(&self) -> Option<String> {
        match self.as_json()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Interpret the value as a boolean if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_json()? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            serde_json::Value::Number(n) => n.as_i64().map(|i| i != 0),
            _ => None,
        }
    }

    /// Borrow the carried object as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            SettingValue::Object(object) => object.downcast_ref::<T>(),
            SettingValue::Value(_) => None,
        }
    }

    /// Short human-readable rendering, used in error messages
    pub fn describe(&self) -> String {
        match self {
            SettingValue::Value(serde_json::Value::String(s)) => s.clone(),
            SettingValue::Value(value) => value.to_string(),
            SettingValue::Object(_) => "<object>".to_string(),
        }
    }
}

impl fmt::Debug for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Value(value) => write!(f, "{value}"),
            SettingValue::Object(_) => f.write_str("<object>"),
        }
    }
}

impl PartialEq for SettingValue {
    /// Data values compare by content, objects by identity
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SettingValue::Value(a), SettingValue::Value(b)) => a == b,
            (SettingValue::Object(a), SettingValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for SettingValue {
    fn from(value: serde_json::Value) -> Self {
        SettingValue::Value(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Value(serde_json::Value::String(value.to_string()))
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Value(serde_json::Value::String(value))
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Value(serde_json::Value::Bool(value))
    }
}
