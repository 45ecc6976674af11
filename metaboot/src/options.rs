//! Options governing how the metadata model is built

use crate::BootstrapResult;
use metaboot_config::{keys, ConfigError, Settings};

/// Configuration consumed while mapping types into the metadata model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBuildingOptions {
    /// Catalog applied to unqualified table names
    pub default_catalog: Option<String>,
    /// Schema applied to unqualified table names
    pub default_schema: Option<String>,
    /// Strategy name for deriving names that were not given explicitly
    pub implicit_naming_strategy: String,
    /// Strategy name for mapping logical names to physical ones
    pub physical_naming_strategy: String,
    /// Use nationalized character types for text columns
    pub use_nationalized_character_data: bool,
    /// Apply auto-apply converters to matching attributes
    pub auto_apply_converters: bool,
}

impl MetadataBuildingOptions {
    /// Default implicit naming strategy name
    pub const DEFAULT_IMPLICIT_NAMING_STRATEGY: &'static str = "default";

    /// Default physical naming strategy name
    pub const DEFAULT_PHYSICAL_NAMING_STRATEGY: &'static str = "identity";

    /// Read options from settings, falling back to defaults for unset keys
    pub fn from_settings(settings: &Settings) -> BootstrapResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            default_catalog: settings.get_string(keys::DEFAULT_CATALOG),
            default_schema: settings.get_string(keys::DEFAULT_SCHEMA),
            implicit_naming_strategy: settings
                .get_string(keys::IMPLICIT_NAMING_STRATEGY)
                .unwrap_or(defaults.implicit_naming_strategy),
            physical_naming_strategy: settings
                .get_string(keys::PHYSICAL_NAMING_STRATEGY)
                .unwrap_or(defaults.physical_naming_strategy),
            use_nationalized_character_data: flag(
                settings,
                keys::USE_NATIONALIZED_CHARACTER_DATA,
                defaults.use_nationalized_character_data,
            )?,
            auto_apply_converters: flag(
                settings,
                keys::AUTO_APPLY_CONVERTERS,
                defaults.auto_apply_converters,
            )?,
        })
    }
}

fn flag(settings: &Settings, key: &str, default: bool) -> BootstrapResult<bool> {
    match settings.get(key) {
        None => Ok(default),
        Some(value) => value.as_bool().ok_or_else(|| {
            ConfigError::invalid_value(key, format!("expected a boolean, got {}", value.describe()))
                .into()
        }),
    }
}

impl Default for MetadataBuildingOptions {
    fn default() -> Self {
        Self {
            default_catalog: None,
            default_schema: None,
            implicit_naming_strategy: Self::DEFAULT_IMPLICIT_NAMING_STRATEGY.to_string(),
            physical_naming_strategy: Self::DEFAULT_PHYSICAL_NAMING_STRATEGY.to_string(),
            use_nationalized_character_data: false,
            auto_apply_converters: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BootstrapError;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let options = MetadataBuildingOptions::from_settings(&Settings::new()).unwrap();
        assert_eq!(options, MetadataBuildingOptions::default());
        assert!(options.auto_apply_converters);
    }

    #[test]
    fn test_reads_configured_values() {
        let mut settings = Settings::new();
        settings.set(keys::DEFAULT_SCHEMA, "billing");
        settings.set(keys::PHYSICAL_NAMING_STRATEGY, "snake_case");
        settings.set(keys::USE_NATIONALIZED_CHARACTER_DATA, "yes");
        settings.set(keys::AUTO_APPLY_CONVERTERS, false);

        let options = MetadataBuildingOptions::from_settings(&settings).unwrap();

        assert_eq!(options.default_schema.as_deref(), Some("billing"));
        assert_eq!(options.default_catalog, None);
        assert_eq!(options.physical_naming_strategy, "snake_case");
        assert_eq!(options.implicit_naming_strategy, "default");
        assert!(options.use_nationalized_character_data);
        assert!(!options.auto_apply_converters);
    }

    #[test]
    fn test_rejects_non_boolean_flags() {
        let mut settings = Settings::new();
        settings.set(keys::AUTO_APPLY_CONVERTERS, "sometimes");

        let err = MetadataBuildingOptions::from_settings(&settings).unwrap_err();
        match err {
            BootstrapError::Config(ConfigError::InvalidValue { key, .. }) => {
                assert_eq!(key, keys::AUTO_APPLY_CONVERTERS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
