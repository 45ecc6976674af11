//! Layered settings provider using Figment

use crate::{ConfigError, ConfigResult, SettingValue, Settings};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Prefix for environment variables mapped into settings
pub const ENV_PREFIX: &str = "METABOOT_";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (.toml extension)
    Toml,
    /// YAML format (.yaml or .yml extensions)
    Yaml,
    /// JSON format (.json extension)
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detect format from a file path
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })
    }
}

/// Settings provider merging several sources with a fixed precedence
///
/// Sources are merged in this order, later sources overriding earlier ones:
/// 1. Default values
/// 2. Configuration files, in the order they were added
/// 3. Environment variables prefixed with [`ENV_PREFIX`]
/// 4. Programmatic overrides
///
/// Nothing is cached; each call to [`SettingsProvider::load`] reads every
/// source again.
#[derive(Debug, Clone)]
pub struct SettingsProvider {
    files: Vec<PathBuf>,
    environment: bool,
    env_prefix: String,
    overrides: Settings,
}

impl SettingsProvider {
    /// Create a provider that reads the environment and nothing else
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            environment: true,
            env_prefix: ENV_PREFIX.to_string(),
            overrides: Settings::new(),
        }
    }

    /// Add a configuration file; files added later take precedence
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Enable or disable the environment variable source
    pub fn with_environment(mut self, enabled: bool) -> Self {
        self.environment = enabled;
        self
    }

    /// Use a different environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Add a programmatic override
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.overrides.set(key, value);
        self
    }

    /// Add several programmatic overrides
    pub fn with_overrides(mut self, overrides: Settings) -> Self {
        self.overrides.merge(overrides);
        self
    }

    /// Load settings from all sources
    pub fn load(&self) -> ConfigResult<Settings> {
        debug!("Loading settings from configuration sources");

        let figment = self.build_figment()?;
        let data = figment.extract::<HashMap<String, serde_json::Value>>()?;

        let mut settings = Settings::from_nested(data);
        settings.merge(self.overrides.clone());

        info!("Loaded {} settings", settings.len());
        Ok(settings)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        debug!("Building figment configuration with precedence order");

        let mut figment = Figment::new().merge(self.default_config());

        for path in &self.files {
            figment = figment.merge(self.load_config_file(path)?);
        }

        if self.environment {
            figment = figment.merge(self.load_env_vars());
        }

        Ok(figment)
    }

    fn default_config(&self) -> Figment {
        trace!("Loading default configuration values");
        let defaults = HashMap::<String, serde_json::Value>::new();
        Figment::new().merge(Serialized::defaults(defaults))
    }

    fn load_config_file(&self, path: &Path) -> ConfigResult<Figment> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let format = ConfigFormat::from_path(path)?;
        trace!("Loading config file: {} ({:?})", path.display(), format);

        Ok(match format {
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        })
    }

    /// Environment variables map to keys by lowercasing and turning `__` into `.`
    ///
    /// `METABOOT_METABOOT__ARCHIVE__SCANNER` becomes `metaboot.archive.scanner`.
    fn load_env_vars(&self) -> Figment {
        debug!("Loading environment variables with prefix {}", self.env_prefix);
        Figment::new().merge(
            Env::prefixed(&self.env_prefix)
                .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
        )
    }
}

impl Default for SettingsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("toml", Some(ConfigFormat::Toml))]
    #[case("YAML", Some(ConfigFormat::Yaml))]
    #[case("yml", Some(ConfigFormat::Yaml))]
    #[case("json", Some(ConfigFormat::Json))]
    #[case("ini", None)]
    fn test_format_from_extension(#[case] ext: &str, #[case] expected: Option<ConfigFormat>) {
        assert_eq!(ConfigFormat::from_extension(ext), expected);
    }

    #[test]
    fn test_unsupported_format_reports_path() {
        let err = ConfigFormat::from_path(Path::new("settings.ini")).unwrap_err();
        match err {
            ConfigError::UnsupportedFormat { path, format } => {
                assert_eq!(path, PathBuf::from("settings.ini"));
                assert_eq!(format, "ini");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let provider = SettingsProvider::new()
            .with_environment(false)
            .with_file("/definitely/not/here.toml");

        assert!(matches!(
            provider.load(),
            Err(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_overrides_without_other_sources() {
        let settings = SettingsProvider::new()
            .with_environment(false)
            .with_override("metaboot.archive.scanner", "fast")
            .load()
            .unwrap();

        assert_eq!(settings.len(), 1);
        assert_eq!(
            settings.get_string("metaboot.archive.scanner").as_deref(),
            Some("fast")
        );
    }
}
