//! Service locator consulted while bootstrapping
//!
//! The locator hands out the services a bootstrap context needs at
//! construction time. It is borrowed by the context, never owned.

use crate::class_loading::{ClassLoaderService, StandardClassLoaderService};
use crate::deprecation::{DeprecationReporter, TracingDeprecationReporter};
use crate::strategy::StrategySelector;
use crate::BootstrapResult;
use metaboot_config::{SettingValue, Settings, SettingsProvider};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// Plain key/value lookup of configuration settings
pub trait ConfigurationService: fmt::Debug {
    /// Look up a setting; `None` when the key is unset or `null`
    fn setting(&self, key: &str) -> Option<SettingValue>;
}

impl ConfigurationService for Settings {
    fn setting(&self, key: &str) -> Option<SettingValue> {
        let value = self.get(key).filter(|value| !value.is_null()).cloned();
        trace!("setting({}) -> {:?}", key, value);
        value
    }
}

/// Capabilities a bootstrap context obtains from its service registry
pub trait ServiceLocator: fmt::Debug {
    /// Service providing class loaders
    fn class_loader_service(&self) -> Arc<dyn ClassLoaderService>;

    /// Strategy selection service
    fn strategy_selector(&self) -> &StrategySelector;

    /// Configuration values service
    fn configuration_service(&self) -> &dyn ConfigurationService;

    /// Receiver for deprecation notices
    fn deprecation_reporter(&self) -> &dyn DeprecationReporter;
}

/// Standard service registry built from settings and a set of services
#[derive(Debug)]
pub struct StandardServiceRegistry {
    settings: Settings,
    class_loader_service: Arc<dyn ClassLoaderService>,
    strategy_selector: StrategySelector,
    deprecation_reporter: Arc<dyn DeprecationReporter>,
}

impl StandardServiceRegistry {
    /// Start building a registry
    pub fn builder() -> StandardServiceRegistryBuilder {
        StandardServiceRegistryBuilder::new()
    }

    /// The resolved settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl ServiceLocator for StandardServiceRegistry {
    fn class_loader_service(&self) -> Arc<dyn ClassLoaderService> {
        Arc::clone(&self.class_loader_service)
    }

    fn strategy_selector(&self) -> &StrategySelector {
        &self.strategy_selector
    }

    fn configuration_service(&self) -> &dyn ConfigurationService {
        &self.settings
    }

    fn deprecation_reporter(&self) -> &dyn DeprecationReporter {
        self.deprecation_reporter.as_ref()
    }
}

/// Builder for [`StandardServiceRegistry`]
///
/// Settings applied here override those from files and the environment.
/// The environment is not read unless [`with_environment`] enables it.
///
/// [`with_environment`]: StandardServiceRegistryBuilder::with_environment
pub struct StandardServiceRegistryBuilder {
    files: Vec<PathBuf>,
    environment: bool,
    settings: Settings,
    class_loader_service: Option<Arc<dyn ClassLoaderService>>,
    strategy_selector: Option<StrategySelector>,
    deprecation_reporter: Option<Arc<dyn DeprecationReporter>>,
}

impl StandardServiceRegistryBuilder {
    /// Create a builder with no settings and standard services
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            environment: false,
            settings: Settings::new(),
            class_loader_service: None,
            strategy_selector: None,
            deprecation_reporter: None,
        }
    }

    /// Apply a single setting
    pub fn apply_setting(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.settings.set(key, value);
        self
    }

    /// Apply a setting whose value is an object, such as a strategy instance
    pub fn apply_object_setting<T>(mut self, key: impl Into<String>, object: T) -> Self
    where
        T: std::any::Any + Send + Sync,
    {
        self.settings.set_object(key, object);
        self
    }

    /// Apply several settings at once
    pub fn apply_settings(mut self, settings: Settings) -> Self {
        self.settings.merge(settings);
        self
    }

    /// Load settings from a configuration file; later files take precedence
    pub fn load_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Read settings from `METABOOT_` environment variables
    pub fn with_environment(mut self, enabled: bool) -> Self {
        self.environment = enabled;
        self
    }

    /// Replace the class loader service
    pub fn class_loader_service(mut self, service: impl ClassLoaderService + 'static) -> Self {
        self.class_loader_service = Some(Arc::new(service));
        self
    }

    /// Replace the strategy selector
    pub fn strategy_selector(mut self, selector: StrategySelector) -> Self {
        self.strategy_selector = Some(selector);
        self
    }

    /// Replace the deprecation reporter
    pub fn deprecation_reporter(mut self, reporter: Arc<dyn DeprecationReporter>) -> Self {
        self.deprecation_reporter = Some(reporter);
        self
    }

    /// Resolve all settings and assemble the registry
    pub fn build(self) -> BootstrapResult<StandardServiceRegistry> {
        let provider = self
            .files
            .iter()
            .fold(SettingsProvider::new(), |provider, path| provider.with_file(path))
            .with_environment(self.environment)
            .with_overrides(self.settings);
        let settings = provider.load()?;

        debug!("Built service registry with {} settings", settings.len());

        Ok(StandardServiceRegistry {
            settings,
            class_loader_service: self
                .class_loader_service
                .unwrap_or_else(|| Arc::new(StandardClassLoaderService::new())),
            strategy_selector: self.strategy_selector.unwrap_or_else(StrategySelector::standard),
            deprecation_reporter: self
                .deprecation_reporter
                .unwrap_or_else(|| Arc::new(TracingDeprecationReporter)),
        })
    }
}

impl Default for StandardServiceRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
