//! Strategy selection
//!
//! Maps a configured selector to a registered implementation of a
//! capability. A capability is a trait-object type marked with
//! [`StrategyCapability`]; implementations register under their
//! implementation name and any number of short names.

use crate::archive::{ArchiveDescriptorFactory, StandardArchiveDescriptorFactory};
use crate::{BootstrapError, BootstrapResult};
use metaboot_config::SettingValue;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Marker for types that can be selected as strategies
pub trait StrategyCapability: 'static {
    /// Capability name used in diagnostics
    const NAME: &'static str;
}

type Constructor<T> = Arc<dyn Fn() -> Arc<T> + Send + Sync>;

struct Registrations<T: ?Sized> {
    by_name: HashMap<String, Constructor<T>>,
    implementation_names: Vec<String>,
    default: Option<Constructor<T>>,
}

impl<T: ?Sized> Registrations<T> {
    fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            implementation_names: Vec::new(),
            default: None,
        }
    }
}

/// Registry of strategy implementations, keyed by capability
#[derive(Default)]
pub struct StrategySelector {
    capabilities: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl StrategySelector {
    /// Create a selector with nothing registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector with the standard implementations registered
    ///
    /// [`StandardArchiveDescriptorFactory`] is registered as the default
    /// archive descriptor factory.
    pub fn standard() -> Self {
        let mut selector = Self::new();
        selector.register_default_strategy::<dyn ArchiveDescriptorFactory, _>(
            StandardArchiveDescriptorFactory::IMPLEMENTATION_NAME,
            &[StandardArchiveDescriptorFactory::SHORT_NAME],
            || Arc::new(StandardArchiveDescriptorFactory),
        );
        selector
    }

    /// Register an implementation under its implementation name and short names
    ///
    /// A later registration under an existing name replaces the earlier one.
    pub fn register_strategy<T, F>(
        &mut self,
        implementation_name: &str,
        short_names: &[&str],
        constructor: F,
    ) where
        T: ?Sized + StrategyCapability + Send + Sync,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.register::<T>(implementation_name, short_names, Arc::new(constructor), false);
    }

    /// Register an implementation and make it the capability's default
    pub fn register_default_strategy<T, F>(
        &mut self,
        implementation_name: &str,
        short_names: &[&str],
        constructor: F,
    ) where
        T: ?Sized + StrategyCapability + Send + Sync,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.register::<T>(implementation_name, short_names, Arc::new(constructor), true);
    }

    fn register<T>(
        &mut self,
        implementation_name: &str,
        short_names: &[&str],
        constructor: Constructor<T>,
        is_default: bool,
    ) where
        T: ?Sized + StrategyCapability + Send + Sync,
    {
        debug!(
            "Registering {} strategy [{}] with short names {:?}",
            T::NAME,
            implementation_name,
            short_names
        );
        let entry = self
            .capabilities
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Registrations::<T>::new()) as Box<dyn Any + Send + Sync>);
        let Some(registrations) = entry.downcast_mut::<Registrations<T>>() else {
            return;
        };

        registrations
            .by_name
            .insert(implementation_name.to_string(), Arc::clone(&constructor));
        for short_name in short_names {
            registrations
                .by_name
                .insert(short_name.to_string(), Arc::clone(&constructor));
        }
        if !registrations
            .implementation_names
            .iter()
            .any(|name| name == implementation_name)
        {
            registrations
                .implementation_names
                .push(implementation_name.to_string());
        }
        if is_default {
            registrations.default = Some(constructor);
        }
    }

    fn registrations<T>(&self) -> Option<&Registrations<T>>
    where
        T: ?Sized + StrategyCapability + Send + Sync,
    {
        self.capabilities
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Registrations<T>>())
    }

    /// Implementation names registered for a capability, in registration order
    pub fn registered_strategies<T>(&self) -> Vec<String>
    where
        T: ?Sized + StrategyCapability + Send + Sync,
    {
        self.registrations::<T>()
            .map(|r| r.implementation_names.clone())
            .unwrap_or_default()
    }

    /// Resolve a selector to an implementation
    ///
    /// - no selector, `null`, or a blank string: the registered default, if any
    /// - a string: the implementation registered under that name
    /// - an object holding an `Arc<T>`: that instance
    ///
    /// Any other selector, or a name nobody registered, is an error.
    pub fn resolve_strategy<T>(
        &self,
        selector: Option<&SettingValue>,
    ) -> BootstrapResult<Option<Arc<T>>>
    where
        T: ?Sized + StrategyCapability + Send + Sync,
    {
        let registrations = self.registrations::<T>();

        let selector = match selector {
            Some(value) if value.is_null() => None,
            Some(value) if value.as_str().is_some_and(|s| s.trim().is_empty()) => None,
            other => other,
        };

        let Some(selector) = selector else {
            trace!("No {} selector given, using default", T::NAME);
            return Ok(registrations
                .and_then(|r| r.default.as_ref())
                .map(|constructor| constructor()));
        };

        if let Some(instance) = selector.downcast_ref::<Arc<T>>() {
            trace!("Using {} instance supplied in settings", T::NAME);
            return Ok(Some(Arc::clone(instance)));
        }

        let constructor = selector
            .as_str()
            .map(str::trim)
            .and_then(|name| registrations.and_then(|r| r.by_name.get(name)));

        match constructor {
            Some(constructor) => {
                debug!("Resolved {} strategy from [{}]", T::NAME, selector.describe());
                Ok(Some(constructor()))
            }
            None => Err(BootstrapError::UnknownStrategy {
                capability: T::NAME,
                selector: selector.describe(),
            }),
        }
    }
}

impl fmt::Debug for StrategySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategySelector")
            .field("capabilities", &self.capabilities.len())
            .finish()
    }
}
