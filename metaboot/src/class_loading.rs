//! Class loading services
//!
//! A class loader here is a catalog of type identities: loading a class
//! means confirming that a named type is known and obtaining its
//! [`TypeName`]. How loaders find their types is up to the implementation.

use crate::TypeName;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Resolves type names to type identities
pub trait ClassLoader: fmt::Debug + Send + Sync {
    /// Name of this loader, for diagnostics
    fn name(&self) -> &str;

    /// Load the named type, if this loader knows it
    fn load_class(&self, name: &str) -> Option<TypeName>;
}

/// Service that owns the class loaders of a registry
pub trait ClassLoaderService: fmt::Debug + Send + Sync {
    /// Load the named type from the application class loaders
    fn class_for_name(&self, name: &str) -> Option<TypeName>;

    /// Loader for types that must not be loaded permanently during bootstrap
    ///
    /// Returning `None` means no temporary loader is available.
    fn temp_class_loader(&self) -> Option<Arc<dyn ClassLoader>>;
}

/// Class loader backed by a fixed set of known types
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    name: String,
    types: HashSet<TypeName>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: HashSet::new(),
        }
    }

    /// Add a type to the catalog
    pub fn with_type(mut self, name: impl Into<TypeName>) -> Self {
        self.types.insert(name.into());
        self
    }

    /// Add several types to the catalog
    pub fn with_types<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Number of known types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ClassLoader for TypeCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_class(&self, name: &str) -> Option<TypeName> {
        self.types.get(name).cloned()
    }
}

/// Class loader service consulting an ordered list of loaders
#[derive(Debug, Clone, Default)]
pub struct StandardClassLoaderService {
    loaders: Vec<Arc<dyn ClassLoader>>,
    temp_class_loader: Option<Arc<dyn ClassLoader>>,
}

impl StandardClassLoaderService {
    /// Create a service with no loaders
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a loader; earlier loaders are consulted first
    pub fn with_loader(mut self, loader: impl ClassLoader + 'static) -> Self {
        self.loaders.push(Arc::new(loader));
        self
    }

    /// Provide the temporary class loader handed out during bootstrap
    pub fn with_temp_class_loader(mut self, loader: impl ClassLoader + 'static) -> Self {
        self.temp_class_loader = Some(Arc::new(loader));
        self
    }
}

impl ClassLoaderService for StandardClassLoaderService {
    fn class_for_name(&self, name: &str) -> Option<TypeName> {
        let found = self.loaders.iter().find_map(|loader| loader.load_class(name));
        trace!("class_for_name({}) -> {:?}", name, found);
        found
    }

    fn temp_class_loader(&self) -> Option<Arc<dyn ClassLoader>> {
        self.temp_class_loader.clone()
    }
}
