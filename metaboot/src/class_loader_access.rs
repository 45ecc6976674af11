//! Session-scoped access to class loading

use crate::class_loading::{ClassLoader, ClassLoaderService};
use crate::TypeName;
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::debug;

/// Name prefixes that are always loaded through the class loader service
const SAFE_PREFIXES: &[&str] = &["std::", "core::", "alloc::", "metaboot::"];

/// Class loading delegate owned by a bootstrap context
///
/// The temporary class loader is resolved from the service on first use
/// and cached until [`ClassLoaderAccess::release`].
#[derive(Debug)]
pub struct ClassLoaderAccess {
    service: Arc<dyn ClassLoaderService>,
    temp_class_loader: OnceCell<Option<Arc<dyn ClassLoader>>>,
    released: bool,
}

impl ClassLoaderAccess {
    /// Wrap a class loader service
    pub fn new(service: Arc<dyn ClassLoaderService>) -> Self {
        Self {
            service,
            temp_class_loader: OnceCell::new(),
            released: false,
        }
    }

    /// The temporary class loader, resolved lazily
    ///
    /// Repeated calls return the same loader. Always `None` after release.
    pub fn temp_class_loader(&self) -> Option<Arc<dyn ClassLoader>> {
        if self.released {
            return None;
        }
        self.temp_class_loader
            .get_or_init(|| {
                let loader = self.service.temp_class_loader();
                debug!(
                    "Resolved temporary class loader: {:?}",
                    loader.as_ref().map(|l| l.name())
                );
                loader
            })
            .clone()
    }

    /// Replace the temporary class loader; ignored after release
    pub fn inject_temp_class_loader(&mut self, loader: Arc<dyn ClassLoader>) {
        if self.released {
            debug!("Ignoring temporary class loader injected after release");
            return;
        }
        debug!("Injecting temporary class loader [{}]", loader.name());
        self.temp_class_loader = OnceCell::from(Some(loader));
    }

    /// Load a type for use while building metadata
    ///
    /// Safe names and every lookup without a temporary loader go to the
    /// service; the rest go to the temporary loader.
    pub fn class_for_name(&self, name: &str) -> Option<TypeName> {
        if is_safe_name(name) {
            return self.service.class_for_name(name);
        }
        match self.temp_class_loader() {
            Some(loader) => loader.load_class(name),
            None => self.service.class_for_name(name),
        }
    }

    /// Drop the cached temporary loader; repeated calls do nothing
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.temp_class_loader.take();
        self.released = true;
        debug!("Released class loader access");
    }

    /// Whether [`ClassLoaderAccess::release`] has run
    pub fn is_released(&self) -> bool {
        self.released
    }
}

fn is_safe_name(name: &str) -> bool {
    SAFE_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_loading::{StandardClassLoaderService, TypeCatalog};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingService {
        temp_lookups: AtomicUsize,
    }

    impl ClassLoaderService for CountingService {
        fn class_for_name(&self, name: &str) -> Option<TypeName> {
            Some(TypeName::from(format!("service:{name}").as_str()))
        }

        fn temp_class_loader(&self) -> Option<Arc<dyn ClassLoader>> {
            self.temp_lookups.fetch_add(1, Ordering::SeqCst);
            Some(Arc::new(TypeCatalog::new("temp").with_type("app.Entity")))
        }
    }

    #[test]
    fn test_temp_class_loader_is_resolved_once() {
        let service = Arc::new(CountingService::default());
        let access = ClassLoaderAccess::new(service.clone());

        let first = access.temp_class_loader().unwrap();
        let second = access.temp_class_loader().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.temp_lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_safe_names_bypass_temp_loader() {
        let access = ClassLoaderAccess::new(Arc::new(CountingService::default()));

        assert_eq!(
            access.class_for_name("std::string::String"),
            Some(TypeName::from("service:std::string::String"))
        );
        assert_eq!(
            access.class_for_name("app.Entity"),
            Some(TypeName::from("app.Entity"))
        );
        assert_eq!(access.class_for_name("app.Missing"), None);
    }

    #[test]
    fn test_without_temp_loader_uses_service() {
        let service = StandardClassLoaderService::new()
            .with_loader(TypeCatalog::new("app").with_type("app.Entity"));
        let access = ClassLoaderAccess::new(Arc::new(service));

        assert!(access.temp_class_loader().is_none());
        assert_eq!(
            access.class_for_name("app.Entity"),
            Some(TypeName::from("app.Entity"))
        );
    }

    #[test]
    fn test_injected_loader_replaces_resolved_loader() {
        let mut access = ClassLoaderAccess::new(Arc::new(CountingService::default()));
        let _ = access.temp_class_loader();

        access.inject_temp_class_loader(Arc::new(
            TypeCatalog::new("injected").with_type("app.Other"),
        ));

        let loader = access.temp_class_loader().unwrap();
        assert_eq!(loader.name(), "injected");
        assert_eq!(access.class_for_name("app.Entity"), None);
    }

    #[test]
    fn test_release_invalidates_cache_and_is_idempotent() {
        let mut access = ClassLoaderAccess::new(Arc::new(CountingService::default()));
        assert!(access.temp_class_loader().is_some());

        access.release();
        access.release();

        assert!(access.is_released());
        assert!(access.temp_class_loader().is_none());
        assert_eq!(
            access.class_for_name("app.Entity"),
            Some(TypeName::from("service:app.Entity"))
        );

        access.inject_temp_class_loader(Arc::new(TypeCatalog::new("late")));
        assert!(access.temp_class_loader().is_none());
    }
}
