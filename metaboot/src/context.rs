//! The bootstrap context
//!
//! One [`BootstrapContext`] exists per metadata-building session. It is
//! created from a service locator, resolves the scan-related settings once,
//! collects state while the session runs, and is released when the session
//! ends.

use crate::archive::ArchiveDescriptorFactory;
use crate::class_loader_access::ClassLoaderAccess;
use crate::class_loading::ClassLoader;
use crate::converter::{AttributeConverterInfo, ConverterRegistry};
use crate::deprecation::{Deprecation, DeprecationReporter};
use crate::introspection::{IntrospectionContext, SubsystemContext};
use crate::options::MetadataBuildingOptions;
use crate::scan::{ScanEnvironment, ScanOptions, StandardScanOptions};
use crate::service::{ConfigurationService, ServiceLocator};
use crate::BootstrapResult;
use metaboot_config::{keys, SettingValue};
use std::sync::Arc;
use tracing::debug;

/// Session-scoped state gathered while building the metadata model
///
/// The service locator and building options are borrowed for the whole
/// session. The subsystem context and the class loader access are owned and
/// released together with the context, either by an explicit
/// [`release`](BootstrapContext::release) or on drop.
///
/// After release, the scan options, scan environment, scanner setting and
/// archive descriptor factory all read as `None`.
#[derive(Debug)]
pub struct BootstrapContext<'r, S: SubsystemContext = IntrospectionContext> {
    service_locator: &'r dyn ServiceLocator,
    subsystem_context: S,
    building_options: &'r MetadataBuildingOptions,
    converters: ConverterRegistry,
    class_loader_access: ClassLoaderAccess,

    scan_options: Option<StandardScanOptions>,
    scan_environment: Option<ScanEnvironment>,
    scanner_setting: Option<SettingValue>,
    archive_descriptor_factory: Option<Arc<dyn ArchiveDescriptorFactory>>,

    released: bool,
}

impl<'r, S: SubsystemContext> BootstrapContext<'r, S> {
    /// Create the context for a new session
    ///
    /// All settings are read here, once. An archive interpreter selector
    /// that matches no registered factory fails construction; the subsystem
    /// context is released before the error is returned.
    pub fn new(
        service_locator: &'r dyn ServiceLocator,
        mut subsystem_context: S,
        building_options: &'r MetadataBuildingOptions,
    ) -> BootstrapResult<Self> {
        let class_loader_access = ClassLoaderAccess::new(service_locator.class_loader_service());

        let strategy_selector = service_locator.strategy_selector();
        let config = service_locator.configuration_service();

        let discovery = config
            .setting(keys::SCANNER_DISCOVERY)
            .and_then(|value| value.to_text());
        let scan_options = StandardScanOptions::new(discovery.as_deref(), false);

        // The scan environment is injected once scanning starts
        let scanner_setting =
            resolve_scanner_setting(config, service_locator.deprecation_reporter());

        let archive_descriptor_factory = match strategy_selector
            .resolve_strategy::<dyn ArchiveDescriptorFactory>(
                config.setting(keys::SCANNER_ARCHIVE_INTERPRETER).as_ref(),
            ) {
            Ok(factory) => factory,
            Err(err) => {
                subsystem_context.release();
                return Err(err);
            }
        };

        debug!(
            "Created bootstrap context: scan options {:?}, scanner {:?}, archive descriptor factory {:?}",
            scan_options,
            scanner_setting,
            archive_descriptor_factory.as_ref().map(|f| f.name())
        );

        Ok(Self {
            service_locator,
            subsystem_context,
            building_options,
            converters: ConverterRegistry::new(),
            class_loader_access,
            scan_options: Some(scan_options),
            scan_environment: None,
            scanner_setting,
            archive_descriptor_factory,
            released: false,
        })
    }

    /// The service locator this context was created from
    pub fn service_locator(&self) -> &'r dyn ServiceLocator {
        self.service_locator
    }

    /// Options governing how the metadata model is built
    pub fn metadata_building_options(&self) -> &'r MetadataBuildingOptions {
        self.building_options
    }

    /// The temporary class loader, if one is available
    pub fn temp_class_loader(&self) -> Option<Arc<dyn ClassLoader>> {
        self.class_loader_access.temp_class_loader()
    }

    /// Class loading delegate for this session
    pub fn class_loader_access(&self) -> &ClassLoaderAccess {
        &self.class_loader_access
    }

    /// Mutable class loading delegate, used to inject a temporary class loader
    pub fn class_loader_access_mut(&mut self) -> &mut ClassLoaderAccess {
        &mut self.class_loader_access
    }

    /// The owned subsystem context
    pub fn subsystem_context(&self) -> &S {
        &self.subsystem_context
    }

    /// Mutable access to the owned subsystem context
    pub fn subsystem_context_mut(&mut self) -> &mut S {
        &mut self.subsystem_context
    }

    /// Archive descriptor factory resolved from configuration
    pub fn archive_descriptor_factory(&self) -> Option<&dyn ArchiveDescriptorFactory> {
        self.archive_descriptor_factory.as_deref()
    }

    /// Scan options resolved from configuration
    pub fn scan_options(&self) -> Option<&dyn ScanOptions> {
        self.scan_options
            .as_ref()
            .map(|options| options as &dyn ScanOptions)
    }

    /// The injected scan environment
    pub fn scan_environment(&self) -> Option<&ScanEnvironment> {
        self.scan_environment.as_ref()
    }

    /// The configured scanner, left uninterpreted for the scanning subsystem
    pub fn scanner(&self) -> Option<&SettingValue> {
        self.scanner_setting.as_ref()
    }

    /// Snapshot of the registered attribute converters, in no particular order
    pub fn attribute_converters(&self) -> Vec<AttributeConverterInfo> {
        self.converters.values()
    }

    /// Register an attribute converter
    ///
    /// Registering the same converter type twice is a programming error: the
    /// second registration fails with
    /// [`BootstrapError::DuplicateConverter`](crate::BootstrapError::DuplicateConverter)
    /// and the first one stays in place.
    pub fn add_attribute_converter_info(
        &mut self,
        info: AttributeConverterInfo,
    ) -> BootstrapResult<()> {
        let identity = info.converter().clone();
        self.converters.put(identity, info)
    }

    /// Set the scan environment, replacing any earlier one
    ///
    /// Ignored once the context has been released.
    pub fn inject_scan_environment(&mut self, scan_environment: ScanEnvironment) {
        if self.released {
            debug!("Ignoring ScanEnvironment injected into released BootstrapContext");
            return;
        }
        debug!(
            "Injecting ScanEnvironment [{:?}] into BootstrapContext; was [{:?}]",
            scan_environment, self.scan_environment
        );
        self.scan_environment = Some(scan_environment);
    }

    /// End the session
    ///
    /// Releases the subsystem context and the class loader access and clears
    /// the resolved settings. Only the first call has any effect.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.subsystem_context.release();
        self.class_loader_access.release();

        self.scan_options = None;
        self.scan_environment = None;
        self.scanner_setting = None;
        self.archive_descriptor_factory = None;

        debug!("Released BootstrapContext");
    }

    /// Whether [`release`](BootstrapContext::release) has run
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<'r, S: SubsystemContext> Drop for BootstrapContext<'r, S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// The primary scanner key wins; the deprecated key is consulted only when
/// the primary is unset, and using it is reported.
fn resolve_scanner_setting(
    config: &dyn ConfigurationService,
    reporter: &dyn DeprecationReporter,
) -> Option<SettingValue> {
    if let Some(scanner) = config.setting(keys::SCANNER) {
        return Some(scanner);
    }

    let scanner = config.setting(keys::SCANNER_DEPRECATED)?;
    reporter.report(Deprecation::ScannerSetting {
        deprecated_key: keys::SCANNER_DEPRECATED,
        replacement_key: keys::SCANNER,
    });
    Some(scanner)
}
