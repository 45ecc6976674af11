//! Bootstrap-phase context for building a persistence metadata model
//!
//! A metadata-building session owns exactly one [`BootstrapContext`]. The
//! context is created from a [`ServiceLocator`], reads the scan-related
//! settings once, collects attribute converters and the scan environment
//! while the session runs, and is released when the session ends.
//!
//! # Quick Start
//!
//! ```
//! use metaboot::{
//!     AttributeConverterInfo, BootstrapContext, IntrospectionContext,
//!     MetadataBuildingOptions, ScanEnvironment, StandardServiceRegistry,
//! };
//! use metaboot_config::keys;
//!
//! let registry = StandardServiceRegistry::builder()
//!     .apply_setting(keys::SCANNER_DISCOVERY, "class,hbm")
//!     .build()?;
//! let options = MetadataBuildingOptions::from_settings(registry.settings())?;
//!
//! let mut context = BootstrapContext::new(&registry, IntrospectionContext::new(), &options)?;
//! context.inject_scan_environment(ScanEnvironment::new().with_root("file:/app/classes/"));
//! context.add_attribute_converter_info(AttributeConverterInfo::new("com.example.MoneyConverter"))?;
//!
//! assert!(context.scan_options().is_some());
//! assert_eq!(context.attribute_converters().len(), 1);
//!
//! context.release();
//! assert!(context.scan_environment().is_none());
//! # Ok::<(), metaboot::BootstrapError>(())
//! ```
//!
//! # Settings
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `metaboot.archive.autodetection` | what scanning discovers (`class`, `hbm`, `true`, `false`) |
//! | `metaboot.archive.scanner` | scanner implementation, left uninterpreted |
//! | `metaboot.ejb.resource_scanner` | deprecated spelling of the scanner key |
//! | `metaboot.archive.interpreter` | archive descriptor factory, by name or instance |

/// Archive descriptor factories
pub mod archive;
/// Session-scoped class loading delegate
pub mod class_loader_access;
/// Class loaders and the class loader service
pub mod class_loading;
/// The bootstrap context
pub mod context;
/// Attribute converter descriptors and registry
pub mod converter;
/// Deprecation reporting
pub mod deprecation;
/// Error types and handling
pub mod error;
/// Subsystem contexts, including type introspection
pub mod introspection;
/// Metadata building options
pub mod options;
/// Scan options and scan environment
pub mod scan;
/// Service locator and standard service registry
pub mod service;
/// Strategy selection
pub mod strategy;
mod type_name;

pub use archive::{ArchiveDescriptorFactory, ArchiveKind, StandardArchiveDescriptorFactory};
pub use class_loader_access::ClassLoaderAccess;
pub use class_loading::{ClassLoader, ClassLoaderService, StandardClassLoaderService, TypeCatalog};
pub use context::BootstrapContext;
pub use converter::{AttributeConverterInfo, ConverterRegistry};
pub use deprecation::{
    Deprecation, DeprecationReporter, RecordingDeprecationReporter, TracingDeprecationReporter,
};
pub use error::{BootstrapError, BootstrapResult};
pub use introspection::{IntrospectionContext, ResolvedType, SubsystemContext};
pub use options::MetadataBuildingOptions;
pub use scan::{ScanEnvironment, ScanOptions, StandardScanOptions};
pub use service::{
    ConfigurationService, ServiceLocator, StandardServiceRegistry, StandardServiceRegistryBuilder,
};
pub use strategy::{StrategyCapability, StrategySelector};
pub use type_name::TypeName;
