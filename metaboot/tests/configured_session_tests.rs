//! Sessions driven by configuration files and environment variables

use metaboot::{
    BootstrapContext, IntrospectionContext, MetadataBuildingOptions, RecordingDeprecationReporter,
    StandardArchiveDescriptorFactory, StandardServiceRegistry,
};
use metaboot_config::keys;
use serial_test::serial;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
#[serial]
fn test_session_from_configuration_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metaboot.yaml");
    fs::write(
        &path,
        r#"
metaboot:
  default_schema: billing
  auto_apply_converters: false
  archive:
    autodetection: hbm
    interpreter: standard
  ejb:
    resource_scanner: legacy-scanner
"#,
    )
    .unwrap();

    let reporter = Arc::new(RecordingDeprecationReporter::new());
    let registry = StandardServiceRegistry::builder()
        .load_file(&path)
        .deprecation_reporter(reporter.clone())
        .build()
        .unwrap();
    let options = MetadataBuildingOptions::from_settings(registry.settings()).unwrap();

    let context = BootstrapContext::new(&registry, IntrospectionContext::new(), &options).unwrap();

    let scan_options = context.scan_options().unwrap();
    assert!(scan_options.can_detect_mapping_files());
    assert!(!scan_options.can_detect_unlisted_classes_in_root());
    assert_eq!(
        context.scanner().and_then(|s| s.as_str()),
        Some("legacy-scanner")
    );
    assert_eq!(reporter.len(), 1);
    assert_eq!(
        context.metadata_building_options().default_schema.as_deref(),
        Some("billing")
    );
    assert!(!context.metadata_building_options().auto_apply_converters);
}

#[test]
#[serial]
fn test_environment_scanner_overrides_deprecated_file_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metaboot.toml");
    fs::write(&path, "[metaboot.ejb]\nresource_scanner = \"legacy\"\n").unwrap();

    let reporter = Arc::new(RecordingDeprecationReporter::new());
    std::env::set_var("METABOOT_METABOOT__ARCHIVE__SCANNER", "from-env");
    let built = StandardServiceRegistry::builder()
        .load_file(&path)
        .with_environment(true)
        .deprecation_reporter(reporter.clone())
        .build();
    std::env::remove_var("METABOOT_METABOOT__ARCHIVE__SCANNER");

    let registry = built.unwrap();
    let options = MetadataBuildingOptions::default();
    let context = BootstrapContext::new(&registry, IntrospectionContext::new(), &options).unwrap();

    assert_eq!(
        context.scanner().and_then(|s| s.as_str()),
        Some("from-env")
    );
    assert!(reporter.is_empty());
    assert_eq!(
        registry.settings().get_string(keys::SCANNER_DEPRECATED).as_deref(),
        Some("legacy")
    );
}

#[test]
#[serial]
fn test_null_values_in_file_read_as_unset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metaboot.json");
    fs::write(
        &path,
        r#"{
  "metaboot": {
    "archive": { "scanner": null, "interpreter": null },
    "ejb": { "resource_scanner": "legacy-scanner" }
  }
}"#,
    )
    .unwrap();

    let reporter = Arc::new(RecordingDeprecationReporter::new());
    let registry = StandardServiceRegistry::builder()
        .load_file(&path)
        .deprecation_reporter(reporter.clone())
        .build()
        .unwrap();
    let options = MetadataBuildingOptions::default();

    let context = BootstrapContext::new(&registry, IntrospectionContext::new(), &options).unwrap();

    assert_eq!(
        context.scanner().and_then(|s| s.as_str()),
        Some("legacy-scanner")
    );
    assert_eq!(reporter.len(), 1);
    assert_eq!(
        context.archive_descriptor_factory().map(|f| f.name()),
        Some(StandardArchiveDescriptorFactory::IMPLEMENTATION_NAME)
    );
}

#[test]
#[serial]
fn test_null_deprecated_scanner_in_file_is_not_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metaboot.yaml");
    fs::write(&path, "metaboot:\n  ejb:\n    resource_scanner: ~\n").unwrap();

    let reporter = Arc::new(RecordingDeprecationReporter::new());
    let registry = StandardServiceRegistry::builder()
        .load_file(&path)
        .deprecation_reporter(reporter.clone())
        .build()
        .unwrap();
    let options = MetadataBuildingOptions::default();

    let context = BootstrapContext::new(&registry, IntrospectionContext::new(), &options).unwrap();

    assert!(context.scanner().is_none());
    assert!(reporter.is_empty());
}

#[test]
#[serial]
fn test_dotted_and_nested_spellings_load_the_same_way_every_time() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metaboot.toml");
    fs::write(
        &path,
        "\"metaboot.archive.scanner\" = \"dotted\"\n\n[metaboot.archive]\nscanner = \"nested\"\n",
    )
    .unwrap();

    for _ in 0..16 {
        let registry = StandardServiceRegistry::builder()
            .load_file(&path)
            .build()
            .unwrap();
        assert_eq!(
            registry.settings().get_string(keys::SCANNER).as_deref(),
            Some("dotted")
        );
    }
}
