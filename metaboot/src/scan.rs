//! Scan options and scan environment
//!
//! Options say what archive scanning should discover; the environment says
//! where to look. Options come from configuration when the bootstrap
//! context is created. The environment is only known once scanning starts
//! and is injected later.

use crate::TypeName;

/// What archive scanning should discover
pub trait ScanOptions: std::fmt::Debug {
    /// Detect annotated classes in the root archive
    fn can_detect_unlisted_classes_in_root(&self) -> bool;

    /// Detect annotated classes in non-root archives
    fn can_detect_unlisted_classes_in_non_root(&self) -> bool;

    /// Detect mapping files
    fn can_detect_mapping_files(&self) -> bool;
}

/// Scan options derived from the discovery setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardScanOptions {
    detect_classes_in_root: bool,
    detect_classes_in_non_root: bool,
    detect_mapping_files: bool,
}

impl StandardScanOptions {
    /// Build options from the discovery setting
    ///
    /// Without a setting, mapping files and non-root classes are detected and
    /// root classes are detected unless `exclude_unlisted_classes` is set.
    /// With a setting, tokens separated by commas or whitespace enable
    /// detection: `class` for classes everywhere, `hbm` for mapping files,
    /// `true` or `all` for both. `false` and `none` enable nothing.
    pub fn new(discovery: Option<&str>, exclude_unlisted_classes: bool) -> Self {
        let Some(discovery) = discovery else {
            return Self {
                detect_classes_in_root: !exclude_unlisted_classes,
                detect_classes_in_non_root: true,
                detect_mapping_files: true,
            };
        };

        let mut classes = false;
        let mut mapping_files = false;
        for token in discovery
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            match token.to_lowercase().as_str() {
                "class" => classes = true,
                "hbm" => mapping_files = true,
                "true" | "all" => {
                    classes = true;
                    mapping_files = true;
                }
                _ => {}
            }
        }

        Self {
            detect_classes_in_root: classes,
            detect_classes_in_non_root: classes,
            detect_mapping_files: mapping_files,
        }
    }

    /// True if any kind of discovery is enabled
    pub fn is_discovery_enabled(&self) -> bool {
        self.detect_classes_in_root || self.detect_classes_in_non_root || self.detect_mapping_files
    }
}

impl ScanOptions for StandardScanOptions {
    fn can_detect_unlisted_classes_in_root(&self) -> bool {
        self.detect_classes_in_root
    }

    fn can_detect_unlisted_classes_in_non_root(&self) -> bool {
        self.detect_classes_in_non_root
    }

    fn can_detect_mapping_files(&self) -> bool {
        self.detect_mapping_files
    }
}

/// Where archive scanning should look
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanEnvironment {
    root: Option<String>,
    non_root: Vec<String>,
    listed_classes: Vec<TypeName>,
    listed_mapping_files: Vec<String>,
}

impl ScanEnvironment {
    /// Create an environment with nothing to scan
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root archive location
    pub fn with_root(mut self, location: impl Into<String>) -> Self {
        self.root = Some(location.into());
        self
    }

    /// Add a non-root archive location
    pub fn with_non_root(mut self, location: impl Into<String>) -> Self {
        self.non_root.push(location.into());
        self
    }

    /// Add an explicitly listed class
    pub fn with_listed_class(mut self, class: impl Into<TypeName>) -> Self {
        self.listed_classes.push(class.into());
        self
    }

    /// Add an explicitly listed mapping file
    pub fn with_listed_mapping_file(mut self, file: impl Into<String>) -> Self {
        self.listed_mapping_files.push(file.into());
        self
    }

    /// Root archive location
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Non-root archive locations
    pub fn non_root(&self) -> &[String] {
        &self.non_root
    }

    /// Explicitly listed classes
    pub fn listed_classes(&self) -> &[TypeName] {
        &self.listed_classes
    }

    /// Explicitly listed mapping files
    pub fn listed_mapping_files(&self) -> &[String] {
        &self.listed_mapping_files
    }
}
