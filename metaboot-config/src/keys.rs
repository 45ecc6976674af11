//! Well-known setting keys consulted while bootstrapping the metadata model
//!
//! Keys are flat dotted names. Configuration files may spell them either as
//! dotted keys or as nested tables; both end up under the same flat key.

/// Controls which artifacts archive scanning discovers (`class`, `hbm`, ...)
pub const SCANNER_DISCOVERY: &str = "metaboot.archive.autodetection";

/// Selects the scanner implementation used by the scanning subsystem
pub const SCANNER: &str = "metaboot.archive.scanner";

/// Legacy spelling of [`SCANNER`], consulted only when [`SCANNER`] is unset
pub const SCANNER_DEPRECATED: &str = "metaboot.ejb.resource_scanner";

/// Names the archive descriptor factory, by short name or implementation name
pub const SCANNER_ARCHIVE_INTERPRETER: &str = "metaboot.archive.interpreter";

/// Default catalog applied to unqualified table names
pub const DEFAULT_CATALOG: &str = "metaboot.default_catalog";

/// Default schema applied to unqualified table names
pub const DEFAULT_SCHEMA: &str = "metaboot.default_schema";

/// Strategy used to derive logical names that were not given explicitly
pub const IMPLICIT_NAMING_STRATEGY: &str = "metaboot.implicit_naming_strategy";

/// Strategy used to map logical names to physical database names
pub const PHYSICAL_NAMING_STRATEGY: &str = "metaboot.physical_naming_strategy";

/// Map character columns to their nationalized variants
pub const USE_NATIONALIZED_CHARACTER_DATA: &str = "metaboot.use_nationalized_character_data";

/// Apply converters flagged as auto-apply to every matching attribute
pub const AUTO_APPLY_CONVERTERS: &str = "metaboot.auto_apply_converters";

/// Deprecated keys paired with the key that replaces them
pub const DEPRECATED_KEYS: &[(&str, &str)] = &[(SCANNER_DEPRECATED, SCANNER)];

/// Look up the replacement for a deprecated key
pub fn replacement_for(deprecated: &str) -> Option<&'static str> {
    DEPRECATED_KEYS
        .iter()
        .find(|(old, _)| *old == deprecated)
        .map(|(_, new)| *new)
}
