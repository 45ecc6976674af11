//! Archive descriptor factories
//!
//! The scanning subsystem asks the factory how each archive location should
//! be read. Reading the archive itself happens elsewhere.

use crate::strategy::StrategyCapability;
use std::fmt;

/// How an archive location is to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// A directory tree on the local file system
    Exploded,
    /// A packaged archive file on the local file system
    JarFile,
    /// An entry addressed through the `jar:` scheme
    JarProtocol,
    /// Anything else, read as a stream
    JarStream,
}

/// Decides how archive locations are read
pub trait ArchiveDescriptorFactory: fmt::Debug + Send + Sync {
    /// Name of this factory, for diagnostics
    fn name(&self) -> &str;

    /// Classify an archive location such as `file:/app/classes/`
    fn descriptor_kind(&self, location: &str) -> ArchiveKind;
}

impl StrategyCapability for dyn ArchiveDescriptorFactory {
    const NAME: &'static str = "ArchiveDescriptorFactory";
}

/// Factory that classifies locations by scheme and file name
///
/// Paths ending in a separator or whose last segment has no extension are
/// treated as directories; every other local path as a packaged archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardArchiveDescriptorFactory;

impl StandardArchiveDescriptorFactory {
    /// Implementation name used for strategy selection
    pub const IMPLEMENTATION_NAME: &'static str =
        "metaboot::archive::StandardArchiveDescriptorFactory";

    /// Short name used for strategy selection
    pub const SHORT_NAME: &'static str = "standard";
}

impl ArchiveDescriptorFactory for StandardArchiveDescriptorFactory {
    fn name(&self) -> &str {
        Self::IMPLEMENTATION_NAME
    }

    fn descriptor_kind(&self, location: &str) -> ArchiveKind {
        if location.starts_with("jar:") {
            return ArchiveKind::JarProtocol;
        }

        let path = match location.strip_prefix("file:") {
            Some(path) => path,
            None if has_scheme(location) => return ArchiveKind::JarStream,
            None => location,
        };

        if path.ends_with('/') || path.ends_with('\\') {
            return ArchiveKind::Exploded;
        }

        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        if file_name.contains('.') {
            ArchiveKind::JarFile
        } else {
            ArchiveKind::Exploded
        }
    }
}

/// `scheme:` followed by something other than a Windows drive path
fn has_scheme(location: &str) -> bool {
    match location.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
