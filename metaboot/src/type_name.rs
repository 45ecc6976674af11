//! Type identities

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identity of a type known to the metadata model
///
/// Cloning is cheap; the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Create a type name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The fully qualified name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment, e.g. `Money` for `com.example.Money`
    pub fn simple_name(&self) -> &str {
        self.0
            .rsplit(['.', ':'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(self.as_str())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
