//! Attribute converter descriptors and their registry

use crate::{BootstrapError, BootstrapResult, TypeName};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::trace;

/// Describes a user-supplied attribute converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeConverterInfo {
    converter: TypeName,
    domain_type: Option<TypeName>,
    relational_type: Option<TypeName>,
    auto_apply: bool,
}

impl AttributeConverterInfo {
    /// Describe the converter implemented by `converter`
    pub fn new(converter: impl Into<TypeName>) -> Self {
        Self {
            converter: converter.into(),
            domain_type: None,
            relational_type: None,
            auto_apply: false,
        }
    }

    /// Set the attribute type the converter reads
    pub fn with_domain_type(mut self, domain_type: impl Into<TypeName>) -> Self {
        self.domain_type = Some(domain_type.into());
        self
    }

    /// Set the column type the converter writes
    pub fn with_relational_type(mut self, relational_type: impl Into<TypeName>) -> Self {
        self.relational_type = Some(relational_type.into());
        self
    }

    /// Apply the converter to every attribute of its domain type
    pub fn with_auto_apply(mut self, auto_apply: bool) -> Self {
        self.auto_apply = auto_apply;
        self
    }

    /// Identity of the converter
    pub fn converter(&self) -> &TypeName {
        &self.converter
    }

    /// Attribute type the converter reads
    pub fn domain_type(&self) -> Option<&TypeName> {
        self.domain_type.as_ref()
    }

    /// Column type the converter writes
    pub fn relational_type(&self) -> Option<&TypeName> {
        self.relational_type.as_ref()
    }

    /// Whether the converter applies automatically
    pub fn is_auto_apply(&self) -> bool {
        self.auto_apply
    }
}

/// One descriptor per converter identity
///
/// No storage is allocated until the first registration.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    converters: Option<HashMap<TypeName, AttributeConverterInfo>>,
}

impl ConverterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under `identity`
    ///
    /// Fails if `identity` is already registered; the existing descriptor
    /// is kept.
    pub fn put(&mut self, identity: TypeName, info: AttributeConverterInfo) -> BootstrapResult<()> {
        match self.converters.get_or_insert_with(HashMap::new).entry(identity) {
            Entry::Occupied(existing) => Err(BootstrapError::DuplicateConverter {
                converter: existing.key().clone(),
            }),
            Entry::Vacant(slot) => {
                trace!("Registered attribute converter {}", slot.key());
                slot.insert(info);
                Ok(())
            }
        }
    }

    /// Snapshot of the registered descriptors, in no particular order
    pub fn values(&self) -> Vec<AttributeConverterInfo> {
        self.converters
            .as_ref()
            .map(|converters| converters.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Look up the descriptor registered under `identity`
    pub fn get(&self, identity: &str) -> Option<&AttributeConverterInfo> {
        self.converters.as_ref()?.get(identity)
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.converters.as_ref().map_or(0, HashMap::len)
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether storage has been allocated
    pub fn is_allocated(&self) -> bool {
        self.converters.is_some()
    }
}
