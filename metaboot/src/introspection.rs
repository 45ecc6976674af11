//! Subsystem contexts owned by a bootstrap context
//!
//! A subsystem context holds per-session state for another part of the
//! metadata builder. The bootstrap context owns exactly one and releases it
//! together with itself.

use crate::TypeName;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Per-session state that must be torn down when the session ends
pub trait SubsystemContext: fmt::Debug {
    /// Drop all session state; calling this again must be harmless
    fn release(&mut self);

    /// Whether [`SubsystemContext::release`] has run
    fn is_released(&self) -> bool;
}

/// A type name broken down into its erased type and type arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Canonical spelling of the full type, e.g. `Map<K, V>`
    pub name: TypeName,
    /// The type with its arguments erased, e.g. `Map`
    pub erased: TypeName,
    /// Resolved type arguments, in declaration order
    pub type_arguments: Vec<ResolvedType>,
}

impl ResolvedType {
    /// Whether the type has type arguments
    pub fn is_generic(&self) -> bool {
        !self.type_arguments.is_empty()
    }
}

/// Type-introspection cache used while reading attribute types
///
/// Resolved types are cached by the name they were requested with. After
/// release the cache is gone and every resolution returns `None`.
#[derive(Debug)]
pub struct IntrospectionContext {
    resolved: Option<HashMap<String, Arc<ResolvedType>>>,
}

impl IntrospectionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self {
            resolved: Some(HashMap::new()),
        }
    }

    /// Resolve a type name such as `HashMap<String, Vec<u8>>`
    ///
    /// Returns `None` for malformed names, for names nested deeper than
    /// [`MAX_TYPE_NESTING`], and after release.
    pub fn resolve_type(&mut self, name: &str) -> Option<Arc<ResolvedType>> {
        let resolved = self.resolved.as_mut()?;
        if let Some(hit) = resolved.get(name) {
            trace!("Type cache hit for {}", name);
            return Some(Arc::clone(hit));
        }

        let parsed = Arc::new(parse_type_name(name)?);
        trace!("Resolved {} as {}", name, parsed.name);
        resolved.insert(name.to_string(), Arc::clone(&parsed));
        Some(parsed)
    }

    /// Number of cached resolutions
    pub fn cached_len(&self) -> usize {
        self.resolved.as_ref().map_or(0, HashMap::len)
    }
}

impl Default for IntrospectionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SubsystemContext for IntrospectionContext {
    fn release(&mut self) {
        if self.resolved.take().is_some() {
            debug!("Released type introspection context");
        }
    }

    fn is_released(&self) -> bool {
        self.resolved.is_none()
    }
}

/// Deepest type-argument nesting accepted by [`IntrospectionContext::resolve_type`]
pub const MAX_TYPE_NESTING: usize = 32;

fn parse_type_name(input: &str) -> Option<ResolvedType> {
    let (resolved, rest) = parse_type(input, 0)?;
    rest.trim().is_empty().then_some(resolved)
}

fn parse_type(input: &str, depth: usize) -> Option<(ResolvedType, &str)> {
    let input = input.trim_start();
    let end = input.find(['<', '>', ',']).unwrap_or(input.len());
    let base = input[..end].trim();
    if base.is_empty() {
        return None;
    }

    let mut rest = &input[end..];
    let mut type_arguments = Vec::new();
    if let Some(args) = rest.strip_prefix('<') {
        if depth >= MAX_TYPE_NESTING {
            trace!("Type nesting deeper than {} levels", MAX_TYPE_NESTING);
            return None;
        }
        rest = args;
        loop {
            let (argument, after) = parse_type(rest, depth + 1)?;
            type_arguments.push(argument);
            let after = after.trim_start();
            if let Some(next) = after.strip_prefix(',') {
                rest = next;
            } else if let Some(next) = after.strip_prefix('>') {
                rest = next;
                break;
            } else {
                return None;
            }
        }
    }

    let name = if type_arguments.is_empty() {
        base.to_string()
    } else {
        let arguments: Vec<&str> = type_arguments.iter().map(|a| a.name.as_str()).collect();
        format!("{}<{}>", base, arguments.join(", "))
    };

    Some((
        ResolvedType {
            name: TypeName::from(name),
            erased: TypeName::from(base),
            type_arguments,
        },
        rest,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_plain_type() {
        let mut context = IntrospectionContext::new();
        let resolved = context.resolve_type("com.example.Money").unwrap();

        assert_eq!(resolved.erased.as_str(), "com.example.Money");
        assert!(!resolved.is_generic());
    }

    #[test]
    fn test_resolves_nested_type_arguments() {
        let mut context = IntrospectionContext::new();
        let resolved = context.resolve_type("HashMap<String,Vec< u8 >>").unwrap();

        assert_eq!(resolved.name.as_str(), "HashMap<String, Vec<u8>>");
        assert_eq!(resolved.erased.as_str(), "HashMap");
        assert_eq!(resolved.type_arguments.len(), 2);
        assert_eq!(resolved.type_arguments[1].erased.as_str(), "Vec");
        assert_eq!(
            resolved.type_arguments[1].type_arguments[0].name.as_str(),
            "u8"
        );
    }

    #[test]
    fn test_malformed_names_do_not_resolve() {
        let mut context = IntrospectionContext::new();
        assert!(context.resolve_type("Vec<").is_none());
        assert!(context.resolve_type("Vec<u8>>").is_none());
        assert!(context.resolve_type("").is_none());
        assert!(context.resolve_type("Map<,>").is_none());
        assert_eq!(context.cached_len(), 0);
    }

    fn nested(levels: usize) -> String {
        format!("{}x{}", "A<".repeat(levels), ">".repeat(levels))
    }

    #[test]
    fn test_nesting_is_capped() {
        let mut context = IntrospectionContext::new();

        let deepest = context.resolve_type(&nested(MAX_TYPE_NESTING)).unwrap();
        assert_eq!(deepest.type_arguments.len(), 1);

        assert!(context.resolve_type(&nested(MAX_TYPE_NESTING + 1)).is_none());
        assert!(context.resolve_type(&nested(200_000)).is_none());
        assert_eq!(context.cached_len(), 1);
    }

    #[test]
    fn test_resolutions_are_cached() {
        let mut context = IntrospectionContext::new();
        let first = context.resolve_type("Option<i64>").unwrap();
        let second = context.resolve_type("Option<i64>").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(context.cached_len(), 1);
    }

    #[test]
    fn test_release_drops_cache() {
        let mut context = IntrospectionContext::new();
        context.resolve_type("Option<i64>");

        context.release();
        context.release();

        assert!(context.is_released());
        assert_eq!(context.cached_len(), 0);
        assert!(context.resolve_type("Option<i64>").is_none());
    }
}
