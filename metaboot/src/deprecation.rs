//! Deprecation reporting

use std::fmt;
use std::sync::Mutex;
use tracing::warn;

/// A deprecated usage detected while bootstrapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deprecation {
    /// A scanner was configured through the legacy setting key
    ScannerSetting {
        deprecated_key: &'static str,
        replacement_key: &'static str,
    },
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deprecation::ScannerSetting {
                deprecated_key,
                replacement_key,
            } => write!(
                f,
                "Found usage of deprecated setting for specifying Scanner [{deprecated_key}]; use [{replacement_key}] instead"
            ),
        }
    }
}

/// Receives deprecation notices
pub trait DeprecationReporter: fmt::Debug + Send + Sync {
    /// Report one deprecated usage
    fn report(&self, deprecation: Deprecation);
}

/// Reporter that emits each notice as a `tracing` warning
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDeprecationReporter;

impl DeprecationReporter for TracingDeprecationReporter {
    fn report(&self, deprecation: Deprecation) {
        warn!(target: "metaboot::deprecation", "{}", deprecation);
    }
}

/// Reporter that keeps every notice for later inspection
#[derive(Debug, Default)]
pub struct RecordingDeprecationReporter {
    notices: Mutex<Vec<Deprecation>>,
}

impl RecordingDeprecationReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices recorded so far, oldest first
    pub fn notices(&self) -> Vec<Deprecation> {
        match self.notices.lock() {
            Ok(notices) => notices.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of notices recorded so far
    pub fn len(&self) -> usize {
        self.notices().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeprecationReporter for RecordingDeprecationReporter {
    fn report(&self, deprecation: Deprecation) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(deprecation),
            Err(poisoned) => poisoned.into_inner().push(deprecation),
        }
    }
}
