//! Run context shared with stages
//!
//! This module provides the context a driver hands to every stage it calls,
//! carrying the run name and the encoding token forwarded to transform hooks.

/// Encoding token used when the driver does not specify one.
pub const DEFAULT_ENCODING: &str = "utf8";

/// Shared context for a pipeline run
///
/// The encoding is opaque to stages: it is forwarded unchanged to the hooks.
#[derive(Debug, Clone)]
pub struct StageContext {
    /// Name of the run, used in logs
    pub name: String,
    /// Encoding token forwarded to transform hooks
    pub encoding: String,
}

impl StageContext {
    /// Create a new StageContext with the default encoding
    pub fn new() -> Self {
        Self {
            name: "DefaultRun".to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    pub fn arc_new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::new())
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }
}

impl Default for StageContext {
    fn default() -> Self {
        Self::new()
    }
}
