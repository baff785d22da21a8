//! Error types surfaced by a stage.
//!
//! Hooks fail by returning a [`HookError`], the value they "raise". The stage
//! never lets it escape as-is: it is normalized into a [`PluginError`] tagged
//! with the stage's plugin name and delivered as [`StageError::Plugin`].

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::file::Representation;

/// Message used when a wrapped failure carries no text of its own.
pub const DEFAULT_MESSAGE: &str = "Plugin error";

type BoxError = Box<dyn StdError + Send + Sync>;

/// A value raised by a stage hook.
///
/// Either an actual error, or an arbitrary message such as a literal string.
#[derive(Debug)]
pub enum HookError {
    Error(BoxError),
    Message(String),
}

impl HookError {
    pub fn error(error: impl StdError + Send + Sync + 'static) -> Self {
        HookError::Error(Box::new(error))
    }

    pub fn message(message: impl Into<String>) -> Self {
        HookError::Message(message.into())
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::Error(error) => write!(f, "{error}"),
            HookError::Message(message) => f.write_str(message),
        }
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        HookError::Message(message.to_string())
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        HookError::Message(message)
    }
}

impl From<BoxError> for HookError {
    fn from(error: BoxError) -> Self {
        HookError::Error(error)
    }
}

impl From<std::io::Error> for HookError {
    fn from(error: std::io::Error) -> Self {
        HookError::error(error)
    }
}

impl From<PluginError> for HookError {
    fn from(error: PluginError) -> Self {
        HookError::error(error)
    }
}

/// User-facing error tagged with the plugin that produced it.
///
/// The original error, if any, is kept as the [`source`](StdError::source) so
/// callers can downcast to it and read any custom fields it carries.
#[derive(Debug, Error)]
#[error("{plugin}: {message}")]
pub struct PluginError {
    plugin: String,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl PluginError {
    /// Wrap a raised value, keeping its message verbatim.
    pub fn new(plugin: impl Into<String>, raised: impl Into<HookError>) -> Self {
        let (message, source) = match raised.into() {
            HookError::Error(error) => (error.to_string(), Some(error)),
            HookError::Message(message) => (message, None),
        };
        Self {
            plugin: plugin.into(),
            message,
            source,
        }
    }

    /// Wrap a raised value, substituting `default_message` when it has no text.
    pub fn with_default_message(
        plugin: impl Into<String>,
        raised: impl Into<HookError>,
        default_message: &str,
    ) -> Self {
        let mut error = Self::new(plugin, raised);
        if error.message.is_empty() {
            error.message = default_message.to_string();
        }
        error
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors a stage reports for a single unit.
#[derive(Debug, Error)]
pub enum StageError {
    /// The unit's representation is disabled for this stage.
    #[error("{plugin}: {}", unsupported_message(.representation))]
    UnsupportedContentType {
        plugin: String,
        representation: Representation,
    },

    /// A hook emitted a unit whose representation differs from its input's.
    #[error("{plugin}: File was transformed to {found} from {expected}")]
    TypeMismatch {
        plugin: String,
        expected: Representation,
        found: Representation,
    },

    /// A hook failed; normalized and tagged with the plugin name.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Error a hook handed to its completion, forwarded unchanged.
    #[error("{0}")]
    Callback(#[source] BoxError),

    /// The downstream sink refused a unit.
    #[error("downstream rejected unit: {0}")]
    Downstream(#[source] BoxError),
}

fn unsupported_message(representation: &Representation) -> &'static str {
    match representation {
        Representation::Buffer => "Buffers are not supported",
        Representation::Stream => "Streams are not supported",
        Representation::Null => "Null files are not supported",
    }
}

impl StageError {
    /// Plugin tag for errors produced by the stage itself.
    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            StageError::UnsupportedContentType { plugin, .. }
            | StageError::TypeMismatch { plugin, .. } => Some(plugin),
            StageError::Plugin(error) => Some(error.plugin()),
            StageError::Callback(_) | StageError::Downstream(_) => None,
        }
    }

    /// Marker distinguishing representation mismatches from ordinary failures.
    pub fn incorrect_transformed_file_type_error(&self) -> bool {
        matches!(self, StageError::TypeMismatch { .. })
    }

    pub fn is_unsupported_content_type(&self) -> bool {
        matches!(self, StageError::UnsupportedContentType { .. })
    }
}
