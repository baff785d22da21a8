//! Stage configuration.
//!
//! Options are layered: crate defaults, then whatever the transform itself
//! narrows via [`FileTransform::options`](crate::FileTransform::options), then
//! the instance configuration handed to [`Stage::with_config`](crate::Stage::with_config).
//! The result is resolved once into immutable [`StageSettings`].

use serde::Deserialize;

use crate::file::Representation;

/// Namespace prepended to derived plugin names.
pub const PLUGIN_NAMESPACE: &str = "stage-";

/// Partial stage options. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageConfig {
    pub supports_buffer: Option<bool>,
    pub supports_stream: Option<bool>,
    pub plugin_name: Option<String>,
}

impl StageConfig {
    pub fn builder() -> StageConfigBuilder {
        StageConfigBuilder::new()
    }

    /// Overlay `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: StageConfig) -> StageConfig {
        StageConfig {
            supports_buffer: overrides.supports_buffer.or(self.supports_buffer),
            supports_stream: overrides.supports_stream.or(self.supports_stream),
            plugin_name: overrides.plugin_name.or(self.plugin_name),
        }
    }

    /// Resolve into settings, deriving the plugin name from `registration_name`
    /// when none was given.
    pub fn resolve(self, registration_name: &str) -> StageSettings {
        let plugin_name = match self.plugin_name {
            Some(name) if !name.is_empty() => name,
            _ => derive_plugin_name(registration_name),
        };
        StageSettings {
            supports_buffer: self.supports_buffer.unwrap_or(true),
            supports_stream: self.supports_stream.unwrap_or(true),
            plugin_name,
        }
    }
}

pub struct StageConfigBuilder {
    config: StageConfig,
}

impl StageConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: StageConfig::default(),
        }
    }

    pub fn supports_buffer(mut self, supports_buffer: bool) -> Self {
        self.config.supports_buffer = Some(supports_buffer);
        self
    }

    pub fn supports_stream(mut self, supports_stream: bool) -> Self {
        self.config.supports_stream = Some(supports_stream);
        self
    }

    pub fn plugin_name(mut self, plugin_name: impl Into<String>) -> Self {
        self.config.plugin_name = Some(plugin_name.into());
        self
    }

    pub fn build(self) -> StageConfig {
        self.config
    }
}

impl Default for StageConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolved, immutable configuration of one stage instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSettings {
    supports_buffer: bool,
    supports_stream: bool,
    plugin_name: String,
}

impl StageSettings {
    pub fn supports_buffer(&self) -> bool {
        self.supports_buffer
    }

    pub fn supports_stream(&self) -> bool {
        self.supports_stream
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    /// Null contents are never gated.
    pub fn supports(&self, representation: Representation) -> bool {
        match representation {
            Representation::Buffer => self.supports_buffer,
            Representation::Stream => self.supports_stream,
            Representation::Null => true,
        }
    }
}

/// Derive a plugin name from a registration name.
///
/// `"ThrowStringTransform"` becomes `"stage-throwstring"`.
pub fn derive_plugin_name(registration_name: &str) -> String {
    let stripped = registration_name.replace("Transform", "");
    let base = if stripped.is_empty() {
        registration_name
    } else {
        stripped.as_str()
    };
    format!("{PLUGIN_NAMESPACE}{}", base.to_lowercase())
}
