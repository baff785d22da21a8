//! # Stage
//!
//! [`Stage`] wraps a [`FileTransform`] with the contract every stage shares.
//! Each input goes through, in order:
//!
//! 1. the representation gate (disabled representations fail immediately),
//! 2. the filter hook (drop the file),
//! 3. the ignore hook (pass the file through unchanged),
//! 4. the representation-specific transform hook.
//!
//! Each step short-circuits the ones after it. Anything a hook emits is
//! checked against the input's representation by the [`TransformContext`],
//! and every error a hook raises is normalized into a [`PluginError`].

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::{StageConfig, StageSettings};
use crate::emit::{Output, TransformContext};
use crate::error::{DEFAULT_MESSAGE, HookError, PluginError, StageError};
use crate::file::{Contents, FileUnit};
use crate::processor::Processor;
use crate::transform::FileTransform;
use crate::StageContext;

/// A pipeline stage: a [`FileTransform`] plus its resolved settings.
pub struct Stage<T> {
    settings: StageSettings,
    transform: T,
}

impl<T: FileTransform> Stage<T> {
    /// Create a stage using the transform's own options.
    pub fn new(transform: T) -> Self {
        Self::with_config(transform, StageConfig::default())
    }

    /// Create a stage, overlaying `config` on the transform's own options.
    pub fn with_config(transform: T, config: StageConfig) -> Self {
        let settings = transform.options().merge(config).resolve(T::NAME);
        debug!(
            plugin = settings.plugin_name(),
            supports_buffer = settings.supports_buffer(),
            supports_stream = settings.supports_stream(),
            "Stage configured"
        );
        Self {
            settings,
            transform,
        }
    }

    pub fn settings(&self) -> &StageSettings {
        &self.settings
    }

    pub fn plugin_name(&self) -> &str {
        self.settings.plugin_name()
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut T {
        &mut self.transform
    }

    pub fn into_inner(self) -> T {
        self.transform
    }

    /// Process one file.
    ///
    /// Results are sent to `output`. The return value is the end-of-unit
    /// signal: `Ok` once the unit is fully handled, or the single error
    /// reported for it.
    pub fn process(
        &mut self,
        file: FileUnit,
        encoding: &str,
        output: &mut Output<'_>,
    ) -> Result<(), StageError> {
        let plugin = self.settings.plugin_name();
        let representation = file.representation();

        if !self.settings.supports(representation) {
            debug!(
                plugin,
                representation = %representation,
                path = %file.path().display(),
                "Unsupported content type"
            );
            return Err(StageError::UnsupportedContentType {
                plugin: plugin.to_string(),
                representation,
            });
        }

        if self
            .transform
            .filter_file(&file)
            .map_err(|raised| wrap_raised(plugin, raised))?
        {
            debug!(plugin, path = %file.path().display(), "Filtered file");
            return Ok(());
        }

        if self
            .transform
            .ignore_file(&file)
            .map_err(|raised| wrap_raised(plugin, raised))?
        {
            debug!(plugin, path = %file.path().display(), "Ignored file");
            return output(file);
        }

        trace!(plugin, representation = %representation, "Dispatching to transform hook");
        let mut cx = TransformContext::new(plugin, representation, output);
        let result = match file.contents().clone() {
            Contents::Buffer(data) => {
                self.transform
                    .transform_buffer_file(file, data, encoding, &mut cx)
            }
            Contents::Stream(stream) => {
                self.transform
                    .transform_stream_file(file, stream, encoding, &mut cx)
            }
            Contents::Null => self.transform.transform_null_file(file, encoding, &mut cx),
        };
        if let Err(raised) = result {
            cx.report_error(wrap_raised(plugin, raised));
        }
        cx.finish()
    }
}

fn wrap_raised(plugin: &str, raised: HookError) -> StageError {
    debug!(plugin, error = %raised, "Hook failed");
    PluginError::with_default_message(plugin, raised, DEFAULT_MESSAGE).into()
}

impl<T: FileTransform> Processor<FileUnit> for Stage<T> {
    fn process(
        &mut self,
        context: &Arc<StageContext>,
        input: FileUnit,
        output: &mut dyn FnMut(FileUnit) -> Result<(), StageError>,
    ) -> Result<(), StageError> {
        Stage::process(self, input, &context.encoding, output)
    }

    fn name(&self) -> &'static str {
        T::NAME
    }
}
