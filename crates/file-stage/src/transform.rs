//! The hooks a concrete stage implements.

use bytes::Bytes;

use crate::config::StageConfig;
use crate::emit::TransformContext;
use crate::error::HookError;
use crate::file::{ContentStream, FileUnit};

/// Domain-specific logic of a pipeline stage.
///
/// Only the buffer and stream hooks are required. Filtering and ignoring
/// default to `false`, and null files pass through unchanged.
///
/// Hooks report results through the [`TransformContext`]: emit any number of
/// units with [`push`](TransformContext::push), then optionally complete with
/// [`done`](TransformContext::done) or [`fail`](TransformContext::fail).
/// Returning `Err` from a hook fails the unit with a [`PluginError`](crate::PluginError)
/// tagged with the stage's plugin name.
pub trait FileTransform {
    /// Registration name. The default plugin name is derived from it.
    const NAME: &'static str;

    /// Options this transform narrows by itself, e.g. disabling streams.
    fn options(&self) -> StageConfig {
        StageConfig::default()
    }

    /// Drop the file without emitting anything.
    fn filter_file(&self, _file: &FileUnit) -> Result<bool, HookError> {
        Ok(false)
    }

    /// Pass the file through unchanged.
    fn ignore_file(&self, _file: &FileUnit) -> Result<bool, HookError> {
        Ok(false)
    }

    fn transform_buffer_file(
        &mut self,
        file: FileUnit,
        contents: Bytes,
        encoding: &str,
        cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError>;

    /// `contents` is a handle to the same stream the file carries.
    fn transform_stream_file(
        &mut self,
        file: FileUnit,
        contents: ContentStream,
        encoding: &str,
        cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError>;

    fn transform_null_file(
        &mut self,
        file: FileUnit,
        _encoding: &str,
        cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError> {
        cx.done(Some(file));
        Ok(())
    }
}
