//! # File Stage
//!
//! This crate provides the base abstraction for a single stage of a streaming
//! file-processing pipeline. A stage receives discrete file units, each holding
//! its content as an in-memory buffer, an open stream, or nothing, and
//! transforms, passes through, or drops each one.
//!
//! ## Features
//!
//! - `FileTransform` trait: implementers supply only the domain-specific hooks
//! - `Stage<T>`: content-type gating, filter/ignore short-circuiting, and
//!   uniform error wrapping around those hooks
//! - Validated emission: every unit a hook emits must have the representation
//!   of the input it came from
//! - `Processor<T>` seam for pipeline drivers
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use file_stage::{
//!     ContentStream, FileTransform, FileUnit, HookError, Stage, StageError, TransformContext,
//! };
//!
//! struct Shout;
//!
//! impl FileTransform for Shout {
//!     const NAME: &'static str = "ShoutTransform";
//!
//!     fn transform_buffer_file(
//!         &mut self,
//!         file: FileUnit,
//!         contents: Bytes,
//!         _encoding: &str,
//!         cx: &mut TransformContext<'_>,
//!     ) -> Result<(), HookError> {
//!         let upper = Bytes::from(contents.to_ascii_uppercase());
//!         cx.done(Some(FileUnit::buffer(file.path(), upper)));
//!         Ok(())
//!     }
//!
//!     fn transform_stream_file(
//!         &mut self,
//!         file: FileUnit,
//!         _contents: ContentStream,
//!         _encoding: &str,
//!         cx: &mut TransformContext<'_>,
//!     ) -> Result<(), HookError> {
//!         cx.done(Some(file));
//!         Ok(())
//!     }
//! }
//!
//! let mut stage = Stage::new(Shout);
//! assert_eq!(stage.plugin_name(), "stage-shout");
//!
//! let mut out = Vec::new();
//! let mut output = |file: FileUnit| -> Result<(), StageError> {
//!     out.push(file);
//!     Ok(())
//! };
//! stage.process(FileUnit::buffer("a.txt", "hi"), "utf8", &mut output).unwrap();
//! assert_eq!(out.len(), 1);
//! ```

pub mod config;
mod context;
pub mod emit;
pub mod error;
pub mod file;
pub mod processor;
pub mod stage;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_utils;

/// Re-export key traits and types
pub use config::{StageConfig, StageConfigBuilder, StageSettings, derive_plugin_name};
pub use context::{DEFAULT_ENCODING, StageContext};
pub use emit::{Output, TransformContext};
pub use error::{DEFAULT_MESSAGE, HookError, PluginError, StageError};
pub use file::{ByteStream, ContentStream, Contents, FileUnit, Representation};
pub use processor::Processor;
pub use stage::Stage;
pub use transform::FileTransform;
