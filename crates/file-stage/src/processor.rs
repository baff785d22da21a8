//! # Processor seam
//!
//! Drivers talk to stages through [`Processor`]: one `process` call per input,
//! emitting results through `output`, and a final `finish` once input ends.

use std::sync::Arc;

use crate::{StageContext, StageError};

/// A unit of work in a pipeline, processing items of type `T`.
pub trait Processor<T> {
    /// Process one input, calling `output` for every result.
    ///
    /// Calls are serial: a driver never overlaps two calls on one processor.
    fn process(
        &mut self,
        context: &Arc<StageContext>,
        input: T,
        output: &mut dyn FnMut(T) -> Result<(), StageError>,
    ) -> Result<(), StageError>;

    /// Flush any buffered state once the input is exhausted.
    fn finish(
        &mut self,
        _context: &Arc<StageContext>,
        _output: &mut dyn FnMut(T) -> Result<(), StageError>,
    ) -> Result<(), StageError> {
        Ok(())
    }

    fn name(&self) -> &'static str;
}
