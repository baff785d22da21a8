//! Validated output channel handed to transform hooks.
//!
//! [`TransformContext`] sits between a hook and the real downstream sink. It
//! polices both ways a hook can report results: direct emission through
//! [`push`](TransformContext::push), and the completion through
//! [`done`](TransformContext::done) / [`fail`](TransformContext::fail). Every
//! emitted unit must have the representation of the input being processed.

use std::error::Error as StdError;

use tracing::{debug, trace, warn};

use crate::error::StageError;
use crate::file::{FileUnit, Representation};

/// Downstream sink receiving forwarded units.
pub type Output<'a> = dyn FnMut(FileUnit) -> Result<(), StageError> + 'a;

/// Per-unit processing state, exclusive to one in-flight `process` call.
pub struct TransformContext<'a> {
    plugin: &'a str,
    /// Representation of the input unit; `None` for null input, which is unconstrained.
    expected: Option<Representation>,
    mismatch_reported: bool,
    completion: Option<Result<(), StageError>>,
    output: &'a mut Output<'a>,
}

impl<'a> TransformContext<'a> {
    pub(crate) fn new(plugin: &'a str, input: Representation, output: &'a mut Output<'a>) -> Self {
        let expected = match input {
            Representation::Null => None,
            representation => Some(representation),
        };
        Self {
            plugin,
            expected,
            mismatch_reported: false,
            completion: None,
            output,
        }
    }

    pub fn plugin_name(&self) -> &str {
        self.plugin
    }

    /// Representation every emitted unit must have, if constrained.
    pub fn expected_representation(&self) -> Option<Representation> {
        self.expected
    }

    /// Whether a type mismatch has been reported for the current unit.
    pub fn has_reported_mismatch(&self) -> bool {
        self.mismatch_reported
    }

    /// Whether an error has been reported for the current unit.
    pub fn is_failed(&self) -> bool {
        matches!(self.completion, Some(Err(_)))
    }

    /// Emit a result downstream.
    ///
    /// Returns `true` when the unit was forwarded. A unit of the wrong
    /// representation is not forwarded and fails the current input with a
    /// type mismatch; once the input has failed every later emission is
    /// discarded.
    pub fn push(&mut self, file: FileUnit) -> bool {
        let found = file.representation();
        if self.is_failed() {
            debug!(
                plugin = self.plugin,
                representation = %found,
                "Discarding emission after failure"
            );
            return false;
        }
        if !self.accepts(found) {
            self.report_mismatch(found);
            return false;
        }
        self.forward(file)
    }

    /// Complete the current unit, optionally with a single result.
    ///
    /// The result goes through the same representation check as [`push`](Self::push).
    pub fn done(&mut self, result: Option<FileUnit>) {
        if self.completion.is_some() {
            warn!(plugin = self.plugin, "Completion called more than once, ignoring");
            return;
        }
        match result {
            None => self.completion = Some(Ok(())),
            Some(file) => {
                let found = file.representation();
                if !self.accepts(found) {
                    self.report_mismatch(found);
                } else if self.forward(file) {
                    self.completion = Some(Ok(()));
                }
            }
        }
    }

    /// Complete the current unit with an error, forwarded unchanged.
    pub fn fail(&mut self, error: impl Into<Box<dyn StdError + Send + Sync>>) {
        if self.completion.is_some() {
            warn!(plugin = self.plugin, "Completion called more than once, ignoring");
            return;
        }
        self.completion = Some(Err(StageError::Callback(error.into())));
    }

    fn accepts(&self, found: Representation) -> bool {
        self.expected.is_none_or(|expected| expected == found)
    }

    fn forward(&mut self, file: FileUnit) -> bool {
        trace!(plugin = self.plugin, path = %file.path().display(), "Forwarding unit");
        match (self.output)(file) {
            Ok(()) => true,
            Err(error) => {
                warn!(plugin = self.plugin, error = %error, "Downstream rejected unit");
                self.report_error(error);
                false
            }
        }
    }

    fn report_mismatch(&mut self, found: Representation) {
        if self.mismatch_reported {
            return;
        }
        self.mismatch_reported = true;
        let expected = self.expected.unwrap_or(Representation::Null);
        warn!(
            plugin = self.plugin,
            expected = %expected,
            found = %found,
            "Transformed file has the wrong representation"
        );
        self.report_error(StageError::TypeMismatch {
            plugin: self.plugin.to_string(),
            expected,
            found,
        });
    }

    /// Record an error as the unit's outcome. The first error wins; it also
    /// replaces an earlier successful completion.
    pub(crate) fn report_error(&mut self, error: StageError) {
        match self.completion {
            Some(Err(_)) => {
                debug!(
                    plugin = self.plugin,
                    error = %error,
                    "Unit already failed, dropping error"
                );
            }
            _ => self.completion = Some(Err(error)),
        }
    }

    /// End-of-unit signal. A hook that never completed ends with no extra result.
    pub(crate) fn finish(self) -> Result<(), StageError> {
        self.completion.unwrap_or(Ok(()))
    }
}
