//! Failure-tolerance modes and error aggregation
//!
//! | Failure                   | Strict          | Tolerant                  | Silent          |
//! |---------------------------|-----------------|---------------------------|-----------------|
//! | selector matched nothing  | abort the call  | record, keep zero value   | keep zero value |
//! | extraction failed         | abort the call  | record, keep zero value   | keep zero value |
//! | sequence element failed   | abort the call  | record with element index | keep zero value |
//!
//! Sequences treat an empty selection as an empty list in every mode, and
//! optionals treat it as absence unless the mode is strict.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScrapeError;
use crate::LOG_TARGET;

/// How failures during one scrape call are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The first failure aborts the whole call.
    #[default]
    Strict,
    /// Every failure is recorded and returned together once traversal ends.
    Tolerant,
    /// Failures leave gaps and are never returned. A target whose structure
    /// does not match its shape is still rejected with `InvalidTargetShape`
    /// before anything is read.
    Silent,
}

#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Selector(String),
    Element(usize),
}

/// Applies the mode to each failure and keeps the current selector path.
#[derive(Debug)]
pub(crate) struct ErrorSink {
    mode: Mode,
    path: Vec<Segment>,
    errors: Vec<ScrapeError>,
}

impl ErrorSink {
    pub(crate) fn new(mode: Mode) -> Self {
        Self {
            mode,
            path: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn enter(&mut self, segment: Segment) {
        self.path.push(segment);
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }

    /// Handle a failure at the current path. `Err` means stop traversal.
    pub(crate) fn report(&mut self, err: ScrapeError) -> Result<(), ScrapeError> {
        match self.mode {
            Mode::Strict => Err(self.contextualize(err)),
            Mode::Tolerant => {
                let err = self.contextualize(err);
                debug!(target: LOG_TARGET, error = %err, "recorded scrape failure");
                self.errors.push(err);
                Ok(())
            }
            Mode::Silent => {
                debug!(target: LOG_TARGET, error = %err, "suppressed scrape failure");
                Ok(())
            }
        }
    }

    fn contextualize(&self, err: ScrapeError) -> ScrapeError {
        self.path.iter().rev().fold(err, |err, segment| match segment {
            Segment::Selector(selector) => err.in_selector(selector),
            Segment::Element(index) => err.at_element(*index),
        })
    }

    pub(crate) fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Outcome of a completed traversal.
    pub(crate) fn finish(self) -> Result<(), ScrapeError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ScrapeError::Aggregate(self.errors))
        }
    }
}
