//! Generic document processing interfaces.
//!
//! This module defines a shared "edit" format for derived document state such as pattern
//! decorations. Processors produce [`ProcessingEdit`] values and the caller applies them to a
//! [`DocumentStateManager`] via
//! [`DocumentStateManager::apply_processing_edits`](crate::DocumentStateManager::apply_processing_edits).

use crate::DocumentStateManager;
use crate::intervals::{Interval, StyleLayerId};

/// A change to derived document state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEdit {
    /// Replace an entire style layer with the given intervals (char offsets).
    ReplaceStyleLayer {
        /// The style layer being replaced.
        layer: StyleLayerId,
        /// The full set of style intervals for the layer (char offsets, half-open).
        intervals: Vec<Interval>,
    },
    /// Clear a style layer.
    ClearStyleLayer {
        /// The style layer being cleared.
        layer: StyleLayerId,
    },
}

/// A generic processor that produces [`ProcessingEdit`]s for a document.
pub trait DocumentProcessor {
    /// The error type returned by [`DocumentProcessor::process`].
    type Error;

    /// Compute derived state updates to apply to the document.
    ///
    /// Implementations should avoid mutating `state`; instead, return edits that the caller can
    /// apply.
    fn process(&mut self, state: &DocumentStateManager)
    -> Result<Vec<ProcessingEdit>, Self::Error>;
}
