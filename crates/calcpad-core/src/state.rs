//! Document State Interface
//!
//! Wraps a [`CommandExecutor`] with version tracking and change notifications, which is all a
//! host needs to drive derived computations (decorations, line evaluation) off the document.
//!
//! # Example
//!
//! ```rust
//! use calcpad_core::{Command, DocumentStateManager, EditCommand, StateChangeType};
//! use std::sync::{Arc, Mutex};
//!
//! let mut manager = DocumentStateManager::new("1+1");
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! manager.subscribe(move |change| sink.lock().unwrap().push(change.change_type));
//!
//! manager.execute(Command::Edit(EditCommand::InsertNewline)).unwrap();
//!
//! assert_eq!(manager.lines().len(), 2);
//! assert_eq!(*seen.lock().unwrap(), vec![StateChangeType::DocumentModified]);
//! ```

use crate::commands::DocumentCore;
use crate::intervals::{Interval, StyleId, StyleLayerId};
use crate::processing::{DocumentProcessor, ProcessingEdit};
use crate::raw::RawContent;
use crate::{Command, CommandError, CommandExecutor, CommandResult, Position};
use tracing::trace;

/// Document state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    /// Total line count
    pub line_count: usize,
    /// Total character count
    pub char_count: usize,
    /// Whether the text changed since load/save
    pub is_modified: bool,
    /// Document version number
    pub version: u64,
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Document content modified
    DocumentModified,
    /// Cursor moved
    CursorMoved,
    /// Style changed
    StyleChanged,
}

/// State change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
}

impl StateChange {
    /// Create a new state change record.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
        }
    }
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Document state manager
///
/// - **Version Tracking**: the version number increments after each modification
/// - **Change Notifications**: subscribers are called synchronously, in subscription order
/// - **Modification Tracking**: whether the text differs from the last load/save
///
/// Callbacks run to completion inside [`execute`](DocumentStateManager::execute) before it
/// returns; there is no queueing.
pub struct DocumentStateManager {
    executor: CommandExecutor,
    state_version: u64,
    is_modified: bool,
    callbacks: Vec<StateChangeCallback>,
}

impl DocumentStateManager {
    /// Create a new state manager
    pub fn new(text: &str) -> Self {
        Self {
            executor: CommandExecutor::new(text),
            state_version: 0,
            is_modified: false,
            callbacks: Vec::new(),
        }
    }

    /// Create a state manager over an empty document.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Borrow the document.
    pub fn document(&self) -> &DocumentCore {
        self.executor.core()
    }

    /// Execute a command, bump the version and notify subscribers if anything changed.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        let result = self.executor.execute(command)?;
        match result {
            CommandResult::TextChanged => self.mark_modified(StateChangeType::DocumentModified),
            CommandResult::CursorMoved => self.mark_modified(StateChangeType::CursorMoved),
            CommandResult::Unchanged => {}
        }
        Ok(result)
    }

    /// Current version number.
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.state_version > version
    }

    /// Ordered line texts: the input of both decoration and evaluation.
    pub fn lines(&self) -> Vec<String> {
        self.executor.core().lines()
    }

    /// Full document text.
    pub fn get_text(&self) -> String {
        self.executor.core().get_text()
    }

    /// Caret position.
    pub fn cursor(&self) -> Position {
        self.executor.core().cursor_position()
    }

    /// Get document state
    pub fn get_document_state(&self) -> DocumentState {
        let line_index = &self.executor.core().line_index;
        DocumentState {
            line_count: line_index.line_count(),
            char_count: line_index.char_count(),
            is_modified: self.is_modified,
            version: self.state_version,
        }
    }

    /// Style ids covering a character offset.
    pub fn get_styles_at(&self, offset: usize) -> Vec<StyleId> {
        self.executor.core().style_layers.styles_at(offset)
    }

    /// Style intervals overlapping `[start, end)`.
    pub fn get_styles_in_range(&self, start: usize, end: usize) -> Vec<(usize, usize, StyleId)> {
        self.executor.core().style_layers.styles_in_range(start, end)
    }

    /// Replace all intervals in the specified style layer.
    ///
    /// Triggers `StyleChanged` once regardless of how many intervals are supplied.
    pub fn replace_style_layer(&mut self, layer: StyleLayerId, intervals: Vec<Interval>) {
        self.executor
            .core_mut()
            .style_layers
            .replace_layer(layer, intervals);
        self.mark_modified(StateChangeType::StyleChanged);
    }

    /// Clear the specified style layer.
    pub fn clear_style_layer(&mut self, layer: StyleLayerId) {
        self.executor.core_mut().style_layers.clear_layer(layer);
        self.mark_modified(StateChangeType::StyleChanged);
    }

    /// Apply derived-state edits produced by a document processor.
    pub fn apply_processing_edits<I>(&mut self, edits: I)
    where
        I: IntoIterator<Item = ProcessingEdit>,
    {
        for edit in edits {
            match edit {
                ProcessingEdit::ReplaceStyleLayer { layer, intervals } => {
                    self.replace_style_layer(layer, intervals);
                }
                ProcessingEdit::ClearStyleLayer { layer } => {
                    self.clear_style_layer(layer);
                }
            }
        }
    }

    /// Run a [`DocumentProcessor`] against the current document and apply its edits.
    pub fn apply_processor<P>(&mut self, processor: &mut P) -> Result<(), P::Error>
    where
        P: DocumentProcessor,
    {
        let edits = processor.process(self)?;
        self.apply_processing_edits(edits);
        Ok(())
    }

    /// Snapshot of the document and its styles for the raw content view.
    pub fn raw_content(&self) -> RawContent {
        RawContent::from_document(self.executor.core())
    }

    /// Subscribe to state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Mark state as changed and increment version number
    pub fn mark_modified(&mut self, change_type: StateChangeType) {
        let old_version = self.state_version;
        self.state_version += 1;

        // Only content changes make the document dirty.
        if change_type == StateChangeType::DocumentModified {
            self.is_modified = true;
        }

        trace!(?change_type, version = self.state_version, "document state changed");
        let change = StateChange::new(change_type, old_version, self.state_version);
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }

    /// Mark document as unmodified (e.g., after saving)
    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }
}
