#![warn(missing_docs)]
//! Calcpad Core - headless line document model
//!
//! # Overview
//!
//! `calcpad-core` holds the text that calcpad decorates and evaluates. It is a small,
//! rendering-free document model: a rope-backed line index, a single caret, derived style
//! layers, and a state manager that versions every change and notifies subscribers.
//!
//! Derived state is produced outside the document by [`DocumentProcessor`]s (for example the
//! pattern decorator) and applied as [`ProcessingEdit`]s.
//!
//! # Quick Start
//!
//! ```rust
//! use calcpad_core::{Command, DocumentStateManager, EditCommand, Interval, StyleLayerId};
//!
//! let mut manager = DocumentStateManager::new("@ann paid 12");
//!
//! manager.replace_style_layer(
//!     StyleLayerId::PATTERN_DECORATIONS,
//!     vec![Interval::new(0, 4, 1)],
//! );
//! assert_eq!(manager.get_styles_at(2), vec![1]);
//!
//! manager.execute(Command::Edit(EditCommand::InsertNewline)).unwrap();
//! assert_eq!(manager.get_document_state().line_count, 2);
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - Rope based line index
//! - [`intervals`] - Style intervals and layers
//! - [`processing`] - Derived-state edits and the processor trait
//! - [`commands`] - Edit and caret commands
//! - [`state`] - Versioning and change notifications
//! - [`raw`] - JSON snapshot for debugging views

pub mod commands;
pub mod intervals;
pub mod line_index;
pub mod processing;
pub mod raw;
pub mod state;

pub use commands::{
    Command, CommandError, CommandExecutor, CommandResult, CursorCommand, DocumentCore,
    EditCommand, Position,
};
pub use intervals::{Interval, StyleId, StyleLayerId, StyleLayers};
pub use line_index::LineIndex;
pub use processing::{DocumentProcessor, ProcessingEdit};
pub use raw::{RawBlock, RawContent, RawStyleRange};
pub use state::{
    DocumentState, DocumentStateManager, StateChange, StateChangeCallback, StateChangeType,
};
