//! Command Interface Layer
//!
//! A deliberately small command set for driving a line document from a host UI: text
//! insertion/deletion at a single caret and simple caret movement. There is no selection,
//! undo history or block formatting.
//!
//! # Example
//!
//! ```rust
//! use calcpad_core::{Command, CommandExecutor, EditCommand, Position};
//!
//! let mut executor = CommandExecutor::new("");
//!
//! executor.execute(Command::Edit(EditCommand::InsertText {
//!     text: "1+1".to_string(),
//! })).unwrap();
//! executor.execute(Command::Edit(EditCommand::InsertNewline)).unwrap();
//!
//! assert_eq!(executor.core().lines(), vec!["1+1".to_string(), String::new()]);
//! assert_eq!(executor.core().cursor_position(), Position::new(1, 0));
//! ```

use crate::LineIndex;
use crate::intervals::StyleLayers;
use std::cmp::Ordering;
use thiserror::Error;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert text at the specified character offset
    Insert {
        /// Character offset to insert at.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Delete text in specified range
    Delete {
        /// Character offset of the deletion start.
        start: usize,
        /// Length of the deletion in characters.
        length: usize,
    },
    /// Typing/paste at the caret; the caret ends up after the inserted text.
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Split the current line at the caret.
    InsertNewline,
    /// Delete 1 char before the caret (joining lines at column 0).
    Backspace,
    /// Delete 1 char after the caret (joining lines at end of line).
    DeleteForward,
}

/// Caret commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move to an explicit position (column is clamped to the line length).
    MoveTo {
        /// Target line.
        line: usize,
        /// Target column in characters.
        column: usize,
    },
    /// One character left, wrapping to the end of the previous line.
    Left,
    /// One character right, wrapping to the start of the next line.
    Right,
    /// One line up, keeping the column where possible.
    Up,
    /// One line down, keeping the column where possible.
    Down,
    /// Start of the current line.
    LineStart,
    /// End of the current line.
    LineEnd,
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing
    Edit(EditCommand),
    /// Caret movement
    Cursor(CursorCommand),
}

/// Command execution result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// The document text changed.
    TextChanged,
    /// Only the caret moved.
    CursorMoved,
    /// Nothing happened (e.g. backspace at the very start).
    Unchanged,
}

/// Command error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Invalid offset
    #[error("Invalid offset: {0}")]
    InvalidOffset(usize),
    /// Invalid position
    #[error("Invalid position: line {line}, column {column}")]
    InvalidPosition {
        /// Logical line index.
        line: usize,
        /// Column in characters.
        column: usize,
    },
    /// Invalid range
    #[error("Invalid range: {start}..{end}")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// Empty text
    #[error("Text cannot be empty")]
    EmptyText,
}

/// Document content plus caret and derived styles.
pub struct DocumentCore {
    /// Line index holding the document text.
    pub line_index: LineIndex,
    /// Derived style layers (pattern decorations).
    pub style_layers: StyleLayers,
    cursor: Position,
}

impl DocumentCore {
    /// Create a document from text with the caret at the start.
    pub fn new(text: &str) -> Self {
        Self {
            line_index: LineIndex::from_text(text),
            style_layers: StyleLayers::new(),
            cursor: Position::default(),
        }
    }

    /// Current caret position.
    pub fn cursor_position(&self) -> Position {
        self.cursor
    }

    /// Caret position as a character offset.
    pub fn cursor_offset(&self) -> usize {
        self.line_index
            .position_to_char_offset(self.cursor.line, self.cursor.column)
    }

    /// Full document text.
    pub fn get_text(&self) -> String {
        self.line_index.get_text()
    }

    /// Ordered line texts.
    pub fn lines(&self) -> Vec<String> {
        self.line_index.lines()
    }

    fn set_cursor_offset(&mut self, offset: usize) {
        let (line, column) = self.line_index.char_offset_to_position(offset);
        self.cursor = Position::new(line, column);
    }

    /// Clamp the caret onto an existing line and column once a cursor command has set it.
    fn clamp_cursor(&mut self) {
        let last_line = self.line_index.line_count().saturating_sub(1);
        let line = self.cursor.line.min(last_line);
        let column = self.cursor.column.min(self.line_index.line_len_chars(line));
        self.cursor = Position::new(line, column);
    }
}

/// Executes [`Command`]s against a [`DocumentCore`].
pub struct CommandExecutor {
    core: DocumentCore,
}

impl CommandExecutor {
    /// Create an executor over a new document.
    pub fn new(text: &str) -> Self {
        Self {
            core: DocumentCore::new(text),
        }
    }

    /// Create an executor over an empty document.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Borrow the document.
    pub fn core(&self) -> &DocumentCore {
        &self.core
    }

    /// Mutably borrow the document.
    pub fn core_mut(&mut self) -> &mut DocumentCore {
        &mut self.core
    }

    /// Execute a single command.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        match command {
            Command::Edit(edit) => self.execute_edit(edit),
            Command::Cursor(cursor) => self.execute_cursor(cursor),
        }
    }

    fn execute_edit(&mut self, command: EditCommand) -> Result<CommandResult, CommandError> {
        match command {
            EditCommand::Insert { offset, text } => {
                if text.is_empty() {
                    return Err(CommandError::EmptyText);
                }
                if offset > self.core.line_index.char_count() {
                    return Err(CommandError::InvalidOffset(offset));
                }
                let cursor = self.core.cursor_offset();
                self.core.line_index.insert(offset, &text);
                if offset <= cursor {
                    self.core
                        .set_cursor_offset(cursor + text.chars().count());
                }
                Ok(CommandResult::TextChanged)
            }
            EditCommand::Delete { start, length } => {
                let end = start.saturating_add(length);
                if end > self.core.line_index.char_count() {
                    return Err(CommandError::InvalidRange { start, end });
                }
                if length == 0 {
                    return Ok(CommandResult::Unchanged);
                }
                let cursor = self.core.cursor_offset();
                self.core.line_index.delete(start, length);
                let cursor = if cursor >= end {
                    cursor - length
                } else {
                    cursor.min(start)
                };
                self.core.set_cursor_offset(cursor);
                Ok(CommandResult::TextChanged)
            }
            EditCommand::InsertText { text } => {
                if text.is_empty() {
                    return Err(CommandError::EmptyText);
                }
                let offset = self.core.cursor_offset();
                self.core.line_index.insert(offset, &text);
                self.core.set_cursor_offset(offset + text.chars().count());
                Ok(CommandResult::TextChanged)
            }
            EditCommand::InsertNewline => self.execute_edit(EditCommand::InsertText {
                text: "\n".to_string(),
            }),
            EditCommand::Backspace => {
                let offset = self.core.cursor_offset();
                if offset == 0 {
                    return Ok(CommandResult::Unchanged);
                }
                // A CRLF terminator is removed as a unit.
                let start = if self.core.cursor.column == 0 {
                    self.core
                        .line_index
                        .position_to_char_offset(self.core.cursor.line - 1, usize::MAX)
                } else {
                    offset - 1
                };
                self.core.line_index.delete(start, offset - start);
                self.core.set_cursor_offset(start);
                Ok(CommandResult::TextChanged)
            }
            EditCommand::DeleteForward => {
                let offset = self.core.cursor_offset();
                let Position { line, column } = self.core.cursor;
                let end = if column >= self.core.line_index.line_len_chars(line) {
                    if line + 1 >= self.core.line_index.line_count() {
                        return Ok(CommandResult::Unchanged);
                    }
                    self.core.line_index.position_to_char_offset(line + 1, 0)
                } else {
                    offset + 1
                };
                self.core.line_index.delete(offset, end - offset);
                Ok(CommandResult::TextChanged)
            }
        }
    }

    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        let before = self.core.cursor;
        let line_count = self.core.line_index.line_count();
        let Position { line, column } = before;

        let target = match command {
            CursorCommand::MoveTo { line, column } => {
                if line >= line_count {
                    return Err(CommandError::InvalidPosition { line, column });
                }
                Position::new(line, column.min(self.core.line_index.line_len_chars(line)))
            }
            CursorCommand::Left => {
                if column > 0 {
                    Position::new(line, column - 1)
                } else if line > 0 {
                    Position::new(line - 1, self.core.line_index.line_len_chars(line - 1))
                } else {
                    before
                }
            }
            CursorCommand::Right => {
                if column < self.core.line_index.line_len_chars(line) {
                    Position::new(line, column + 1)
                } else if line + 1 < line_count {
                    Position::new(line + 1, 0)
                } else {
                    before
                }
            }
            CursorCommand::Up => {
                if line == 0 {
                    Position::new(0, 0)
                } else {
                    let len = self.core.line_index.line_len_chars(line - 1);
                    Position::new(line - 1, column.min(len))
                }
            }
            CursorCommand::Down => {
                if line + 1 >= line_count {
                    Position::new(line, self.core.line_index.line_len_chars(line))
                } else {
                    let len = self.core.line_index.line_len_chars(line + 1);
                    Position::new(line + 1, column.min(len))
                }
            }
            CursorCommand::LineStart => Position::new(line, 0),
            CursorCommand::LineEnd => {
                Position::new(line, self.core.line_index.line_len_chars(line))
            }
        };

        self.core.cursor = target;
        self.core.clamp_cursor();
        if self.core.cursor == before {
            Ok(CommandResult::Unchanged)
        } else {
            Ok(CommandResult::CursorMoved)
        }
    }
}
