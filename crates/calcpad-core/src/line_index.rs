//! Logical line index.
//!
//! Backed by a [`Rope`], giving O(log N) line access and editing. All offsets exposed here are
//! character offsets (Unicode scalar values), never bytes.

use ropey::{Rope, RopeSlice};

/// Logical line index - implemented using Rope data structure
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build line index from text
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total line count.
    ///
    /// An empty document, and a document ending in a line break, both count the trailing
    /// empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get total byte count
    pub fn byte_count(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Length of a line in characters, excluding its line terminator.
    ///
    /// Returns 0 for out-of-range lines.
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        slice.len_chars() - terminator_len(slice)
    }

    /// Get line number and column from a character offset (clamped to the document).
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);

        (line_idx, char_offset - line_start_char)
    }

    /// Get character offset from line number and column number.
    ///
    /// The column is clamped to the line length; lines past the end map to the end of the
    /// document.
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start_char = self.rope.line_to_char(line);
        line_start_char + column.min(self.line_len_chars(line))
    }

    /// Insert text (at specified character offset)
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Delete text range (character offset)
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = start_char.saturating_add(len_chars).min(self.rope.len_chars());

        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
    }

    /// Get complete text
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Get text of the specified line (excluding its terminator)
    pub fn get_line_text(&self, line_number: usize) -> Option<String> {
        if line_number >= self.rope.len_lines() {
            return None;
        }

        let slice = self.rope.line(line_number);
        let content_len = slice.len_chars() - terminator_len(slice);
        Some(slice.slice(..content_len).to_string())
    }

    /// All line texts, in document order.
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .filter_map(|line| self.get_line_text(line))
            .collect()
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

fn terminator_len(slice: RopeSlice<'_>) -> usize {
    let len = slice.len_chars();
    if len == 0 {
        return 0;
    }
    let last = slice.char(len - 1);
    if last == '\n' && len >= 2 && slice.char(len - 2) == '\r' {
        2
    } else if is_line_break(last) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1); // Rope empty document has 1 line
        assert_eq!(index.byte_count(), 0);
        assert_eq!(index.char_count(), 0);
        assert_eq!(index.lines(), vec![String::new()]);
    }

    #[test]
    fn test_from_text() {
        let text = "1+1\n2*3\n@me";
        let index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.byte_count(), text.len());
        assert_eq!(index.char_count(), text.chars().count());
    }

    #[test]
    fn test_trailing_newline_yields_empty_line() {
        let index = LineIndex::from_text("1+1\n");
        assert_eq!(index.lines(), vec!["1+1".to_string(), String::new()]);
    }

    #[test]
    fn test_crlf_terminators_are_stripped() {
        let index = LineIndex::from_text("1+1\r\n2+2");
        assert_eq!(index.get_line_text(0).as_deref(), Some("1+1"));
        assert_eq!(index.line_len_chars(0), 3);
        assert_eq!(index.position_to_char_offset(0, 10), 3);
        assert_eq!(index.position_to_char_offset(1, 0), 5);
    }

    #[test]
    fn test_char_offset_to_position() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.char_offset_to_position(0), (0, 0));
        assert_eq!(index.char_offset_to_position(2), (0, 2));
        assert_eq!(index.char_offset_to_position(4), (1, 0));
        assert_eq!(index.char_offset_to_position(8), (2, 0));
        assert_eq!(index.char_offset_to_position(99), (2, 3));
    }

    #[test]
    fn test_position_to_char_offset() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.position_to_char_offset(0, 0), 0);
        assert_eq!(index.position_to_char_offset(0, 2), 2);
        assert_eq!(index.position_to_char_offset(0, 9), 3);
        assert_eq!(index.position_to_char_offset(1, 0), 4);
        assert_eq!(index.position_to_char_offset(2, 0), 8);
        assert_eq!(index.position_to_char_offset(7, 0), 11);
    }

    #[test]
    fn test_utf8_hebrew_and_cjk() {
        let index = LineIndex::from_text("#שלום\n你好");

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_len_chars(0), 5);
        assert_eq!(index.char_offset_to_position(6), (1, 0));
        assert_eq!(index.get_line_text(1).as_deref(), Some("你好"));
    }

    #[test]
    fn test_insert_and_delete_text() {
        let mut index = LineIndex::from_text("1+2");

        index.insert(1, "0");
        assert_eq!(index.get_text(), "10+2");

        index.delete(0, 2);
        assert_eq!(index.get_text(), "+2");

        index.delete(1, 100);
        assert_eq!(index.get_text(), "+");
    }
}
