//! `calcpad-decorate` - regex pattern decorations for `calcpad-core` documents.
//!
//! A [`PatternDecorator`] is a static table of [`PatternRule`]s, each a `(regex, style)` pair.
//! For every line it reports each non-overlapping match of each rule, left to right, as a
//! character span plus the rule's style id. Rules are independent: spans from different rules
//! may overlap, and the host decides how to layer them (see [`PatternDecorator::topmost`]).
//!
//! Scanning is total: any text, including the empty string, is valid input.

use calcpad_core::intervals::{Interval, StyleId, StyleLayerId};
use calcpad_core::processing::{DocumentProcessor, ProcessingEdit};
use calcpad_core::{DocumentStateManager, LineIndex};
use regex::Regex;
use std::convert::Infallible;
use std::ops::Range;
use tracing::trace;

/// `@` followed by ASCII word characters.
pub const HANDLE_PATTERN: &str = r"@[A-Za-z0-9_]+";
/// `#` followed by ASCII word characters or characters from the Hebrew block.
pub const HASHTAG_PATTERN: &str = r"#[A-Za-z0-9_\x{0590}-\x{05FF}]+";
/// A single ASCII digit; `"22"` is two matches.
pub const NUMBER_PATTERN: &str = r"[0-9]";

/// Default `StyleId` constants for the built-in rules.
///
/// These are only identifiers. The UI/theme layer maps them to actual colors.
pub const PATTERN_STYLE_HANDLE: StyleId = 0x0500_0001;
pub const PATTERN_STYLE_HASHTAG: StyleId = 0x0500_0002;
pub const PATTERN_STYLE_NUMBER: StyleId = 0x0500_0003;

/// A half-open character range (`start..end`) within a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchSpan {
    /// Start column (inclusive), in `char`s.
    pub start: usize,
    /// End column (exclusive), in `char`s.
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A span tagged with the style of the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    pub span: MatchSpan,
    pub style_id: StyleId,
}

/// A single regex decoration rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    style_id: StyleId,
}

impl PatternRule {
    pub fn new(pattern: &str, style_id: StyleId) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            style_id,
        })
    }

    pub fn style_id(&self) -> StyleId {
        self.style_id
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Every non-overlapping match in `text`, left to right, in char offsets.
    ///
    /// Each search resumes at the previous match's end. Empty matches are skipped, so every
    /// span satisfies `start < end`.
    pub fn find_spans<'r, 'h>(&'r self, text: &'h str) -> MatchSpans<'r, 'h> {
        MatchSpans {
            matches: self.regex.find_iter(text),
            haystack: text,
            byte_cursor: 0,
            char_cursor: 0,
        }
    }
}

/// Iterator returned by [`PatternRule::find_spans`].
///
/// Converts byte matches to char offsets incrementally, so a full scan stays linear.
pub struct MatchSpans<'r, 'h> {
    matches: regex::Matches<'r, 'h>,
    haystack: &'h str,
    byte_cursor: usize,
    char_cursor: usize,
}

impl MatchSpans<'_, '_> {
    fn advance_to(&mut self, byte: usize) -> usize {
        self.char_cursor += self.haystack[self.byte_cursor..byte].chars().count();
        self.byte_cursor = byte;
        self.char_cursor
    }
}

impl Iterator for MatchSpans<'_, '_> {
    type Item = MatchSpan;

    fn next(&mut self) -> Option<MatchSpan> {
        loop {
            let m = self.matches.next()?;
            if m.is_empty() {
                continue;
            }
            let start = self.advance_to(m.start());
            let end = self.advance_to(m.end());
            return Some(MatchSpan::new(start, end));
        }
    }
}

/// Style ids for the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternStyles {
    pub handle: StyleId,
    pub hashtag: StyleId,
    pub number: StyleId,
}

impl Default for PatternStyles {
    fn default() -> Self {
        Self {
            handle: PATTERN_STYLE_HANDLE,
            hashtag: PATTERN_STYLE_HASHTAG,
            number: PATTERN_STYLE_NUMBER,
        }
    }
}

/// A static table of pattern rules.
#[derive(Debug, Clone)]
pub struct PatternDecorator {
    rules: Vec<PatternRule>,
}

impl PatternDecorator {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Handle, hashtag and digit rules, registered in that order.
    pub fn default_rules() -> Result<Self, regex::Error> {
        Self::with_styles(PatternStyles::default())
    }

    /// The built-in rules with custom style ids.
    pub fn with_styles(styles: PatternStyles) -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            PatternRule::new(HANDLE_PATTERN, styles.handle)?,
            PatternRule::new(HASHTAG_PATTERN, styles.hashtag)?,
            PatternRule::new(NUMBER_PATTERN, styles.number)?,
        ]))
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Report every match of every rule in `text` to `callback`.
    ///
    /// Rules run in registration order; within a rule, spans arrive left to right.
    pub fn decorate_line<F>(&self, text: &str, mut callback: F)
    where
        F: FnMut(MatchSpan, StyleId),
    {
        for rule in &self.rules {
            for span in rule.find_spans(text) {
                callback(span, rule.style_id);
            }
        }
    }

    /// Collecting form of [`decorate_line`](Self::decorate_line).
    pub fn line_spans(&self, text: &str) -> Vec<StyledSpan> {
        let mut spans = Vec::new();
        self.decorate_line(text, |span, style_id| {
            spans.push(StyledSpan { span, style_id })
        });
        spans
    }

    /// Run all rules over every line and return document-wide style intervals (char offsets).
    pub fn decorate_document(&self, line_index: &LineIndex) -> Vec<Interval> {
        let mut intervals = Vec::new();

        for line in 0..line_index.line_count() {
            let Some(line_text) = line_index.get_line_text(line) else {
                continue;
            };
            let line_start = line_index.position_to_char_offset(line, 0);

            self.decorate_line(&line_text, |span, style_id| {
                intervals.push(Interval::new(
                    line_start + span.start,
                    line_start + span.end,
                    style_id,
                ));
            });
        }

        intervals
    }

    /// Of the given style ids, the one whose rule was registered last.
    ///
    /// Hosts paint overlapping decorations with this style. Ids that belong to no rule are
    /// ignored.
    pub fn topmost(&self, style_ids: &[StyleId]) -> Option<StyleId> {
        self.rules
            .iter()
            .rev()
            .map(PatternRule::style_id)
            .find(|id| style_ids.contains(id))
    }
}

/// A processor that applies a [`PatternDecorator`] into a [`StyleLayerId`] via
/// `calcpad-core`'s generic processing interface.
#[derive(Debug, Clone)]
pub struct PatternDecorationProcessor {
    layer: StyleLayerId,
    decorator: PatternDecorator,
}

impl PatternDecorationProcessor {
    pub fn new(layer: StyleLayerId, decorator: PatternDecorator) -> Self {
        Self { layer, decorator }
    }

    pub fn layer(&self) -> StyleLayerId {
        self.layer
    }

    pub fn decorator(&self) -> &PatternDecorator {
        &self.decorator
    }

    /// The built-in rules on [`StyleLayerId::PATTERN_DECORATIONS`].
    pub fn default_rules() -> Result<Self, regex::Error> {
        Ok(Self::new(
            StyleLayerId::PATTERN_DECORATIONS,
            PatternDecorator::default_rules()?,
        ))
    }
}

impl DocumentProcessor for PatternDecorationProcessor {
    type Error = Infallible;

    fn process(
        &mut self,
        state: &DocumentStateManager,
    ) -> Result<Vec<ProcessingEdit>, Self::Error> {
        let intervals = self
            .decorator
            .decorate_document(&state.document().line_index);
        trace!(count = intervals.len(), layer = self.layer.0, "pattern decorations");
        Ok(vec![ProcessingEdit::ReplaceStyleLayer {
            layer: self.layer,
            intervals,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_for(pattern: &str, text: &str) -> Vec<Range<usize>> {
        PatternRule::new(pattern, 0)
            .unwrap()
            .find_spans(text)
            .map(|s| s.as_range())
            .collect()
    }

    #[test]
    fn test_digits_match_one_at_a_time() {
        assert_eq!(spans_for(NUMBER_PATTERN, "a1b22c"), vec![1..2, 3..4, 4..5]);
    }

    #[test]
    fn test_hashtag_stops_at_space() {
        assert_eq!(spans_for(HASHTAG_PATTERN, "#foo bar"), vec![0..4]);
    }

    #[test]
    fn test_adjacent_matches_are_reported_separately() {
        assert_eq!(spans_for(HASHTAG_PATTERN, "#a#b"), vec![0..2, 2..4]);
        assert_eq!(spans_for(HANDLE_PATTERN, "@x@y"), vec![0..2, 2..4]);
    }

    #[test]
    fn test_hashtag_accepts_hebrew_block() {
        assert_eq!(spans_for(HASHTAG_PATTERN, "say #שלום!"), vec![4..9]);
    }

    #[test]
    fn test_handle_is_ascii_word_only() {
        assert_eq!(spans_for(HANDLE_PATTERN, "@josé"), vec![0..4]);
        assert!(spans_for(HANDLE_PATTERN, "@ alone").is_empty());
    }

    #[test]
    fn test_non_ascii_digits_are_not_numbers() {
        // Arabic-Indic digit three.
        assert!(spans_for(NUMBER_PATTERN, "\u{0663}").is_empty());
    }

    #[test]
    fn test_offsets_are_chars_not_bytes() {
        assert_eq!(spans_for(HASHTAG_PATTERN, "你好 #tag"), vec![3..7]);
    }

    #[test]
    fn test_empty_matches_are_skipped() {
        assert_eq!(spans_for(r"x*", "axxb"), vec![1..3]);
    }

    #[test]
    fn test_topmost_prefers_last_registered_rule() {
        let decorator = PatternDecorator::default_rules().unwrap();
        assert_eq!(
            decorator.topmost(&[PATTERN_STYLE_NUMBER, PATTERN_STYLE_HANDLE]),
            Some(PATTERN_STYLE_NUMBER)
        );
        assert_eq!(decorator.topmost(&[PATTERN_STYLE_HASHTAG]), Some(PATTERN_STYLE_HASHTAG));
        assert_eq!(decorator.topmost(&[0xdead]), None);
    }
}
