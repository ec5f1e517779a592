//! Raw content snapshot.
//!
//! A JSON-friendly view of the document: one block per line plus the decoration ranges that
//! currently apply to it, with offsets relative to the block. Hosts show it as a debugging
//! pane; it is not meant to be read back.

use crate::commands::DocumentCore;
use crate::intervals::StyleId;
use serde::Serialize;

/// A decoration range inside a block (block-relative char offsets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStyleRange {
    /// Start offset within the block.
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
    /// Style id applied to the range.
    pub style: StyleId,
}

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    /// Stable per-snapshot key (the line index).
    pub key: String,
    /// Line text.
    pub text: String,
    /// Block type; lines are always unstyled paragraphs.
    #[serde(rename = "type")]
    pub block_type: &'static str,
    /// Decoration ranges clipped to this block.
    pub inline_style_ranges: Vec<RawStyleRange>,
}

/// Whole-document snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawContent {
    /// Blocks in document order.
    pub blocks: Vec<RawBlock>,
}

impl RawContent {
    pub(crate) fn from_document(core: &DocumentCore) -> Self {
        let line_index = &core.line_index;
        let blocks = (0..line_index.line_count())
            .map(|line| {
                let text = line_index.get_line_text(line).unwrap_or_default();
                let start = line_index.position_to_char_offset(line, 0);
                let end = start + line_index.line_len_chars(line);
                let inline_style_ranges = core
                    .style_layers
                    .styles_in_range(start, end)
                    .into_iter()
                    .map(|(s, e, style)| {
                        let s = s.max(start);
                        let e = e.min(end);
                        RawStyleRange {
                            offset: s - start,
                            length: e - s,
                            style,
                        }
                    })
                    .collect();
                RawBlock {
                    key: line.to_string(),
                    text,
                    block_type: "unstyled",
                    inline_style_ranges,
                }
            })
            .collect();
        Self { blocks }
    }

    /// Compact JSON rendering.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Indented JSON rendering.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
