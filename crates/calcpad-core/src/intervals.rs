//! Style intervals and style layers.
//!
//! Derived styling (pattern decorations and the like) is stored as half-open character
//! intervals grouped into layers, so one source can replace its layer without touching others.

use std::collections::BTreeMap;

/// Style ID type
pub type StyleId = u32;

/// Style layer ID
///
/// Used to distinguish style sources, allowing replacement/clearing of one layer without
/// affecting other style layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleLayerId(pub u32);

impl StyleLayerId {
    /// Create a style layer id from a raw numeric identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Pattern decoration layer (handles, hashtags, digits).
    pub const PATTERN_DECORATIONS: Self = Self(1);
}

/// Interval structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// Style ID
    pub style_id: StyleId,
}

impl Interval {
    /// Create a new interval with `[start, end)` offsets and a style id.
    pub fn new(start: usize, end: usize, style_id: StyleId) -> Self {
        Self {
            start,
            end,
            style_id,
        }
    }

    /// Check if interval contains a specific position
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if the interval overlaps `[start, end)`
    pub fn overlaps_range(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for an empty (or inverted) interval.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Per-layer style interval storage.
///
/// Intervals within a layer are kept sorted by start offset (stable, so equal starts keep
/// insertion order). Layers are visited in ascending [`StyleLayerId`] order.
#[derive(Debug, Clone, Default)]
pub struct StyleLayers {
    layers: BTreeMap<StyleLayerId, Vec<Interval>>,
}

impl StyleLayers {
    /// Create an empty layer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a layer wholesale. Empty intervals are dropped; an empty result removes the layer.
    pub fn replace_layer(&mut self, layer: StyleLayerId, intervals: Vec<Interval>) {
        let mut intervals: Vec<Interval> =
            intervals.into_iter().filter(|i| !i.is_empty()).collect();
        if intervals.is_empty() {
            self.layers.remove(&layer);
            return;
        }
        intervals.sort_by_key(|i| i.start);
        self.layers.insert(layer, intervals);
    }

    /// Remove a layer.
    pub fn clear_layer(&mut self, layer: StyleLayerId) {
        self.layers.remove(&layer);
    }

    /// Intervals stored for a layer (sorted by start).
    pub fn layer(&self, layer: StyleLayerId) -> &[Interval] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of intervals across all layers.
    pub fn interval_count(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Style ids covering a character offset, in layer order.
    pub fn styles_at(&self, offset: usize) -> Vec<StyleId> {
        let mut styles = Vec::new();
        for intervals in self.layers.values() {
            // Sorted by start: everything past the first start > offset cannot contain it.
            let upper = intervals.partition_point(|i| i.start <= offset);
            styles.extend(
                intervals[..upper]
                    .iter()
                    .filter(|i| i.contains(offset))
                    .map(|i| i.style_id),
            );
        }
        styles
    }

    /// Intervals overlapping `[start, end)`, as `(start, end, style)` triples in layer order.
    pub fn styles_in_range(&self, start: usize, end: usize) -> Vec<(usize, usize, StyleId)> {
        let mut out = Vec::new();
        for intervals in self.layers.values() {
            let upper = intervals.partition_point(|i| i.start < end);
            out.extend(
                intervals[..upper]
                    .iter()
                    .filter(|i| i.overlaps_range(start, end))
                    .map(|i| (i.start, i.end, i.style_id)),
            );
        }
        out
    }
}
