use barmark_protocol::TimeIndex;

/// Inclusive window of bar indices currently scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub from: TimeIndex,
    pub to: TimeIndex,
}

impl IndexRange {
    pub fn new(from: TimeIndex, to: TimeIndex) -> Self {
        Self { from, to }
    }
}

/// Half-open range of *item array* positions covering the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub from: usize,
    pub to: usize,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }
}

/// Anything ordered along the time axis.
pub trait Timed {
    fn time(&self) -> TimeIndex;
}

/// Binary-search the item positions covered by the visible index window.
///
/// `items` must be sorted by time (ingestion guarantees this). Both ends
/// of `range` are inclusive in index space; the result is half-open in
/// array space. With `extended`, the window grows by one item on each
/// side when one exists, so an annotation just off-screen whose glyphs
/// poke into the pane still renders instead of popping at the edge.
pub fn visible_timed_values<T: Timed>(
    items: &[T],
    range: IndexRange,
    extended: bool,
) -> VisibleRange {
    let mut from = items.partition_point(|item| item.time() < range.from);
    let mut to = items.partition_point(|item| item.time() <= range.to);
    if extended {
        if from > 0 && from < items.len() {
            from -= 1;
        }
        if to > 0 && to < items.len() {
            to += 1;
        }
    }
    VisibleRange { from, to }
}
