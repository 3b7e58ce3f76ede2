//! Bar window view handed to signal generators.

use super::Bar;

/// A view over the bar history up to and including the current bar.
///
/// Signal generators receive this instead of the whole history with a
/// positional index, so their data dependency is explicit and each
/// generator can be exercised in isolation.
#[derive(Debug, Clone, Copy)]
pub struct BarWindow<'a> {
    bars: &'a [Bar],
    index: usize,
}

impl<'a> BarWindow<'a> {
    /// Create a window at `index` into `bars`.
    ///
    /// Panics if `index` is out of bounds; the simulation loop only
    /// constructs windows for indices it is iterating.
    pub fn new(bars: &'a [Bar], index: usize) -> Self {
        assert!(index < bars.len(), "bar window index out of bounds");
        Self { bars, index }
    }

    /// The bar currently being processed.
    pub fn current(&self) -> &'a Bar {
        &self.bars[self.index]
    }

    /// The bar immediately before the current one, if any.
    pub fn prev(&self) -> Option<&'a Bar> {
        self.index.checked_sub(1).map(|i| &self.bars[i])
    }

    /// The bar `n` positions before the current one.
    pub fn back(&self, n: usize) -> Option<&'a Bar> {
        self.index.checked_sub(n).map(|i| &self.bars[i])
    }

    /// Index of the current bar within the run.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of bars available, current bar included.
    pub fn history_len(&self) -> usize {
        self.index + 1
    }
}
