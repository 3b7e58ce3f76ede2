//! Signal generator trait.

use backtest_core::{BarWindow, Direction};

/// A directional signal generator.
///
/// Generators are evaluated once per bar against a [`BarWindow`] and
/// vote `Some(Long)`, `Some(Short)`, or `None`. Missing or warm-up
/// indicator values must read as "no vote", never as an error.
///
/// Most generators are pure functions of the window; the trait takes
/// `&mut self` so generators whose semantics require a reference level
/// carried across bars (the opening range) can keep it.
pub trait SignalGenerator: Send {
    /// Stable name used for weight lookup and event reporting.
    fn name(&self) -> &'static str;

    /// Vote on the current bar.
    fn evaluate(&mut self, window: &BarWindow<'_>) -> Option<Direction>;

    /// Clear any carried state before a fresh run.
    fn reset(&mut self) {}
}
