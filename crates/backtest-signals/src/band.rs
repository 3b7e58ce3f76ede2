//! Bollinger band breakout generator.

use backtest_core::{columns, BarWindow, Direction};

use crate::generator::SignalGenerator;

/// Votes long when the close breaks above the upper band, short when it
/// breaks below the lower band.
#[derive(Debug, Default)]
pub struct BandBreakout;

impl BandBreakout {
    pub fn new() -> Self {
        Self
    }
}

impl SignalGenerator for BandBreakout {
    fn name(&self) -> &'static str {
        "band"
    }

    fn evaluate(&mut self, window: &BarWindow<'_>) -> Option<Direction> {
        let bar = window.current();
        let upper = bar.indicator(columns::BB_UPPER)?;
        let lower = bar.indicator(columns::BB_LOWER)?;

        if bar.close > upper {
            Some(Direction::Long)
        } else if bar.close < lower {
            Some(Direction::Short)
        } else {
            None
        }
    }
}
