//! Trend/channel breakout generator.
//!
//! Buys pullbacks in an uptrend: close above the trend average while the
//! low dips under the signal average of lows. Sells the mirror image.

use backtest_core::{columns, BarWindow, Direction};

use crate::generator::SignalGenerator;

/// Bars of history required before the generator votes.
const MIN_HISTORY: usize = 20;

/// Trend-following pullback generator.
#[derive(Debug, Default)]
pub struct TrendBreakout;

impl TrendBreakout {
    pub fn new() -> Self {
        Self
    }
}

impl SignalGenerator for TrendBreakout {
    fn name(&self) -> &'static str {
        "trend"
    }

    fn evaluate(&mut self, window: &BarWindow<'_>) -> Option<Direction> {
        if window.history_len() < MIN_HISTORY {
            return None;
        }

        let bar = window.current();
        let trend = bar.indicator(columns::TREND_MA)?;
        let signal_low = bar.indicator(columns::SIGNAL_LOW_MA)?;
        let signal_high = bar.indicator(columns::SIGNAL_HIGH_MA)?;

        if bar.close > trend && bar.low < signal_low {
            Some(Direction::Long)
        } else if bar.close < trend && bar.high > signal_high {
            Some(Direction::Short)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backtest_core::Bar;
    use chrono::{Duration, TimeZone, Utc};

    fn window_with_current(current: Bar) -> Vec<Bar> {
        // Pad enough plain history bars in front of the bar under test.
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let mut bars: Vec<Bar> = (0..MIN_HISTORY - 1)
            .map(|i| {
                Bar::new(
                    start + Duration::minutes(i as i64),
                    100.0,
                    100.5,
                    99.5,
                    100.0,
                    1000.0,
                )
            })
            .collect();
        bars.push(current);
        bars
    }

    fn enriched(close: f64, high: f64, low: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        Bar::new(ts, close, high, low, close, 1000.0)
            .with_indicator(columns::TREND_MA, 100.0)
            .with_indicator(columns::SIGNAL_HIGH_MA, 102.0)
            .with_indicator(columns::SIGNAL_LOW_MA, 98.0)
    }

    #[test]
    fn test_long_on_pullback_in_uptrend() {
        let bars = window_with_current(enriched(101.0, 101.5, 97.5));
        let window = BarWindow::new(&bars, bars.len() - 1);
        assert_eq!(TrendBreakout::new().evaluate(&window), Some(Direction::Long));
    }

    #[test]
    fn test_short_on_rally_in_downtrend() {
        let bars = window_with_current(enriched(99.0, 102.5, 98.5));
        let window = BarWindow::new(&bars, bars.len() - 1);
        assert_eq!(
            TrendBreakout::new().evaluate(&window),
            Some(Direction::Short)
        );
    }

    #[test]
    fn test_no_vote_without_setup() {
        let bars = window_with_current(enriched(101.0, 101.5, 99.0));
        let window = BarWindow::new(&bars, bars.len() - 1);
        assert_eq!(TrendBreakout::new().evaluate(&window), None);
    }

    #[test]
    fn test_no_vote_before_warmup() {
        let bars = window_with_current(enriched(101.0, 101.5, 97.5));
        // One bar short of the required history.
        let window = BarWindow::new(&bars, bars.len() - 2);
        assert_eq!(TrendBreakout::new().evaluate(&window), None);
    }

    #[test]
    fn test_missing_indicators_read_as_no_vote() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let bare = Bar::new(ts, 101.0, 101.5, 97.5, 101.0, 1000.0);
        let bars = window_with_current(bare);
        let window = BarWindow::new(&bars, bars.len() - 1);
        assert_eq!(TrendBreakout::new().evaluate(&window), None);
    }
}
