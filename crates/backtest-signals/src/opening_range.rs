//! Opening range breakout generator.
//!
//! Records the high/low established during a configured opening window
//! and votes on the first bar that breaks out of that range. The
//! previous-bar check ensures later bars trading beyond the range do
//! not keep re-signaling.

use backtest_core::{BarWindow, Direction, StrategyConfig};
use chrono::NaiveDate;

use crate::generator::SignalGenerator;

/// Opening range breakout generator.
///
/// The only generator that carries state across bars: the range levels
/// for the current calendar date. The range resets at each new date.
#[derive(Debug)]
pub struct OpeningRange {
    range_start: u32,
    range_end: u32,
    range_date: Option<NaiveDate>,
    range_high: Option<f64>,
    range_low: Option<f64>,
}

impl OpeningRange {
    /// Create a generator with an opening window in HHMM encoding.
    pub fn new(range_start: u32, range_end: u32) -> Self {
        Self {
            range_start,
            range_end,
            range_date: None,
            range_high: None,
            range_low: None,
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.inputs.range_start, config.inputs.range_end)
    }
}

impl SignalGenerator for OpeningRange {
    fn name(&self) -> &'static str {
        "opening_range"
    }

    fn evaluate(&mut self, window: &BarWindow<'_>) -> Option<Direction> {
        let bar = window.current();
        let date = bar.date();

        if self.range_date != Some(date) {
            self.range_date = Some(date);
            self.range_high = None;
            self.range_low = None;
        }

        let hhmm = bar.hhmm();

        // Inside the opening window: extend the range, no vote yet.
        if hhmm >= self.range_start && hhmm <= self.range_end {
            self.range_high = Some(self.range_high.map_or(bar.high, |h| h.max(bar.high)));
            self.range_low = Some(self.range_low.map_or(bar.low, |l| l.min(bar.low)));
            return None;
        }

        if hhmm < self.range_start {
            return None;
        }

        let (high, low) = (self.range_high?, self.range_low?);
        let prev = window.prev()?;

        // First bar crossing the boundary: the prior bar was still inside.
        if bar.high > high && prev.high <= high {
            Some(Direction::Long)
        } else if bar.low < low && prev.low >= low {
            Some(Direction::Short)
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.range_date = None;
        self.range_high = None;
        self.range_low = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backtest_core::Bar;
    use chrono::{TimeZone, Utc};

    fn bar(day: u32, hour: u32, minute: u32, high: f64, low: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap();
        Bar::new(ts, (high + low) / 2.0, high, low, (high + low) / 2.0, 1000.0)
    }

    fn drive(generator: &mut OpeningRange, bars: &[Bar]) -> Vec<Option<Direction>> {
        (0..bars.len())
            .map(|i| generator.evaluate(&BarWindow::new(bars, i)))
            .collect()
    }

    #[test]
    fn test_signals_only_on_first_breakout_bar() {
        let bars = vec![
            bar(2, 9, 0, 101.0, 99.0),
            bar(2, 9, 10, 101.5, 99.5), // range: 99.0..101.5
            bar(2, 9, 30, 101.2, 100.0),
            bar(2, 9, 45, 102.0, 100.5), // breaks the range high
            bar(2, 10, 0, 103.0, 101.0), // still above, must not re-signal
        ];

        let mut generator = OpeningRange::new(900, 915);
        let votes = drive(&mut generator, &bars);

        assert_eq!(
            votes,
            vec![None, None, None, Some(Direction::Long), None]
        );
    }

    #[test]
    fn test_short_on_range_low_break() {
        let bars = vec![
            bar(2, 9, 0, 101.0, 99.0),
            bar(2, 9, 30, 100.5, 99.2),
            bar(2, 9, 45, 100.0, 98.5),
        ];

        let mut generator = OpeningRange::new(900, 915);
        let votes = drive(&mut generator, &bars);

        assert_eq!(votes, vec![None, None, Some(Direction::Short)]);
    }

    #[test]
    fn test_range_resets_each_date() {
        let bars = vec![
            bar(2, 9, 0, 110.0, 108.0),
            bar(2, 9, 30, 111.0, 109.0), // day 1 breakout
            bar(3, 9, 0, 101.0, 99.0),   // new date, new range
            bar(3, 9, 30, 100.5, 100.0), // inside the new range
            bar(3, 9, 45, 102.0, 100.2), // breaks the new range high
        ];

        let mut generator = OpeningRange::new(900, 915);
        let votes = drive(&mut generator, &bars);

        assert_eq!(
            votes,
            vec![None, Some(Direction::Long), None, None, Some(Direction::Long)]
        );
    }

    #[test]
    fn test_no_vote_before_range_is_established() {
        // A bar past the window on a date where no range bars were seen.
        let bars = vec![bar(2, 10, 0, 102.0, 100.0)];
        let mut generator = OpeningRange::new(900, 915);
        assert_eq!(drive(&mut generator, &bars), vec![None]);
    }

    #[test]
    fn test_reset_clears_state() {
        let bars = vec![bar(2, 9, 0, 101.0, 99.0)];
        let mut generator = OpeningRange::new(900, 915);
        drive(&mut generator, &bars);
        assert!(generator.range_high.is_some());

        generator.reset();
        assert!(generator.range_high.is_none());
        assert!(generator.range_date.is_none());
    }
}
