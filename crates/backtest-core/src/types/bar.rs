//! OHLCV bar enriched with named indicator columns.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recognized indicator column names.
///
/// Indicator math lives upstream; the engine and the signal generators
/// only look up these columns on each bar.
pub mod columns {
    /// Trend moving average over closes.
    pub const TREND_MA: &str = "trend_ma";
    /// Signal moving average over highs.
    pub const SIGNAL_HIGH_MA: &str = "signal_high_ma";
    /// Signal moving average over lows.
    pub const SIGNAL_LOW_MA: &str = "signal_low_ma";
    /// Upper Bollinger band.
    pub const BB_UPPER: &str = "bb_upper";
    /// Lower Bollinger band.
    pub const BB_LOWER: &str = "bb_lower";
    /// Average True Range, used to size stops and targets.
    pub const ATR: &str = "atr";
}

/// One OHLCV bar at a fixed timeframe, plus zero or more named
/// indicator values aligned to it.
///
/// Immutable once produced. Indicator values may be absent or NaN for
/// warm-up bars; [`Bar::indicator`] normalizes both to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar timestamp (strictly increasing across a sequence)
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
    /// Named indicator values computed upstream
    #[serde(default)]
    pub indicators: HashMap<String, f64>,
}

impl Bar {
    /// Create a new bar without indicator columns.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            indicators: HashMap::new(),
        }
    }

    /// Attach an indicator value (builder style).
    pub fn with_indicator(mut self, name: impl Into<String>, value: f64) -> Self {
        self.indicators.insert(name.into(), value);
        self
    }

    /// Look up an indicator value by column name.
    ///
    /// Returns `None` when the column is absent or the stored value is
    /// NaN (a not-yet-warmed-up indicator).
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.indicators
            .get(name)
            .copied()
            .filter(|v| !v.is_nan())
    }

    /// The bar's ATR value, if present and warmed up.
    pub fn atr(&self) -> Option<f64> {
        self.indicator(columns::ATR)
    }

    /// Calendar date of the bar, for daily-control rollover.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Time of day encoded as HHMM (e.g. 17:50 -> 1750), the encoding
    /// used by session-close and trading-window parameters.
    pub fn hhmm(&self) -> u32 {
        self.timestamp.hour() * 100 + self.timestamp.minute()
    }

    /// The bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
