//! Run result record.

use backtest_core::{EngineResult, Trade};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::Metrics;

/// One equity observation, recorded once per bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    /// Realized results to date plus mark-to-market of the open position
    pub equity: f64,
}

/// Descriptive metadata for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub strategy_name: String,
    pub symbol: String,
    pub timeframe: String,
    /// First-to-last bar dates, e.g. "2024-01-02_to_2024-03-28"
    pub period: String,
    pub total_bars: usize,
}

/// The finalized outcome of a run: ledger, equity curve, metrics, and
/// metadata. Produced once at the end of a run, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    /// One point per bar processed, in bar order
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: Metrics,
    pub metadata: RunMetadata,
}

impl BacktestResult {
    /// Export the full record as pretty-printed JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_export() {
        let result = BacktestResult {
            trades: Vec::new(),
            equity_curve: Vec::new(),
            metrics: Metrics::default(),
            metadata: RunMetadata {
                strategy_name: "Score".to_string(),
                symbol: "IDX".to_string(),
                timeframe: "5m".to_string(),
                period: "2024-01-02_to_2024-01-05".to_string(),
                total_bars: 0,
            },
        };

        let json = result.to_json().unwrap();
        assert!(json.contains("\"strategy_name\": \"Score\""));
        assert!(json.contains("\"equity_curve\""));
    }
}
