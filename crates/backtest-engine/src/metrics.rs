//! Summary metrics reduced from the closed-trade ledger.

use backtest_core::Trade;
use serde::{Deserialize, Serialize};

/// Summary statistics for a run. An empty ledger produces zeroed
/// metrics, not an error.
///
/// Sign convention: `gross_loss` is reported as a negative number for
/// display, while `profit_factor` is computed from its absolute value.
/// Both behaviors are deliberate and kept side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Sum of positive trade results
    pub gross_profit: f64,
    /// Absolute sum of negative trade results, negated for display
    pub gross_loss: f64,
    /// Sum of all trade results (per-trade costs already deducted)
    pub net_profit: f64,
    /// Round-trip costs across the ledger
    pub total_costs: f64,
    /// Winners / total, in percent
    pub win_rate: f64,
    /// Gross profit over absolute gross loss; +inf when there are
    /// profits but no losses, 0.0 when there are neither
    pub profit_factor: f64,
    pub avg_trade: f64,
    pub avg_winner: f64,
    pub avg_loser: f64,
}

impl Metrics {
    /// Reduce a closed-trade ledger to summary statistics.
    pub fn from_trades(trades: &[Trade], cost_per_trade: f64) -> Self {
        if trades.is_empty() {
            return Self::default();
        }

        let total_trades = trades.len();
        let mut winning_trades = 0usize;
        let mut losing_trades = 0usize;
        let mut gross_profit = 0.0;
        let mut loss_abs = 0.0;
        let mut net_profit = 0.0;

        for trade in trades {
            net_profit += trade.result;
            if trade.is_winner() {
                winning_trades += 1;
                gross_profit += trade.result;
            } else if trade.is_loser() {
                losing_trades += 1;
                loss_abs += trade.result.abs();
            }
        }

        let profit_factor = if loss_abs > 0.0 {
            gross_profit / loss_abs
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg = |sum: f64, count: usize| if count > 0 { sum / count as f64 } else { 0.0 };

        Self {
            total_trades,
            winning_trades,
            losing_trades,
            gross_profit,
            gross_loss: -loss_abs,
            net_profit,
            total_costs: cost_per_trade * total_trades as f64,
            win_rate: winning_trades as f64 / total_trades as f64 * 100.0,
            profit_factor,
            avg_trade: net_profit / total_trades as f64,
            avg_winner: avg(gross_profit, winning_trades),
            avg_loser: avg(-loss_abs, losing_trades),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backtest_core::{CloseReason, Direction};
    use chrono::{TimeZone, Utc};

    fn trade(result: f64) -> Trade {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        Trade {
            direction: Direction::Long,
            entry_time: ts,
            entry_price: 100.0,
            exit_time: ts,
            exit_price: 100.0 + result,
            quantity: 1,
            reason: CloseReason::TakeProfit,
            result,
        }
    }

    #[test]
    fn test_empty_ledger() {
        let metrics = Metrics::from_trades(&[], 2.0);
        assert_eq!(metrics, Metrics::default());
        assert_eq!(metrics.profit_factor, 0.0);
    }

    #[test]
    fn test_mixed_ledger() {
        let trades = vec![trade(30.0), trade(-10.0), trade(10.0), trade(-20.0)];
        let metrics = Metrics::from_trades(&trades, 1.5);

        assert_eq!(metrics.total_trades, 4);
        assert_eq!(metrics.winning_trades, 2);
        assert_eq!(metrics.losing_trades, 2);
        assert_eq!(metrics.gross_profit, 40.0);
        assert_eq!(metrics.gross_loss, -30.0);
        assert_eq!(metrics.net_profit, 10.0);
        assert_eq!(metrics.total_costs, 6.0);
        assert_eq!(metrics.win_rate, 50.0);
        assert!((metrics.profit_factor - 40.0 / 30.0).abs() < 1e-12);
        assert_eq!(metrics.avg_trade, 2.5);
        assert_eq!(metrics.avg_winner, 20.0);
        assert_eq!(metrics.avg_loser, -15.0);
    }

    #[test]
    fn test_profit_factor_without_losses_is_infinite() {
        let metrics = Metrics::from_trades(&[trade(10.0), trade(5.0)], 0.0);
        assert!(metrics.profit_factor.is_infinite());
        assert!(metrics.profit_factor > 0.0);
    }

    #[test]
    fn test_profit_factor_all_flat_is_zero() {
        // Break-even trades count as neither winners nor losers.
        let metrics = Metrics::from_trades(&[trade(0.0)], 0.0);
        assert_eq!(metrics.profit_factor, 0.0);
        assert_eq!(metrics.winning_trades, 0);
        assert_eq!(metrics.losing_trades, 0);
        assert_eq!(metrics.total_trades, 1);
    }
}
