//! Open-position state machine.

use backtest_core::{Bar, CloseReason, Direction, Position, StrategyConfig, Trade};
use chrono::{DateTime, Utc};

/// Owns the single open position: entry sizing, stop/target placement,
/// break-even and trailing adjustments, and exit detection.
#[derive(Debug, Default)]
pub struct PositionManager {
    position: Option<Position>,
}

impl PositionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.position.is_some()
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Open a position at the bar close.
    ///
    /// Stop and target are placed at ATR multiples from entry,
    /// direction-aware. A zero or undefined ATR skips the entry
    /// entirely: there is no sane stop distance to derive.
    pub fn try_open(
        &mut self,
        bar: &Bar,
        direction: Direction,
        config: &StrategyConfig,
    ) -> Option<&Position> {
        debug_assert!(self.position.is_none(), "only one open position at a time");

        let atr = bar.atr().filter(|a| *a > 0.0)?;
        let entry_price = bar.close;
        let sign = direction.sign();

        let stop_loss = config
            .inputs
            .use_stop_loss
            .then(|| entry_price - sign * atr * config.risk.atr_stop_factor);
        let take_profit = config
            .inputs
            .use_take_profit
            .then(|| entry_price + sign * atr * config.risk.atr_target_factor);

        self.position = Some(Position {
            direction,
            entry_time: bar.timestamp,
            entry_price,
            quantity: config.risk.contracts_per_trade,
            stop_loss,
            take_profit,
        });
        self.position.as_ref()
    }

    /// Evaluate exit conditions for the open position on this bar, in
    /// fixed order: break-even, trailing stop, take-profit, stop-loss.
    ///
    /// Skipped entirely when the bar's ATR is undefined (no stop or
    /// target adjustment is possible). Take-profit has priority over
    /// stop-loss within the same bar; fills happen at the exact stop or
    /// target price, not the bar close.
    pub fn evaluate_exit(&mut self, bar: &Bar, config: &StrategyConfig) -> Option<Trade> {
        let atr = bar.atr().filter(|a| *a > 0.0)?;
        let pos = self.position.as_mut()?;
        let sign = pos.direction.sign();

        // Break-even: once favorably extended past the trigger, the
        // stop moves to exactly the entry price. One-way ratchet; only
        // applies while the stop is still on the losing side of entry.
        if config.inputs.use_break_even && pos.stop_below_entry() {
            let trigger = atr * config.inputs.break_even_trigger_atr;
            let reached = match pos.direction {
                Direction::Long => bar.high >= pos.entry_price + trigger,
                Direction::Short => bar.low <= pos.entry_price - trigger,
            };
            if reached {
                pos.stop_loss = Some(pos.entry_price);
            }
        }

        // Trailing stop: once armed by the trigger excursion, a
        // candidate stop trails the close; it replaces the stored stop
        // only when strictly more favorable, so the stop never loosens.
        if config.inputs.use_trailing_stop {
            let trigger = atr * config.inputs.trailing_trigger_atr;
            let distance = atr * config.inputs.trailing_distance_atr;
            let armed = match pos.direction {
                Direction::Long => bar.high >= pos.entry_price + trigger,
                Direction::Short => bar.low <= pos.entry_price - trigger,
            };
            if armed {
                let candidate = bar.close - sign * distance;
                let tightens = match (pos.direction, pos.stop_loss) {
                    (Direction::Long, Some(stop)) => candidate > stop,
                    (Direction::Short, Some(stop)) => candidate < stop,
                    (_, None) => true,
                };
                if tightens {
                    pos.stop_loss = Some(candidate);
                }
            }
        }

        let (direction, take_profit, stop_loss) = (pos.direction, pos.take_profit, pos.stop_loss);

        // Take-profit is checked first; on a trigger the stop check for
        // this bar is skipped.
        if let Some(target) = take_profit {
            let hit = match direction {
                Direction::Long => bar.high >= target,
                Direction::Short => bar.low <= target,
            };
            if hit {
                return self.close(bar.timestamp, target, CloseReason::TakeProfit, config);
            }
        }

        if let Some(stop) = stop_loss {
            let hit = match direction {
                Direction::Long => bar.low <= stop,
                Direction::Short => bar.high >= stop,
            };
            if hit {
                return self.close(bar.timestamp, stop, CloseReason::StopLoss, config);
            }
        }

        None
    }

    /// Close the open position at `price`, producing the immutable
    /// trade record. Realized result converts points to currency via
    /// the point value and deducts the round-trip cost.
    pub fn close(
        &mut self,
        exit_time: DateTime<Utc>,
        price: f64,
        reason: CloseReason,
        config: &StrategyConfig,
    ) -> Option<Trade> {
        let pos = self.position.take()?;
        let points = pos.unrealized_points(price);
        let result = points * config.inputs.point_value - config.inputs.cost_per_trade;
        Some(pos.into_trade(exit_time, price, reason, result))
    }

    /// Mark-to-market of the open position in currency; zero when flat.
    pub fn unrealized(&self, price: f64, point_value: f64) -> f64 {
        self.position
            .as_ref()
            .map_or(0.0, |p| p.unrealized_points(price) * point_value)
    }
}
