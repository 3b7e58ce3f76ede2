//! The simulation loop.

use backtest_core::{
    Bar, BarWindow, CloseReason, Direction, EngineError, EngineResult, RiskParams,
    StrategyConfig, Trade,
};
use backtest_signals::{default_generators, SignalAggregator, SignalGenerator};
use tracing::{debug, info};

use crate::daily::DailyRiskState;
use crate::events::{EventSink, NullSink, SimEvent};
use crate::metrics::Metrics;
use crate::position::PositionManager;
use crate::result::{BacktestResult, EquityPoint, RunMetadata};

/// Bar-by-bar backtest engine.
///
/// Iterates bars strictly in order with no look-ahead: per bar it
/// updates the daily controls, manages the open position (or evaluates
/// entries), and records an equity point unconditionally. A run either
/// completes with a full [`BacktestResult`] or fails before the loop
/// starts; there is no partial result.
pub struct BacktestEngine {
    config: StrategyConfig,
    aggregator: SignalAggregator,
    generators: Vec<Box<dyn SignalGenerator>>,
}

impl BacktestEngine {
    /// Create an engine with the default generator set.
    pub fn new(config: StrategyConfig) -> Self {
        let aggregator = SignalAggregator::from_config(&config);
        let generators = default_generators(&config);
        Self {
            config,
            aggregator,
            generators,
        }
    }

    /// Replace the generator set (weights are still looked up by name).
    pub fn with_generators(mut self, generators: Vec<Box<dyn SignalGenerator>>) -> Self {
        self.generators = generators;
        self
    }

    /// Run without an event observer.
    pub fn run(
        &mut self,
        bars: &[Bar],
        symbol: &str,
        timeframe: &str,
    ) -> EngineResult<BacktestResult> {
        let mut sink = NullSink;
        self.run_with_sink(bars, symbol, timeframe, &mut sink)
    }

    /// Run the full simulation, reporting progress to `sink`.
    pub fn run_with_sink(
        &mut self,
        bars: &[Bar],
        symbol: &str,
        timeframe: &str,
        sink: &mut dyn EventSink,
    ) -> EngineResult<BacktestResult> {
        self.config.validate()?;
        validate_bars(bars)?;
        for generator in &mut self.generators {
            generator.reset();
        }

        let mut daily = DailyRiskState::new();
        let mut positions = PositionManager::new();
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_curve = Vec::with_capacity(bars.len());
        let mut realized = 0.0_f64;

        info!(
            strategy = %self.config.name,
            symbol,
            timeframe,
            total_bars = bars.len(),
            "backtest run started"
        );
        sink.on_event(&SimEvent::RunStarted {
            strategy: self.config.name.clone(),
            total_bars: bars.len(),
        });

        for (index, bar) in bars.iter().enumerate() {
            daily.on_bar(bar.date(), &self.config.risk);
            let past_session_close = bar.hhmm() >= self.config.inputs.session_close;

            let closed = if positions.is_open() {
                if past_session_close {
                    positions.close(
                        bar.timestamp,
                        bar.close,
                        CloseReason::EndOfSession,
                        &self.config,
                    )
                } else {
                    positions.evaluate_exit(bar, &self.config)
                }
            } else {
                if !past_session_close {
                    self.evaluate_entry(bars, index, &mut daily, &mut positions, sink);
                }
                None
            };

            if let Some(trade) = closed {
                record_close(
                    trade,
                    &mut realized,
                    &mut daily,
                    &self.config.risk,
                    sink,
                    &mut trades,
                );
            }

            // Unconditional: one equity point per bar, trade or not.
            equity_curve.push(EquityPoint {
                timestamp: bar.timestamp,
                equity: realized
                    + positions.unrealized(bar.close, self.config.inputs.point_value),
            });
        }

        // Anything still open after the last bar closes at its close.
        if positions.is_open() {
            if let Some(last) = bars.last() {
                if let Some(trade) = positions.close(
                    last.timestamp,
                    last.close,
                    CloseReason::EndOfData,
                    &self.config,
                ) {
                    record_close(
                        trade,
                        &mut realized,
                        &mut daily,
                        &self.config.risk,
                        sink,
                        &mut trades,
                    );
                }
            }
        }

        let metrics = Metrics::from_trades(&trades, self.config.inputs.cost_per_trade);
        info!(
            total_trades = metrics.total_trades,
            net_profit = metrics.net_profit,
            "backtest run completed"
        );
        sink.on_event(&SimEvent::RunCompleted {
            total_trades: metrics.total_trades,
            net_profit: metrics.net_profit,
        });

        let metadata = RunMetadata {
            strategy_name: self.config.name.clone(),
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            period: period_of(bars),
            total_bars: bars.len(),
        };

        Ok(BacktestResult {
            trades,
            equity_curve,
            metrics,
            metadata,
        })
    }

    /// Entry evaluation for one bar: generator votes, weighted-score
    /// decision, risk gates, trading window, position opening.
    ///
    /// Generators run on every flat bar regardless of the gates so
    /// stateful ones keep observing the session (the opening range is
    /// established by bars the trading window has not admitted yet).
    /// The gates suppress only the resulting entry.
    fn evaluate_entry(
        &mut self,
        bars: &[Bar],
        index: usize,
        daily: &mut DailyRiskState,
        positions: &mut PositionManager,
        sink: &mut dyn EventSink,
    ) {
        let bar = &bars[index];
        let window = BarWindow::new(bars, index);
        let votes: Vec<(&str, Option<Direction>)> = self
            .generators
            .iter_mut()
            .map(|g| (g.name(), g.evaluate(&window)))
            .collect();
        let decision = self.aggregator.decide(&votes);

        let Some(direction) = decision.entry else {
            return;
        };

        if !daily.entry_allowed(&self.config.risk) || !self.in_entry_window(bar) {
            return;
        }

        // A zero or undefined ATR makes try_open refuse the entry; the
        // trade counter only moves on an actual open.
        if let Some(position) = positions.try_open(bar, direction, &self.config) {
            daily.record_entry();
            debug!(
                time = %position.entry_time,
                ?direction,
                price = position.entry_price,
                buy_score = decision.buy_score,
                sell_score = decision.sell_score,
                "position opened"
            );
            sink.on_event(&SimEvent::PositionOpened {
                time: position.entry_time,
                direction,
                price: position.entry_price,
                quantity: position.quantity,
            });
        }
    }

    fn in_entry_window(&self, bar: &Bar) -> bool {
        if !self.config.inputs.use_entry_window {
            return true;
        }
        let hhmm = bar.hhmm();
        hhmm >= self.config.inputs.entry_window_start
            && hhmm <= self.config.inputs.entry_window_end
    }
}

/// Shared bookkeeping for every close path.
fn record_close(
    trade: Trade,
    realized: &mut f64,
    daily: &mut DailyRiskState,
    risk: &RiskParams,
    sink: &mut dyn EventSink,
    trades: &mut Vec<Trade>,
) {
    *realized += trade.result;
    daily.record_close(trade.result, risk);
    debug!(
        time = %trade.exit_time,
        reason = ?trade.reason,
        price = trade.exit_price,
        result = trade.result,
        "position closed"
    );
    sink.on_event(&SimEvent::PositionClosed {
        time: trade.exit_time,
        reason: trade.reason,
        price: trade.exit_price,
        result: trade.result,
    });
    trades.push(trade);
}

/// Fatal pre-loop checks: the run aborts cleanly before producing any
/// partial results.
fn validate_bars(bars: &[Bar]) -> EngineResult<()> {
    if bars.is_empty() {
        return Err(EngineError::EmptyData);
    }
    for (index, pair) in bars.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(EngineError::NonMonotonicTimestamps { index: index + 1 });
        }
    }
    Ok(())
}

fn period_of(bars: &[Bar]) -> String {
    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => format!("{}_to_{}", first.date(), last.date()),
        _ => String::new(),
    }
}
