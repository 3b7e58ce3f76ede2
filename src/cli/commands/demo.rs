//! Demo backtest over synthetic data.
//!
//! Plays the role of the excluded collaborators: it fabricates an
//! indicator-enriched bar sequence and renders the result record. The
//! core engine only ever sees the finished bars.

use anyhow::Result;
use backtest_core::{columns, Bar, StrategyConfig, StrategyParams};
use backtest_engine::{BacktestEngine, BacktestResult};
use chrono::{Duration, TimeZone, Utc};
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args)]
pub struct DemoArgs {
    /// Number of synthetic trading days
    #[arg(long, default_value_t = 5)]
    pub days: u32,

    /// Minimum weighted score an entry must reach
    #[arg(long, default_value_t = 0.5)]
    pub min_score: f64,

    /// Print the full result record as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Save the result record as JSON to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

pub fn run(args: DemoArgs) -> Result<()> {
    let params = StrategyParams::new("Score Orchestrator Demo")
        .with("min_entry_score", args.min_score)
        .with("use_break_even", true)
        .with("use_trailing_stop", true)
        .with("max_trades_per_day", 5i64)
        .with("max_consecutive_losses", 4i64)
        .with("cost_per_trade", 1.0);
    let config = StrategyConfig::from_params(&params);

    let bars = enrich(synthetic_bars(args.days));
    info!("Generated {} synthetic bars over {} days", bars.len(), args.days);

    let mut engine = BacktestEngine::new(config);
    let result = engine.run(&bars, "DEMO", "5m")?;

    if args.json {
        println!("{}", result.to_json()?);
    } else {
        print_summary(&result);
    }

    if let Some(path) = args.save {
        std::fs::write(&path, result.to_json()?)?;
        info!("Result saved to {:?}", path);
    }

    Ok(())
}

/// Deterministic intraday price path: 5-minute bars from 09:00 to
/// 17:55, two overlaid sine waves plus a slow daily drift.
fn synthetic_bars(days: u32) -> Vec<Bar> {
    let mut bars = Vec::new();
    let mut t = 0usize;
    let mut prev_close = 100.0_f64;

    for day in 0..days {
        let session_open = Utc
            .with_ymd_and_hms(2024, 1, 2, 9, 0, 0)
            .unwrap()
            + Duration::days(i64::from(day));

        for slot in 0..108 {
            let timestamp = session_open + Duration::minutes(5 * slot);
            let level = 100.0
                + f64::from(day) * 0.8
                + (t as f64 * 0.13).sin() * 3.0
                + (t as f64 * 0.029).sin() * 5.0;

            let open = prev_close;
            let close = level;
            let high = open.max(close) + 0.4;
            let low = open.min(close) - 0.4;
            let volume = 1000.0 + (t as f64 * 0.41).cos().abs() * 500.0;

            bars.push(Bar::new(timestamp, open, high, low, close, volume));
            prev_close = close;
            t += 1;
        }
    }

    bars
}

/// Attach the indicator columns the generators look up. Warm-up bars
/// are left without values; the engine reads that as "no signal".
fn enrich(mut bars: Vec<Bar>) -> Vec<Bar> {
    const TREND_PERIOD: usize = 20;
    const SIGNAL_PERIOD: usize = 9;
    const BB_PERIOD: usize = 20;
    const ATR_PERIOD: usize = 14;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let true_ranges: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let hl = b.high - b.low;
            if i == 0 {
                hl
            } else {
                let prev_close = closes[i - 1];
                hl.max((b.high - prev_close).abs())
                    .max((b.low - prev_close).abs())
            }
        })
        .collect();

    for i in 0..bars.len() {
        if let Some(trend) = trailing_mean(&closes, i, TREND_PERIOD) {
            bars[i].indicators.insert(columns::TREND_MA.into(), trend);
        }
        if let Some(sig_high) = trailing_mean(&highs, i, SIGNAL_PERIOD) {
            bars[i]
                .indicators
                .insert(columns::SIGNAL_HIGH_MA.into(), sig_high);
        }
        if let Some(sig_low) = trailing_mean(&lows, i, SIGNAL_PERIOD) {
            bars[i]
                .indicators
                .insert(columns::SIGNAL_LOW_MA.into(), sig_low);
        }
        if let Some(mid) = trailing_mean(&closes, i, BB_PERIOD) {
            let window = &closes[i + 1 - BB_PERIOD..=i];
            let variance =
                window.iter().map(|c| (c - mid).powi(2)).sum::<f64>() / BB_PERIOD as f64;
            let dev = variance.sqrt() * 2.0;
            bars[i].indicators.insert(columns::BB_UPPER.into(), mid + dev);
            bars[i].indicators.insert(columns::BB_LOWER.into(), mid - dev);
        }
        if let Some(atr) = trailing_mean(&true_ranges, i, ATR_PERIOD) {
            bars[i].indicators.insert(columns::ATR.into(), atr);
        }
    }

    bars
}

fn trailing_mean(values: &[f64], index: usize, period: usize) -> Option<f64> {
    if index + 1 < period {
        return None;
    }
    let window = &values[index + 1 - period..=index];
    Some(window.iter().sum::<f64>() / period as f64)
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;

    println!("═══════════════════════════════════════════════════════════");
    println!("                     BACKTEST REPORT");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("RUN");
    println!("───────────────────────────────────────────────────────────");
    println!("  Strategy:            {}", result.metadata.strategy_name);
    println!("  Symbol / Timeframe:  {} / {}", result.metadata.symbol, result.metadata.timeframe);
    println!("  Period:              {}", result.metadata.period);
    println!("  Bars Processed:      {}", result.metadata.total_bars);
    println!();
    println!("PERFORMANCE");
    println!("───────────────────────────────────────────────────────────");
    println!("  Net Profit:          {:.2}", m.net_profit);
    println!("  Gross Profit:        {:.2}", m.gross_profit);
    println!("  Gross Loss:          {:.2}", m.gross_loss);
    println!("  Total Costs:         {:.2}", m.total_costs);
    println!("  Profit Factor:       {:.2}", m.profit_factor);
    println!();
    println!("TRADE STATISTICS");
    println!("───────────────────────────────────────────────────────────");
    println!("  Total Trades:        {}", m.total_trades);
    println!("  Winning Trades:      {}", m.winning_trades);
    println!("  Losing Trades:       {}", m.losing_trades);
    println!("  Win Rate:            {:.2}%", m.win_rate);
    println!("  Avg Trade:           {:.2}", m.avg_trade);
    println!("  Avg Winner:          {:.2}", m.avg_winner);
    println!("  Avg Loser:           {:.2}", m.avg_loser);
    println!();
    println!("═══════════════════════════════════════════════════════════");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_bars_are_well_formed() {
        let bars = synthetic_bars(2);
        assert_eq!(bars.len(), 216);

        for pair in bars.windows(2) {
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
        for b in &bars {
            assert!(b.high >= b.open.max(b.close));
            assert!(b.low <= b.open.min(b.close));
        }
    }

    #[test]
    fn test_enrich_attaches_indicators_after_warmup() {
        let bars = enrich(synthetic_bars(1));

        assert!(bars[0].indicator(columns::TREND_MA).is_none());
        assert!(bars[0].atr().is_none());

        let warmed = &bars[30];
        assert!(warmed.indicator(columns::TREND_MA).is_some());
        assert!(warmed.indicator(columns::SIGNAL_HIGH_MA).is_some());
        assert!(warmed.indicator(columns::SIGNAL_LOW_MA).is_some());
        assert!(warmed.atr().is_some());

        let upper = warmed.indicator(columns::BB_UPPER).unwrap();
        let lower = warmed.indicator(columns::BB_LOWER).unwrap();
        assert!(upper > lower);
    }
}
