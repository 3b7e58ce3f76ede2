//! List recognized strategy parameters command.

use anyhow::Result;
use backtest_core::{RiskParams, StrategyInputs};

pub fn run() -> Result<()> {
    let inputs = StrategyInputs::default();
    let risk = RiskParams::default();

    println!("Recognized Strategy Parameters");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("  Entry");
    println!("  ───────────────────────────────────────────────────────");
    println!("  min_entry_score          {}", inputs.min_entry_score);
    println!("  weight_trend             {}", weight(&inputs, "trend"));
    println!("  weight_opening_range     {}", weight(&inputs, "opening_range"));
    println!("  weight_band              {}", weight(&inputs, "band"));
    println!("  range_start              {}", inputs.range_start);
    println!("  range_end                {}", inputs.range_end);
    println!();

    println!("  Exits");
    println!("  ───────────────────────────────────────────────────────");
    println!("  use_stop_loss            {}", inputs.use_stop_loss);
    println!("  use_take_profit          {}", inputs.use_take_profit);
    println!("  atr_stop_factor          {}", risk.atr_stop_factor);
    println!("  atr_target_factor        {}", risk.atr_target_factor);
    println!("  use_break_even           {}", inputs.use_break_even);
    println!("  break_even_trigger_atr   {}", inputs.break_even_trigger_atr);
    println!("  use_trailing_stop        {}", inputs.use_trailing_stop);
    println!("  trailing_trigger_atr     {}", inputs.trailing_trigger_atr);
    println!("  trailing_distance_atr    {}", inputs.trailing_distance_atr);
    println!();

    println!("  Session");
    println!("  ───────────────────────────────────────────────────────");
    println!("  session_close            {}", inputs.session_close);
    println!("  use_entry_window         {}", inputs.use_entry_window);
    println!("  entry_window_start       {}", inputs.entry_window_start);
    println!("  entry_window_end         {}", inputs.entry_window_end);
    println!();

    println!("  Daily Risk (0 disables a limit)");
    println!("  ───────────────────────────────────────────────────────");
    println!("  max_daily_loss           {}", risk.max_daily_loss);
    println!("  max_daily_profit         {}", risk.max_daily_profit);
    println!("  max_trades_per_day       {}", risk.max_trades_per_day);
    println!("  max_consecutive_losses   {}", risk.max_consecutive_losses);
    println!("  contracts_per_trade      {}", risk.contracts_per_trade);
    println!();

    println!("  Accounting");
    println!("  ───────────────────────────────────────────────────────");
    println!("  point_value              {}", inputs.point_value);
    println!("  cost_per_trade           {}", inputs.cost_per_trade);
    println!();

    println!("Unrecognized parameter names are ignored.");

    Ok(())
}

fn weight(inputs: &StrategyInputs, name: &str) -> f64 {
    inputs.weights.get(name).copied().unwrap_or(0.0)
}
