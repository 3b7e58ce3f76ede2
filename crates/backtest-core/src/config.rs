//! Strategy configuration.
//!
//! The strategy-definition parser is an external collaborator: it hands
//! the engine a flat name -> value mapping ([`StrategyParams`]). The
//! core never parses text; it resolves the mapping into a strongly
//! typed [`StrategyConfig`] by looking up recognized parameter names
//! with documented defaults. Unrecognized names are ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};

/// A typed parameter value as produced by the strategy parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view; integers coerce to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ParamValue::Int(i) => u32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

/// Raw output of the strategy parser: a strategy name plus a flat
/// parameter map. Read-only for the duration of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Strategy name (run metadata)
    pub name: String,
    /// Flat name -> value parameter map
    #[serde(default)]
    pub params: HashMap<String, ParamValue>,
}

impl StrategyParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: HashMap::new(),
        }
    }

    /// Set a parameter (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    fn bool_or(&self, name: &str, default: bool) -> bool {
        self.params
            .get(name)
            .and_then(ParamValue::as_bool)
            .unwrap_or(default)
    }

    fn f64_or(&self, name: &str, default: f64) -> f64 {
        self.params
            .get(name)
            .and_then(ParamValue::as_f64)
            .unwrap_or(default)
    }

    fn u32_or(&self, name: &str, default: u32) -> u32 {
        self.params
            .get(name)
            .and_then(ParamValue::as_u32)
            .unwrap_or(default)
    }
}

/// Behavioral switches and thresholds.
///
/// Times of day are encoded as HHMM integers (17:50 -> 1750), matching
/// the parameter encoding used by the strategy definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInputs {
    /// Arm the initial ATR stop at entry
    pub use_stop_loss: bool,
    /// Arm the initial ATR target at entry
    pub use_take_profit: bool,
    /// Move the stop to entry once sufficiently in profit
    pub use_break_even: bool,
    /// Favorable ATR multiple that triggers break-even
    pub break_even_trigger_atr: f64,
    /// Tighten the stop as price moves favorably
    pub use_trailing_stop: bool,
    /// Favorable ATR multiple that arms the trailing stop
    pub trailing_trigger_atr: f64,
    /// ATR multiple between close and the trailed stop
    pub trailing_distance_atr: f64,
    /// Session close (HHMM); open positions are flattened at or past it
    pub session_close: u32,
    /// Gate entries to the trading window below
    pub use_entry_window: bool,
    /// Trading window start (HHMM)
    pub entry_window_start: u32,
    /// Trading window end (HHMM)
    pub entry_window_end: u32,
    /// Opening range definition start (HHMM)
    pub range_start: u32,
    /// Opening range definition end (HHMM)
    pub range_end: u32,
    /// Minimum weighted score an entry must reach
    pub min_entry_score: f64,
    /// Per-generator weights, keyed by generator name
    pub weights: HashMap<String, f64>,
    /// Currency value of one point of price movement per contract
    pub point_value: f64,
    /// Round-trip cost per trade, deducted at close
    pub cost_per_trade: f64,
}

impl Default for StrategyInputs {
    fn default() -> Self {
        Self {
            use_stop_loss: true,
            use_take_profit: true,
            use_break_even: false,
            break_even_trigger_atr: 0.8,
            use_trailing_stop: false,
            trailing_trigger_atr: 1.5,
            trailing_distance_atr: 1.2,
            session_close: 1750,
            use_entry_window: true,
            entry_window_start: 905,
            entry_window_end: 1745,
            range_start: 900,
            range_end: 915,
            min_entry_score: 0.5,
            weights: default_weights(),
            point_value: 1.0,
            cost_per_trade: 0.0,
        }
    }
}

fn default_weights() -> HashMap<String, f64> {
    [
        ("trend".to_string(), 0.4),
        ("opening_range".to_string(), 0.3),
        ("band".to_string(), 0.3),
    ]
    .into_iter()
    .collect()
}

/// Numeric risk limits. A limit of zero disables the corresponding
/// check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParams {
    /// Daily loss limit in currency (0 = disabled)
    pub max_daily_loss: f64,
    /// Daily profit goal in currency (0 = disabled)
    pub max_daily_profit: f64,
    /// Maximum entries per calendar date (0 = unlimited)
    pub max_trades_per_day: u32,
    /// Consecutive losing trades before entries are blocked (0 = disabled)
    pub max_consecutive_losses: u32,
    /// Contracts opened per entry
    pub contracts_per_trade: u32,
    /// ATR multiple for the initial stop distance
    pub atr_stop_factor: f64,
    /// ATR multiple for the initial target distance
    pub atr_target_factor: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            max_daily_loss: 0.0,
            max_daily_profit: 0.0,
            max_trades_per_day: 0,
            max_consecutive_losses: 0,
            contracts_per_trade: 1,
            atr_stop_factor: 2.0,
            atr_target_factor: 3.0,
        }
    }
}

/// Fully resolved strategy configuration consumed read-only by a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Strategy name (run metadata)
    pub name: String,
    /// Behavioral inputs
    pub inputs: StrategyInputs,
    /// Risk limits
    pub risk: RiskParams,
}

impl StrategyConfig {
    /// Resolve a raw parameter map into a typed configuration.
    ///
    /// Every recognized name falls back to its documented default when
    /// absent; unrecognized names are ignored.
    pub fn from_params(params: &StrategyParams) -> Self {
        let defaults = StrategyInputs::default();
        let mut weights = default_weights();
        // Any weight_<generator> key applies, not just the defaults;
        // custom generators are weighted the same way.
        for (key, value) in &params.params {
            if let Some(name) = key.strip_prefix("weight_") {
                if let Some(w) = value.as_f64() {
                    weights.insert(name.to_string(), w);
                }
            }
        }

        let inputs = StrategyInputs {
            use_stop_loss: params.bool_or("use_stop_loss", defaults.use_stop_loss),
            use_take_profit: params.bool_or("use_take_profit", defaults.use_take_profit),
            use_break_even: params.bool_or("use_break_even", defaults.use_break_even),
            break_even_trigger_atr: params
                .f64_or("break_even_trigger_atr", defaults.break_even_trigger_atr),
            use_trailing_stop: params.bool_or("use_trailing_stop", defaults.use_trailing_stop),
            trailing_trigger_atr: params
                .f64_or("trailing_trigger_atr", defaults.trailing_trigger_atr),
            trailing_distance_atr: params
                .f64_or("trailing_distance_atr", defaults.trailing_distance_atr),
            session_close: params.u32_or("session_close", defaults.session_close),
            use_entry_window: params.bool_or("use_entry_window", defaults.use_entry_window),
            entry_window_start: params.u32_or("entry_window_start", defaults.entry_window_start),
            entry_window_end: params.u32_or("entry_window_end", defaults.entry_window_end),
            range_start: params.u32_or("range_start", defaults.range_start),
            range_end: params.u32_or("range_end", defaults.range_end),
            min_entry_score: params.f64_or("min_entry_score", defaults.min_entry_score),
            weights,
            point_value: params.f64_or("point_value", defaults.point_value),
            cost_per_trade: params.f64_or("cost_per_trade", defaults.cost_per_trade),
        };

        let risk_defaults = RiskParams::default();
        let risk = RiskParams {
            max_daily_loss: params.f64_or("max_daily_loss", risk_defaults.max_daily_loss),
            max_daily_profit: params.f64_or("max_daily_profit", risk_defaults.max_daily_profit),
            max_trades_per_day: params.u32_or("max_trades_per_day", risk_defaults.max_trades_per_day),
            max_consecutive_losses: params
                .u32_or("max_consecutive_losses", risk_defaults.max_consecutive_losses),
            contracts_per_trade: params
                .u32_or("contracts_per_trade", risk_defaults.contracts_per_trade),
            atr_stop_factor: params.f64_or("atr_stop_factor", risk_defaults.atr_stop_factor),
            atr_target_factor: params.f64_or("atr_target_factor", risk_defaults.atr_target_factor),
        };

        Self {
            name: params.name.clone(),
            inputs,
            risk,
        }
    }

    /// Weight assigned to a generator, 0.0 for generators without one.
    pub fn weight_for(&self, generator: &str) -> f64 {
        self.inputs.weights.get(generator).copied().unwrap_or(0.0)
    }

    /// Validate before a run. Faults here abort the run before the
    /// simulation loop starts.
    pub fn validate(&self) -> EngineResult<()> {
        if self.risk.contracts_per_trade == 0 {
            return Err(EngineError::Config(
                "contracts_per_trade must be at least 1".into(),
            ));
        }
        if self.risk.atr_stop_factor <= 0.0 || self.risk.atr_target_factor <= 0.0 {
            return Err(EngineError::Config(
                "ATR stop/target factors must be positive".into(),
            ));
        }
        if self.inputs.min_entry_score < 0.0 {
            return Err(EngineError::Config(
                "min_entry_score must not be negative".into(),
            ));
        }
        if self.inputs.use_entry_window
            && self.inputs.entry_window_start > self.inputs.entry_window_end
        {
            return Err(EngineError::Config(
                "entry window start must not be after its end".into(),
            ));
        }
        if self.inputs.range_start > self.inputs.range_end {
            return Err(EngineError::Config(
                "opening range start must not be after its end".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_params_absent() {
        let config = StrategyConfig::from_params(&StrategyParams::new("Empty"));

        assert_eq!(config.name, "Empty");
        assert_eq!(config.inputs.session_close, 1750);
        assert_eq!(config.inputs.min_entry_score, 0.5);
        assert_eq!(config.risk.atr_stop_factor, 2.0);
        assert_eq!(config.risk.atr_target_factor, 3.0);
        assert_eq!(config.risk.contracts_per_trade, 1);
        assert_eq!(config.weight_for("trend"), 0.4);
        assert_eq!(config.weight_for("opening_range"), 0.3);
        assert_eq!(config.weight_for("band"), 0.3);
    }

    #[test]
    fn test_overrides_and_unrecognized_names() {
        let params = StrategyParams::new("Custom")
            .with("min_entry_score", 0.7)
            .with("max_trades_per_day", 3i64)
            .with("weight_trend", 0.6)
            .with("use_break_even", true)
            .with("no_such_parameter", 42i64);

        let config = StrategyConfig::from_params(&params);

        assert_eq!(config.inputs.min_entry_score, 0.7);
        assert_eq!(config.risk.max_trades_per_day, 3);
        assert_eq!(config.weight_for("trend"), 0.6);
        assert!(config.inputs.use_break_even);
    }

    #[test]
    fn test_int_coerces_to_float() {
        let params = StrategyParams::new("Coerce").with("atr_stop_factor", 2i64);
        let config = StrategyConfig::from_params(&params);
        assert_eq!(config.risk.atr_stop_factor, 2.0);
    }

    #[test]
    fn test_unknown_generator_weight_is_zero() {
        let config = StrategyConfig::default();
        assert_eq!(config.weight_for("unregistered"), 0.0);
    }

    #[test]
    fn test_weight_for_custom_generator_name() {
        let params = StrategyParams::new("Custom Generator")
            .with("weight_volume_spike", 0.7);
        let config = StrategyConfig::from_params(&params);

        assert_eq!(config.weight_for("volume_spike"), 0.7);
        // Default generator weights are untouched by the addition.
        assert_eq!(config.weight_for("trend"), 0.4);
    }

    #[test]
    fn test_validation() {
        let mut config = StrategyConfig::default();
        assert!(config.validate().is_ok());

        config.risk.contracts_per_trade = 0;
        assert!(config.validate().is_err());

        config.risk.contracts_per_trade = 1;
        config.inputs.entry_window_start = 1800;
        assert!(config.validate().is_err());
    }
}
