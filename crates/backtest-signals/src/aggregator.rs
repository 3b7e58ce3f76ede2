//! Weighted-score signal aggregation.

use backtest_core::{Direction, StrategyConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of aggregating one bar's generator votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDecision {
    /// Summed weights of generators voting long
    pub buy_score: f64,
    /// Summed weights of generators voting short
    pub sell_score: f64,
    /// The entry direction, if any score won
    pub entry: Option<Direction>,
}

/// Combines generator votes into one entry decision.
///
/// Agnostic to the number and identity of generators: each vote is
/// weighted by the generator's configured weight (0.0 when none is
/// configured) and summed per direction. An entry fires when the
/// winning score reaches the minimum and strictly beats the opposing
/// score; ties produce no entry.
#[derive(Debug, Clone)]
pub struct SignalAggregator {
    min_score: f64,
    weights: HashMap<String, f64>,
}

impl SignalAggregator {
    pub fn new(min_score: f64, weights: HashMap<String, f64>) -> Self {
        Self { min_score, weights }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(
            config.inputs.min_entry_score,
            config.inputs.weights.clone(),
        )
    }

    fn weight(&self, generator: &str) -> f64 {
        self.weights.get(generator).copied().unwrap_or(0.0)
    }

    /// Aggregate named votes into a decision.
    pub fn decide(&self, votes: &[(&str, Option<Direction>)]) -> ScoreDecision {
        let mut buy_score = 0.0;
        let mut sell_score = 0.0;

        for (name, vote) in votes {
            match vote {
                Some(Direction::Long) => buy_score += self.weight(name),
                Some(Direction::Short) => sell_score += self.weight(name),
                None => {}
            }
        }

        let entry = if buy_score >= self.min_score && buy_score > sell_score {
            Some(Direction::Long)
        } else if sell_score >= self.min_score && sell_score > buy_score {
            Some(Direction::Short)
        } else {
            None
        };

        ScoreDecision {
            buy_score,
            sell_score,
            entry,
        }
    }
}
