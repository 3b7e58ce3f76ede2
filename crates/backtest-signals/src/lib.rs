//! Signal generators and score aggregation.
//!
//! Each generator maps the current bar window to a directional vote;
//! the aggregator combines the votes into a single weighted entry
//! decision. Generators are independent: adding one does not change
//! the aggregation logic, which only knows names and weights.

mod aggregator;
mod band;
mod generator;
mod opening_range;
mod trend;

pub use aggregator::{ScoreDecision, SignalAggregator};
pub use band::BandBreakout;
pub use generator::SignalGenerator;
pub use opening_range::OpeningRange;
pub use trend::TrendBreakout;

use backtest_core::StrategyConfig;

/// Build the default generator set for a configuration.
pub fn default_generators(config: &StrategyConfig) -> Vec<Box<dyn SignalGenerator>> {
    vec![
        Box::new(TrendBreakout::new()),
        Box::new(OpeningRange::from_config(config)),
        Box::new(BandBreakout::new()),
    ]
}
