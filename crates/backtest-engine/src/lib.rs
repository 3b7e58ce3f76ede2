//! Bar-by-bar simulation engine.
//!
//! Replays an indicator-enriched bar sequence through a configured
//! strategy: signal aggregation for entries, stop/target/break-even/
//! trailing management for exits, daily risk gating, and an equity
//! point recorded every bar. A run is strictly sequential; all mutable
//! state is scoped to the run and discarded at its end.

mod daily;
mod engine;
mod events;
mod metrics;
mod position;
mod result;

pub use daily::DailyRiskState;
pub use engine::BacktestEngine;
pub use events::{CollectingSink, EventSink, NullSink, SimEvent};
pub use metrics::Metrics;
pub use position::PositionManager;
pub use result::{BacktestResult, EquityPoint, RunMetadata};
