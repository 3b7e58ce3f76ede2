//! Structured run events.
//!
//! The simulation loop reports progress through an injected sink
//! instead of printing, keeping presentation concerns out of the core.

use backtest_core::{CloseReason, Direction};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An event emitted by the simulation loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    RunStarted {
        strategy: String,
        total_bars: usize,
    },
    PositionOpened {
        time: DateTime<Utc>,
        direction: Direction,
        price: f64,
        quantity: u32,
    },
    PositionClosed {
        time: DateTime<Utc>,
        reason: CloseReason,
        price: f64,
        result: f64,
    },
    RunCompleted {
        total_trades: usize,
        net_profit: f64,
    },
}

/// Observer for simulation events.
pub trait EventSink: Send {
    fn on_event(&mut self, event: &SimEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &SimEvent) {}
}

/// Sink that keeps every event, mainly for tests and reporting.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub events: Vec<SimEvent>,
}

impl EventSink for CollectingSink {
    fn on_event(&mut self, event: &SimEvent) {
        self.events.push(event.clone());
    }
}
