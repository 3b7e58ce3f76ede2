//! Core types for the backtester.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarWindow)
//! - Position and trade ledger types
//! - Strategy configuration and parameter resolution
//! - Error types shared across the workspace

pub mod config;
pub mod error;
pub mod types;

pub use config::{ParamValue, RiskParams, StrategyConfig, StrategyInputs, StrategyParams};
pub use error::{EngineError, EngineResult};
pub use types::*;
