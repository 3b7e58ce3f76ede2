//! Core data types for the backtester.

mod bar;
mod trade;
mod window;

pub use bar::{columns, Bar};
pub use trade::{CloseReason, Direction, Position, Trade};
pub use window::BarWindow;
