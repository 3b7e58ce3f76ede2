//! Position and trade ledger types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a position or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1.0 for long, -1.0 for short. Used to fold the two symmetric
    /// P&L formulas into one.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloseReason {
    TakeProfit,
    StopLoss,
    EndOfSession,
    EndOfData,
}

/// The single open position. At most one exists at any simulated
/// instant; closing it produces an immutable [`Trade`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    /// Number of contracts (always positive; direction carries the sign)
    pub quantity: u32,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl Position {
    /// Favorable excursion in points of `price` relative to entry
    /// (positive when the position is in profit).
    pub fn excursion(&self, price: f64) -> f64 {
        self.direction.sign() * (price - self.entry_price)
    }

    /// Mark-to-market result in points at `price`, quantity applied.
    pub fn unrealized_points(&self, price: f64) -> f64 {
        self.excursion(price) * f64::from(self.quantity)
    }

    /// Whether the stored stop is still on the losing side of entry
    /// (the precondition for a break-even adjustment).
    pub fn stop_below_entry(&self) -> bool {
        match (self.direction, self.stop_loss) {
            (Direction::Long, Some(stop)) => stop < self.entry_price,
            (Direction::Short, Some(stop)) => stop > self.entry_price,
            (_, None) => false,
        }
    }

    /// Consume the position into a closed trade record.
    pub fn into_trade(
        self,
        exit_time: DateTime<Utc>,
        exit_price: f64,
        reason: CloseReason,
        result: f64,
    ) -> Trade {
        Trade {
            direction: self.direction,
            entry_time: self.entry_time,
            entry_price: self.entry_price,
            exit_time,
            exit_price,
            quantity: self.quantity,
            reason,
            result,
        }
    }
}

/// A closed trade appended to the ledger. Never mutated after closing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,
    pub quantity: u32,
    pub reason: CloseReason,
    /// Realized result in currency, per-trade cost already deducted
    pub result: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.result > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.result < 0.0
    }
}
