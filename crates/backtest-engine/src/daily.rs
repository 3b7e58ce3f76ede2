//! Daily risk controls.

use backtest_core::RiskParams;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-run daily risk state.
///
/// The per-day counters reset exactly once, on the first bar whose
/// calendar date differs from the stored one. The consecutive-loss
/// counter and its gate are not part of the daily reset: a loss streak
/// carries across day boundaries until a winning trade clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyRiskState {
    /// Last calendar date seen by the loop
    pub last_date: Option<NaiveDate>,
    /// Entries opened on the current date
    pub trades_today: u32,
    /// Cumulative realized result for the current date
    pub daily_result: f64,
    /// Losing trades in a row, across days
    pub consecutive_losses: u32,
    /// Entries blocked because a daily profit/loss limit was hit
    pub goal_blocked: bool,
    /// Entries blocked by the consecutive-loss limit
    pub loss_streak_blocked: bool,
}

impl DailyRiskState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-bar update: date rollover plus goal-gate refresh.
    pub fn on_bar(&mut self, date: NaiveDate, risk: &RiskParams) {
        if self.last_date != Some(date) {
            self.last_date = Some(date);
            self.trades_today = 0;
            self.daily_result = 0.0;
            self.goal_blocked = false;
        }
        self.refresh_goal_gate(risk);
    }

    /// Latch the goal gate once the daily result breaches a configured
    /// limit. Limits of zero disable the check. The gate only clears
    /// at the next date rollover.
    fn refresh_goal_gate(&mut self, risk: &RiskParams) {
        if risk.max_daily_profit > 0.0 && self.daily_result >= risk.max_daily_profit {
            self.goal_blocked = true;
        }
        if risk.max_daily_loss > 0.0 && self.daily_result <= -risk.max_daily_loss {
            self.goal_blocked = true;
        }
    }

    /// Side effect of opening a position.
    pub fn record_entry(&mut self) {
        self.trades_today += 1;
    }

    /// Account for a closed trade's realized result.
    pub fn record_close(&mut self, result: f64, risk: &RiskParams) {
        self.daily_result += result;

        if result < 0.0 {
            self.consecutive_losses += 1;
        } else {
            self.consecutive_losses = 0;
            self.loss_streak_blocked = false;
        }

        if risk.max_consecutive_losses > 0
            && self.consecutive_losses >= risk.max_consecutive_losses
        {
            self.loss_streak_blocked = true;
        }

        self.refresh_goal_gate(risk);
    }

    /// Entry precondition: no gate set and the daily trade budget not
    /// yet exhausted (0 = unlimited).
    pub fn entry_allowed(&self, risk: &RiskParams) -> bool {
        if self.goal_blocked || self.loss_streak_blocked {
            return false;
        }
        risk.max_trades_per_day == 0 || self.trades_today < risk.max_trades_per_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_daily_loss_limit_blocks_until_next_date() {
        let risk = RiskParams {
            max_daily_loss: 100.0,
            ..RiskParams::default()
        };
        let mut state = DailyRiskState::new();

        state.on_bar(date(2), &risk);
        state.record_close(-120.0, &risk);
        assert!(state.goal_blocked);
        assert!(!state.entry_allowed(&risk));

        // Still blocked on later bars of the same date.
        state.on_bar(date(2), &risk);
        assert!(!state.entry_allowed(&risk));

        // Unblocks at the first bar of the next date.
        state.on_bar(date(3), &risk);
        assert!(!state.goal_blocked);
        assert!(state.entry_allowed(&risk));
        assert_eq!(state.daily_result, 0.0);
        assert_eq!(state.trades_today, 0);
    }

    #[test]
    fn test_profit_goal_latches() {
        let risk = RiskParams {
            max_daily_profit: 200.0,
            ..RiskParams::default()
        };
        let mut state = DailyRiskState::new();

        state.on_bar(date(2), &risk);
        state.record_close(250.0, &risk);
        assert!(state.goal_blocked);

        // A later loss does not reopen the day.
        state.record_close(-100.0, &risk);
        state.on_bar(date(2), &risk);
        assert!(state.goal_blocked);
    }

    #[test]
    fn test_loss_streak_gate_persists_across_days() {
        let risk = RiskParams {
            max_consecutive_losses: 3,
            ..RiskParams::default()
        };
        let mut state = DailyRiskState::new();

        state.on_bar(date(2), &risk);
        state.record_close(-10.0, &risk);
        state.record_close(-10.0, &risk);
        assert!(!state.loss_streak_blocked);

        state.record_close(-10.0, &risk);
        assert!(state.loss_streak_blocked);

        // Daily rollover does not clear the streak gate.
        state.on_bar(date(3), &risk);
        assert!(state.loss_streak_blocked);
        assert_eq!(state.consecutive_losses, 3);
        assert!(!state.entry_allowed(&risk));

        // A winning trade resets the counter and clears the gate.
        state.record_close(50.0, &risk);
        assert_eq!(state.consecutive_losses, 0);
        assert!(!state.loss_streak_blocked);
        assert!(state.entry_allowed(&risk));
    }

    #[test]
    fn test_trade_budget() {
        let risk = RiskParams {
            max_trades_per_day: 2,
            ..RiskParams::default()
        };
        let mut state = DailyRiskState::new();

        state.on_bar(date(2), &risk);
        assert!(state.entry_allowed(&risk));
        state.record_entry();
        state.record_entry();
        assert!(!state.entry_allowed(&risk));

        state.on_bar(date(3), &risk);
        assert!(state.entry_allowed(&risk));
    }

    #[test]
    fn test_zero_limits_disable_checks() {
        let risk = RiskParams::default();
        let mut state = DailyRiskState::new();

        state.on_bar(date(2), &risk);
        state.record_close(-1_000_000.0, &risk);
        for _ in 0..100 {
            state.record_entry();
        }
        assert!(state.entry_allowed(&risk));
    }
}
