/// Coin balance tracking
///
/// Every inserted recording deposits one quarter. Enhancing a recording
/// costs the full balance once it reaches the call threshold.
use serde::{Deserialize, Serialize};

/// Value of a single quarter in cents
pub const QUARTER_CENTS: u32 = 25;

/// Minimum balance required to place a call, in cents
pub const CALL_THRESHOLD_CENTS: u32 = 50;

/// The booth's coin balance, in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinBalance {
    cents: u32,
}

impl CoinBalance {
    /// A balance of zero cents
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance in cents
    pub fn cents(&self) -> u32 {
        self.cents
    }

    /// Deposit one quarter and return the new balance
    pub fn insert_quarter(&mut self) -> u32 {
        self.cents = self.cents.saturating_add(QUARTER_CENTS);
        self.cents
    }

    /// Whether the balance meets the call threshold
    pub fn is_sufficient(&self) -> bool {
        self.cents >= CALL_THRESHOLD_CENTS
    }

    /// Consume the whole balance, returning it to zero
    pub fn reset(&mut self) {
        self.cents = 0;
    }

    /// Dollar-formatted balance, e.g. `$0.50`
    pub fn display(&self) -> String {
        format!("${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let balance = CoinBalance::new();
        assert_eq!(balance.cents(), 0);
        assert!(!balance.is_sufficient());
        assert_eq!(balance.display(), "$0.00");
    }

    #[test]
    fn one_quarter_is_not_enough() {
        let mut balance = CoinBalance::new();
        balance.insert_quarter();
        assert_eq!(balance.cents(), 25);
        assert!(!balance.is_sufficient());
        assert_eq!(balance.display(), "$0.25");
    }

    #[test]
    fn two_quarters_reach_the_threshold() {
        let mut balance = CoinBalance::new();
        balance.insert_quarter();
        balance.insert_quarter();
        assert_eq!(balance.cents(), 50);
        assert!(balance.is_sufficient());
        assert_eq!(balance.display(), "$0.50");
    }

    #[test]
    fn balance_accumulates_past_the_threshold() {
        let mut balance = CoinBalance::new();
        for _ in 0..5 {
            balance.insert_quarter();
        }
        assert_eq!(balance.cents(), 125);
        assert_eq!(balance.display(), "$1.25");
    }

    #[test]
    fn reset_consumes_everything() {
        let mut balance = CoinBalance::new();
        balance.insert_quarter();
        balance.insert_quarter();
        balance.insert_quarter();
        balance.reset();
        assert_eq!(balance.cents(), 0);
        assert!(!balance.is_sufficient());
    }
}
