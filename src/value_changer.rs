//! Score deltas computed from a strategy and the owner's remaining time.

use crate::entities::{PenaltyStrategy, RewardStrategy};
use crate::error::{GameError, Result};

/// Anything that can report how much of its lifetime is left, as 0..=1.
pub trait TimeLeft {
    fn time_percentage_left(&self) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Reward(RewardStrategy),
    Penalty(PenaltyStrategy),
}

impl From<RewardStrategy> for Strategy {
    fn from(strategy: RewardStrategy) -> Self {
        Strategy::Reward(strategy)
    }
}

impl From<PenaltyStrategy> for Strategy {
    fn from(strategy: PenaltyStrategy) -> Self {
        Strategy::Penalty(strategy)
    }
}

impl Strategy {
    fn scales_with_time(self) -> bool {
        matches!(
            self,
            Strategy::Reward(RewardStrategy::TimeLeft) | Strategy::Penalty(PenaltyStrategy::TimeLeft)
        )
    }
}

/// Configuration (`strategy`, `stiff_value`, `base_value`, `base_multiplier`)
/// plus a cache of the last calculation (`value`, `multiplier`, `display`).
#[derive(Clone, Debug, PartialEq)]
pub struct ValueChanger {
    pub strategy: Option<Strategy>,
    pub stiff_value: f64,
    pub base_value: f64,
    pub base_multiplier: f64,
    pub value: i64,
    pub multiplier: f64,
    pub display: String,
}

impl Default for ValueChanger {
    fn default() -> Self {
        ValueChanger {
            strategy: None,
            stiff_value: 0.0,
            base_value: 0.0,
            base_multiplier: 1.0,
            value: 0,
            multiplier: 1.0,
            display: String::new(),
        }
    }
}

impl ValueChanger {
    pub fn new(
        strategy: impl Into<Strategy>,
        stiff_value: f64,
        base_value: f64,
        base_multiplier: f64,
    ) -> Self {
        ValueChanger {
            strategy: Some(strategy.into()),
            stiff_value,
            base_value,
            base_multiplier,
            ..ValueChanger::default()
        }
    }

    /// Recomputes `(value, multiplier)` for `owner` and refreshes the cache.
    ///
    /// Hard-set strategies ignore the owner entirely; time-left strategies
    /// scale `base_value` by the owner's remaining share of time. The value
    /// is floored to an integer.
    pub fn calculate(&mut self, owner: &impl TimeLeft) -> Result<(i64, f64)> {
        let strategy = self.strategy.ok_or(GameError::UnrecognizedStrategy)?;
        let raw = if strategy.scales_with_time() {
            self.stiff_value + self.base_value * owner.time_percentage_left()
        } else {
            self.stiff_value + self.base_value
        };
        self.value = raw.floor() as i64;
        self.multiplier = self.base_multiplier;
        self.display = signed_int(self.value);
        Ok((self.value, self.multiplier))
    }
}

/// `15` → `"+15"`, `0` → `"+0"`, `-3` → `"-3"`.
pub fn signed_int(value: i64) -> String {
    format!("{:+}", value)
}
