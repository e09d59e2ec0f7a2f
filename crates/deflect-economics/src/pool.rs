// crates/deflect-economics/src/pool.rs
//
// A single reward stream: one reward asset emitted linearly over a window.
//
// Accrual model:
//   reward_per_token = stored + (applicable - last_update) * rate * multiplier / weighted_supply
//   earned           = accrued + weighted_stake * (reward_per_token - paid) / multiplier
// where `applicable = min(now, period_finish)` and `weighted_supply` is the
// total principal plus total boosted weight.
//
// While weighted supply is zero the index does not move but `last_update`
// still advances, so emission over that span is not owed to anyone.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use deflect_core::error::DeflectError;
use deflect_core::identity::{AssetId, Timestamp};

/// Lifecycle of a pool relative to a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolStatus {
    /// Registered but never started.
    Pending,
    /// Emitting: `now < period_finish`.
    Active,
    /// The last window has ended.
    Finished,
}

impl std::fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolStatus::Pending => write!(f, "Pending"),
            PoolStatus::Active => write!(f, "Active"),
            PoolStatus::Finished => write!(f, "Finished"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPool {
    pub reward_asset: AssetId,
    /// Amount emitted over the current window, including any carried-over
    /// remainder from an interrupted window.
    pub total_to_distribute: u128,
    pub duration: u64,
    pub period_finish: Timestamp,
    /// Base units emitted per second (`total_to_distribute / duration`).
    pub reward_rate: u128,
    pub reward_per_token_stored: U256,
    pub last_update_time: Timestamp,
    /// Emitted to stakers and not yet claimed. Custody must keep at least
    /// this much of the reward asset on top of the running window.
    pub reserved: u128,
    pub started: bool,
}

/// Result of bringing a pool's index up to date, computed before commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAccrual {
    pub reward_per_token: U256,
    pub last_update_time: Timestamp,
    /// Newly emitted to stakers over the accrued span.
    pub emitted: u128,
}

/// Rate and window produced by `RewardPool::plan_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartPlan {
    pub reward_rate: u128,
    pub total_to_distribute: u128,
    /// Unemitted reward carried over from the interrupted window.
    pub carried_over: u128,
}

impl RewardPool {
    pub fn new(reward_asset: AssetId) -> Self {
        Self {
            reward_asset,
            total_to_distribute: 0,
            duration: 0,
            period_finish: 0,
            reward_rate: 0,
            reward_per_token_stored: U256::zero(),
            last_update_time: 0,
            reserved: 0,
            started: false,
        }
    }

    pub fn status(&self, now: Timestamp) -> PoolStatus {
        if !self.started {
            PoolStatus::Pending
        } else if now < self.period_finish {
            PoolStatus::Active
        } else {
            PoolStatus::Finished
        }
    }

    pub fn last_time_reward_applicable(&self, now: Timestamp) -> Timestamp {
        now.min(self.period_finish)
    }

    /// Total the current window emits: `reward_rate * duration`.
    pub fn reward_for_duration(&self) -> u128 {
        self.reward_rate.saturating_mul(self.duration as u128)
    }

    /// Compute the index as if an update happened at `now`, without mutating.
    pub fn accrue(
        &self,
        now: Timestamp,
        weighted_supply: u128,
        multiplier: u128,
    ) -> Result<PoolAccrual, DeflectError> {
        let applicable = self.last_time_reward_applicable(now);
        if applicable <= self.last_update_time {
            return Ok(PoolAccrual {
                reward_per_token: self.reward_per_token_stored,
                last_update_time: self.last_update_time,
                emitted: 0,
            });
        }

        let elapsed = applicable - self.last_update_time;
        if weighted_supply == 0 {
            return Ok(PoolAccrual {
                reward_per_token: self.reward_per_token_stored,
                last_update_time: applicable,
                emitted: 0,
            });
        }

        let emitted_wide = U256::from(elapsed)
            .checked_mul(U256::from(self.reward_rate))
            .ok_or(DeflectError::MathOverflow("accrue: elapsed * rate"))?;
        let delta = emitted_wide
            .checked_mul(U256::from(multiplier))
            .ok_or(DeflectError::MathOverflow("accrue: emission * multiplier"))?
            / U256::from(weighted_supply);
        let reward_per_token = self
            .reward_per_token_stored
            .checked_add(delta)
            .ok_or(DeflectError::MathOverflow("accrue: reward_per_token"))?;

        Ok(PoolAccrual {
            reward_per_token,
            last_update_time: applicable,
            emitted: to_u128(emitted_wide, "accrue: emitted")?,
        })
    }

    pub fn apply_accrual(&mut self, accrual: &PoolAccrual) {
        self.reward_per_token_stored = accrual.reward_per_token;
        self.last_update_time = accrual.last_update_time;
        self.reserved = self.reserved.saturating_add(accrual.emitted);
    }

    /// Work out the new rate for a (re)start at `now`. Must be called on a
    /// pool whose index is already accrued to `now`.
    ///
    /// Mid-window, the unemitted remainder `(period_finish - now) * rate`
    /// is folded into the new window instead of being dropped.
    pub fn plan_start(
        &self,
        amount: u128,
        duration: u64,
        now: Timestamp,
    ) -> Result<StartPlan, DeflectError> {
        if amount == 0 {
            return Err(DeflectError::InvalidAmount(
                "reward amount must be positive".to_string(),
            ));
        }
        if duration == 0 {
            return Err(DeflectError::InvalidAmount(
                "pool duration must be positive".to_string(),
            ));
        }

        let carried_over = if now < self.period_finish {
            ((self.period_finish - now) as u128)
                .checked_mul(self.reward_rate)
                .ok_or(DeflectError::MathOverflow("plan_start: remaining"))?
        } else {
            0
        };
        let total_to_distribute = amount
            .checked_add(carried_over)
            .ok_or(DeflectError::MathOverflow("plan_start: total"))?;
        let reward_rate = total_to_distribute / duration as u128;
        if reward_rate == 0 {
            return Err(DeflectError::InvalidAmount(format!(
                "{} over {}s rounds to a zero reward rate",
                total_to_distribute, duration
            )));
        }

        Ok(StartPlan {
            reward_rate,
            total_to_distribute,
            carried_over,
        })
    }

    pub fn apply_start(&mut self, plan: &StartPlan, duration: u64, now: Timestamp) {
        self.reward_rate = plan.reward_rate;
        self.total_to_distribute = plan.total_to_distribute;
        self.duration = duration;
        self.last_update_time = now;
        self.period_finish = now.saturating_add(duration);
        self.started = true;
    }
}

/// `accrued + weighted_stake * (reward_per_token - paid) / multiplier`.
pub fn earned(
    weighted_stake: u128,
    reward_per_token: U256,
    reward_per_token_paid: U256,
    rewards_accrued: u128,
    multiplier: u128,
) -> Result<u128, DeflectError> {
    let delta = reward_per_token.saturating_sub(reward_per_token_paid);
    let fresh = U256::from(weighted_stake)
        .checked_mul(delta)
        .ok_or(DeflectError::MathOverflow("earned: stake * delta"))?
        / U256::from(multiplier);
    to_u128(fresh, "earned")?
        .checked_add(rewards_accrued)
        .ok_or(DeflectError::MathOverflow("earned: accrued"))
}

fn to_u128(value: U256, context: &'static str) -> Result<u128, DeflectError> {
    if value > U256::from(u128::MAX) {
        return Err(DeflectError::MathOverflow(context));
    }
    Ok(value.low_u128())
}
