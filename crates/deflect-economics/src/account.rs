// crates/deflect-economics/src/account.rs
//
// Per-staker state: principal, boosted weight, purchased boost levels, and a
// reward checkpoint per pool.

use std::collections::BTreeMap;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use deflect_core::identity::{AssetId, PoolId, Timestamp};

/// Snapshot of a staker's position in one reward pool at their last
/// interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardCheckpoint {
    /// Pool accrual index when this checkpoint was taken.
    pub reward_per_token_paid: U256,
    /// Rewards banked and not yet claimed.
    pub rewards_accrued: u128,
}

/// A staker's position. Created on first stake or boost purchase and never
/// removed, even once the principal returns to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingAccount {
    /// Staking asset held in custody for this staker, net of transfer fees.
    pub principal: u128,
    /// Extra weight from boosts, derived from `principal`.
    pub boosted_weight: u128,
    /// Time of the most recent stake, for the withdrawal lock.
    pub last_stake_time: Timestamp,
    /// Purchased local boost level (1-based) per boost asset.
    pub local_levels: BTreeMap<AssetId, usize>,
    /// Reward checkpoint per pool. Missing entries are zero.
    pub checkpoints: BTreeMap<PoolId, RewardCheckpoint>,
}

impl StakingAccount {
    /// Weight used for proportional earning: principal plus boost.
    pub fn weighted_stake(&self) -> u128 {
        self.principal.saturating_add(self.boosted_weight)
    }

    pub fn checkpoint(&self, pool_id: PoolId) -> RewardCheckpoint {
        self.checkpoints.get(&pool_id).copied().unwrap_or_default()
    }

    /// Purchased level for `asset`, 0 if none.
    pub fn local_level(&self, asset: &AssetId) -> usize {
        self.local_levels.get(asset).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deflect_core::identity::Address;

    #[test]
    fn test_new_account_is_empty() {
        let account = StakingAccount::default();
        assert_eq!(account.weighted_stake(), 0);
        assert_eq!(account.checkpoint(3), RewardCheckpoint::default());
        assert_eq!(account.local_level(&Address::repeat_byte(1)), 0);
    }

    #[test]
    fn test_weighted_stake_includes_boost() {
        let account = StakingAccount {
            principal: 1_000,
            boosted_weight: 250,
            ..StakingAccount::default()
        };
        assert_eq!(account.weighted_stake(), 1_250);
    }
}
