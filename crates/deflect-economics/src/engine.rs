// crates/deflect-economics/src/engine.rs
//
// RewardDistributionEngine: one staking asset, many reward pools.
//
// Every state-changing call follows the same shape:
//   1. validate arguments and caller
//   2. `settle`: accrue every pool to `now` and checkpoint the caller, into
//      locals only
//   3. compute the caller's new principal and boosted weight (checked)
//   4. move assets through the ledger
//   5. `commit` the settlement and the new weights
// Steps 1-4 can fail; step 5 cannot. A failed call therefore leaves the
// engine untouched. Callers needing shared access wrap the engine in a
// single-writer lock (see deflect-deploy's SharedEngine).

use std::collections::BTreeMap;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::account::{RewardCheckpoint, StakingAccount};
use crate::boost::{boosted_weight, BoostTable, GlobalBoost};
use crate::fees::{BoostPaymentSplit, FeeSchedule, WithdrawalSplit};
use crate::pool::{earned as accrued_earnings, PoolAccrual, PoolStatus, RewardPool, StartPlan};
use crate::token::{unit_multiplier, DEFAULT_DECIMALS};
use deflect_core::error::DeflectError;
use deflect_core::identity::{Address, AssetId, PoolId, Timestamp};
use deflect_core::traits::{AssetLedger, Clock};

/// Static parameters of a staking contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Asset stakers deposit.
    pub staking_asset: AssetId,
    /// Decimals of the staking asset; fixes the accrual multiplier.
    #[serde(default = "default_staking_decimals")]
    pub staking_decimals: u32,
    /// Address allowed to run administrative calls.
    pub admin: Address,
    /// The engine's own holding address on the ledger.
    pub custody: Address,
    /// Receives withdrawal fees and the treasury share of boost purchases.
    pub treasury: Address,
    /// Receives the dev share of boost purchases.
    pub dev_fund: Address,
    #[serde(default)]
    pub fees: FeeSchedule,
    /// Seconds after the latest stake before a withdrawal is allowed.
    #[serde(default)]
    pub lock_duration: u64,
}

fn default_staking_decimals() -> u32 {
    DEFAULT_DECIMALS
}

/// What `exit` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReceipt {
    pub withdrawn: Option<WithdrawalSplit>,
    pub claimed: Vec<(PoolId, u128)>,
}

/// Accrued pool indices and caller checkpoints, not yet written back.
struct Settlement {
    now: Timestamp,
    pools: Vec<PoolAccrual>,
    account: Option<(Address, Vec<RewardCheckpoint>)>,
}

impl Settlement {
    fn checkpoints_mut(&mut self) -> &mut [RewardCheckpoint] {
        self.account
            .as_mut()
            .map(|(_, checkpoints)| checkpoints.as_mut_slice())
            .unwrap_or_default()
    }
}

/// A staker's weights and the supply totals after a principal change.
struct Reweigh {
    principal: u128,
    boosted_weight: u128,
    total_supply: u128,
    boosted_total_supply: u128,
}

pub struct RewardDistributionEngine<L, C> {
    config: EngineConfig,
    multiplier: u128,
    pools: Vec<RewardPool>,
    accounts: BTreeMap<Address, StakingAccount>,
    total_supply: u128,
    boosted_total_supply: u128,
    local_boosts: BTreeMap<AssetId, BoostTable>,
    global_boost: Option<GlobalBoost>,
    ledger: L,
    clock: C,
}

impl<L: AssetLedger, C: Clock> RewardDistributionEngine<L, C> {
    /// Create an engine with no pools and no stakers.
    ///
    /// # Errors
    /// Returns `DeflectError::InvalidParameter` for unsupported decimals or
    /// an invalid fee schedule.
    pub fn new(config: EngineConfig, ledger: L, clock: C) -> Result<Self, DeflectError> {
        config.fees.validate()?;
        let multiplier = unit_multiplier(config.staking_decimals)?;
        if config.custody == config.treasury || config.custody == config.dev_fund {
            return Err(DeflectError::InvalidParameter(
                "custody address must differ from treasury and dev fund".to_string(),
            ));
        }

        tracing::info!(
            "Reward engine for staking asset {} (multiplier {}, custody {})",
            config.staking_asset,
            multiplier,
            config.custody
        );

        Ok(Self {
            config,
            multiplier,
            pools: Vec::new(),
            accounts: BTreeMap::new(),
            total_supply: 0,
            boosted_total_supply: 0,
            local_boosts: BTreeMap::new(),
            global_boost: None,
            ledger,
            clock,
        })
    }

    // ---------------------------------------------------------------
    // Administrative operations
    // ---------------------------------------------------------------

    /// Register a reward pool for `reward_asset` at the next index.
    ///
    /// # Errors
    /// `Unauthorized`, `DuplicatePool`, or `InvalidParameter` when the reward
    /// asset is the staking asset.
    pub fn add_reward_pool(&mut self, caller: &Address, reward_asset: AssetId) -> Result<PoolId, DeflectError> {
        self.ensure_admin(caller)?;
        if reward_asset == self.config.staking_asset {
            return Err(DeflectError::InvalidParameter(
                "reward asset cannot be the staking asset".to_string(),
            ));
        }
        if self.pools.iter().any(|p| p.reward_asset == reward_asset) {
            return Err(DeflectError::DuplicatePool(reward_asset));
        }

        self.pools.push(RewardPool::new(reward_asset));
        let pool_id = self.pools.len() - 1;
        tracing::info!("Reward pool {} added for asset {}", pool_id, reward_asset);
        Ok(pool_id)
    }

    /// Start, or restart, emission of `amount` over `duration` seconds.
    ///
    /// The reward asset must already sit in custody. Restarting before the
    /// window ends folds the unemitted remainder into the new window.
    ///
    /// # Errors
    /// `Unauthorized`, `UnknownPool`, `InvalidAmount` (zero amount, zero
    /// duration, or a rate that rounds to zero), `InsufficientRewardBalance`.
    pub fn start_reward_pool(
        &mut self,
        caller: &Address,
        pool_id: PoolId,
        amount: u128,
        duration: u64,
    ) -> Result<StartPlan, DeflectError> {
        self.ensure_admin(caller)?;
        self.pool(pool_id)?;

        let settlement = self.settle(None)?;
        let now = settlement.now;
        let mut flushed = self.pools[pool_id].clone();
        flushed.apply_accrual(&settlement.pools[pool_id]);

        let plan = flushed.plan_start(amount, duration, now)?;
        let required = plan
            .reward_rate
            .checked_mul(duration as u128)
            .and_then(|window| window.checked_add(flushed.reserved))
            .ok_or(DeflectError::MathOverflow("start_reward_pool: required"))?;
        let available = self.ledger.balance_of(&flushed.reward_asset, &self.config.custody);
        if available < required {
            return Err(DeflectError::InsufficientRewardBalance { required, available });
        }

        self.commit(settlement);
        self.pools[pool_id].apply_start(&plan, duration, now);
        tracing::info!(
            "Reward pool {} started at {}: {} over {}s (rate {}/s, carried over {})",
            pool_id,
            now,
            plan.total_to_distribute,
            duration,
            plan.reward_rate,
            plan.carried_over
        );
        Ok(plan)
    }

    /// Configure purchasable boost tiers for `boost_asset`.
    pub fn add_local_boost(
        &mut self,
        caller: &Address,
        boost_asset: AssetId,
        thresholds: &[u128],
        weights_bps: &[u32],
    ) -> Result<(), DeflectError> {
        self.ensure_admin(caller)?;
        if self.local_boosts.contains_key(&boost_asset) {
            return Err(DeflectError::InvalidParameter(format!(
                "local boost for {} already exists; use update_local_boost",
                boost_asset
            )));
        }
        let table = BoostTable::new(thresholds, weights_bps)?;
        tracing::info!("Local boost added for {} with {} tiers", boost_asset, table.len());
        self.local_boosts.insert(boost_asset, table);
        Ok(())
    }

    /// Replace the tiers of an existing local boost. Holders keep their
    /// purchased level; its new weight applies from their next interaction.
    /// A level above the new top tier counts as the top tier until the table
    /// grows back.
    pub fn update_local_boost(
        &mut self,
        caller: &Address,
        boost_asset: AssetId,
        thresholds: &[u128],
        weights_bps: &[u32],
    ) -> Result<(), DeflectError> {
        self.ensure_admin(caller)?;
        if !self.local_boosts.contains_key(&boost_asset) {
            return Err(DeflectError::InvalidParameter(format!(
                "no local boost configured for {}",
                boost_asset
            )));
        }
        let table = BoostTable::new(thresholds, weights_bps)?;
        tracing::info!("Local boost updated for {} with {} tiers", boost_asset, table.len());
        self.local_boosts.insert(boost_asset, table);
        Ok(())
    }

    /// Configure the balance-gated boost on `governance_asset`, replacing any
    /// previous one.
    pub fn add_global_boost(
        &mut self,
        caller: &Address,
        governance_asset: AssetId,
        thresholds: &[u128],
        weights_bps: &[u32],
    ) -> Result<(), DeflectError> {
        self.ensure_admin(caller)?;
        let table = BoostTable::new(thresholds, weights_bps)?;
        if self.global_boost.is_some() {
            tracing::warn!("Replacing existing global boost with one on {}", governance_asset);
        }
        tracing::info!(
            "Global boost set on {} with {} tiers",
            governance_asset,
            table.len()
        );
        self.global_boost = Some(GlobalBoost {
            asset: governance_asset,
            table,
        });
        Ok(())
    }

    pub fn set_fees(&mut self, caller: &Address, withdraw_fee_bps: u32, token_fee_bps: u32) -> Result<(), DeflectError> {
        self.ensure_admin(caller)?;
        let fees = FeeSchedule {
            withdraw_fee_bps,
            token_fee_bps,
            ..self.config.fees
        };
        fees.validate()?;
        self.config.fees = fees;
        tracing::info!(
            "Fees set: withdraw {} bps, token {} bps",
            withdraw_fee_bps,
            token_fee_bps
        );
        Ok(())
    }

    pub fn set_lock_duration(&mut self, caller: &Address, seconds: u64) -> Result<(), DeflectError> {
        self.ensure_admin(caller)?;
        self.config.lock_duration = seconds;
        tracing::info!("Lock duration set to {}s", seconds);
        Ok(())
    }

    pub fn transfer_admin(&mut self, caller: &Address, new_admin: Address) -> Result<(), DeflectError> {
        self.ensure_admin(caller)?;
        if new_admin.is_zero() {
            return Err(DeflectError::InvalidParameter(
                "new admin cannot be the zero address".to_string(),
            ));
        }
        tracing::info!("Admin transferred from {} to {}", self.config.admin, new_admin);
        self.config.admin = new_admin;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Staker operations
    // ---------------------------------------------------------------

    /// Deposit `amount` of the staking asset. Returns the amount credited,
    /// which is what custody actually received.
    ///
    /// # Errors
    /// `InvalidAmount` for zero or a deposit fully eaten by transfer fees;
    /// ledger errors such as `InsufficientBalance`.
    pub fn stake(&mut self, caller: &Address, amount: u128) -> Result<u128, DeflectError> {
        if amount == 0 {
            return Err(DeflectError::InvalidAmount(
                "cannot stake 0".to_string(),
            ));
        }

        let settlement = self.settle(Some(caller))?;
        let levels = self.levels_of(caller);
        let principal = self.balance_of(caller);
        let ceiling = principal
            .checked_add(amount)
            .ok_or(DeflectError::MathOverflow("stake: principal"))?;
        self.reweigh(caller, &levels, ceiling)?;

        let staking_asset = self.config.staking_asset;
        let custody = self.config.custody;
        let received = self.ledger.transfer_in(&staking_asset, caller, &custody, amount)?;
        let reweigh = self.reweigh(caller, &levels, principal + received)?;

        let now = settlement.now;
        self.commit(settlement);
        self.apply_reweigh(caller, &reweigh);
        if let Some(account) = self.accounts.get_mut(caller) {
            account.last_stake_time = now;
        }

        tracing::debug!(
            "{} staked {} (received {}), principal now {}",
            caller,
            amount,
            received,
            reweigh.principal
        );
        Ok(received)
    }

    /// Withdraw `amount` of principal, less the withdraw and token fees.
    ///
    /// # Errors
    /// `InvalidAmount`, `InsufficientBalance`, `StakeLocked`.
    pub fn withdraw(&mut self, caller: &Address, amount: u128) -> Result<WithdrawalSplit, DeflectError> {
        if amount == 0 {
            return Err(DeflectError::InvalidAmount(
                "cannot withdraw 0".to_string(),
            ));
        }
        let principal = self.balance_of(caller);
        if amount > principal {
            return Err(DeflectError::InsufficientBalance {
                requested: amount,
                available: principal,
            });
        }
        self.ensure_unlocked(caller)?;

        let settlement = self.settle(Some(caller))?;
        let split = self.config.fees.split_withdrawal(amount)?;
        let levels = self.levels_of(caller);
        let reweigh = self.reweigh(caller, &levels, principal - amount)?;

        let staking_asset = self.config.staking_asset;
        let custody = self.config.custody;
        self.ledger
            .transfer_out(&staking_asset, &custody, caller, split.to_staker)?;
        if split.to_treasury > 0 {
            let treasury = self.config.treasury;
            self.ledger
                .transfer_out(&staking_asset, &custody, &treasury, split.to_treasury)?;
        }
        if split.burned > 0 {
            self.ledger
                .transfer_out(&staking_asset, &custody, &Address::DEAD, split.burned)?;
        }

        self.commit(settlement);
        self.apply_reweigh(caller, &reweigh);

        tracing::debug!(
            "{} withdrew {} (received {}, treasury fee {}, burned {})",
            caller,
            amount,
            split.to_staker,
            split.to_treasury,
            split.burned
        );
        Ok(split)
    }

    /// Buy local boost `level` (1-based) of `boost_asset` at its threshold
    /// price. Only upgrades are accepted.
    ///
    /// # Errors
    /// `UnknownTier`, `BoostAlreadyOwned`, `InvalidAmount` when transfer fees
    /// consume the whole payment, ledger errors.
    pub fn purchase(
        &mut self,
        caller: &Address,
        boost_asset: AssetId,
        level: usize,
    ) -> Result<BoostPaymentSplit, DeflectError> {
        let unknown = DeflectError::UnknownTier {
            asset: boost_asset,
            level,
        };
        let table = self.local_boosts.get(&boost_asset).ok_or(unknown.clone())?;
        let tier = *table.level(level).ok_or(unknown)?;
        let held = self
            .accounts
            .get(caller)
            .map(|a| table.effective_level(a.local_level(&boost_asset)))
            .unwrap_or(0);
        if level <= held {
            return Err(DeflectError::BoostAlreadyOwned {
                asset: boost_asset,
                held,
                requested: level,
            });
        }

        let settlement = self.settle(Some(caller))?;
        let mut levels = self.levels_of(caller);
        levels.insert(boost_asset, level);
        let principal = self.balance_of(caller);
        self.reweigh(caller, &levels, principal)?;

        let custody = self.config.custody;
        let received = self
            .ledger
            .transfer_in(&boost_asset, caller, &custody, tier.threshold)?;
        let split = self.config.fees.split_boost_payment(received)?;
        if split.to_dev_fund > 0 {
            let dev_fund = self.config.dev_fund;
            self.ledger
                .transfer_out(&boost_asset, &custody, &dev_fund, split.to_dev_fund)?;
        }
        if split.to_treasury > 0 {
            let treasury = self.config.treasury;
            self.ledger
                .transfer_out(&boost_asset, &custody, &treasury, split.to_treasury)?;
        }
        let reweigh = self.reweigh(caller, &levels, principal)?;

        self.commit(settlement);
        self.apply_reweigh(caller, &reweigh);
        if let Some(account) = self.accounts.get_mut(caller) {
            account.local_levels = levels;
        }

        tracing::debug!(
            "{} bought boost level {} of {} for {} (dev {}, treasury {})",
            caller,
            level,
            boost_asset,
            received,
            split.to_dev_fund,
            split.to_treasury
        );
        Ok(split)
    }

    /// Pay out everything `caller` has earned from `pool_id`.
    pub fn claim(&mut self, caller: &Address, pool_id: PoolId) -> Result<u128, DeflectError> {
        self.pool(pool_id)?;
        let claimed = self.claim_pools(caller, &[pool_id])?;
        Ok(claimed.first().map(|(_, amount)| *amount).unwrap_or(0))
    }

    /// Claim from every pool. Returns the non-zero payouts.
    pub fn claim_all(&mut self, caller: &Address) -> Result<Vec<(PoolId, u128)>, DeflectError> {
        let pool_ids: Vec<PoolId> = (0..self.pools.len()).collect();
        let claimed = self.claim_pools(caller, &pool_ids)?;
        Ok(claimed.into_iter().filter(|(_, amount)| *amount > 0).collect())
    }

    /// Claim every pool, then withdraw the whole principal.
    ///
    /// Every check the withdrawal makes runs before the first claim pays out,
    /// so a rejected exit moves nothing.
    pub fn exit(&mut self, caller: &Address) -> Result<ExitReceipt, DeflectError> {
        let principal = self.balance_of(caller);
        if principal > 0 {
            self.ensure_unlocked(caller)?;
            self.config.fees.split_withdrawal(principal)?;
            let staking_asset = self.config.staking_asset;
            let held = self.ledger.balance_of(&staking_asset, &self.config.custody);
            if held < principal {
                return Err(DeflectError::InsufficientBalance {
                    requested: principal,
                    available: held,
                });
            }
        }
        let claimed = self.claim_all(caller)?;
        let withdrawn = if principal > 0 {
            Some(self.withdraw(caller, principal)?)
        } else {
            None
        };
        Ok(ExitReceipt { withdrawn, claimed })
    }

    /// Re-derive `account`'s boosted weight from current boost tables and
    /// governance balance. Anyone may call this. Returns the new weight.
    pub fn refresh_boost(&mut self, account: &Address) -> Result<u128, DeflectError> {
        if !self.accounts.contains_key(account) {
            return Ok(0);
        }
        let settlement = self.settle(Some(account))?;
        let levels = self.levels_of(account);
        let reweigh = self.reweigh(account, &levels, self.balance_of(account))?;
        self.commit(settlement);
        self.apply_reweigh(account, &reweigh);
        Ok(reweigh.boosted_weight)
    }

    // ---------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------

    /// Rewards `account` could claim from `pool_id` right now.
    pub fn earned(&self, account: &Address, pool_id: PoolId) -> Result<u128, DeflectError> {
        let accrual = self
            .pool(pool_id)?
            .accrue(self.clock.now(), self.weighted_supply()?, self.multiplier)?;
        match self.accounts.get(account) {
            Some(staker) => {
                let checkpoint = staker.checkpoint(pool_id);
                accrued_earnings(
                    staker.weighted_stake(),
                    accrual.reward_per_token,
                    checkpoint.reward_per_token_paid,
                    checkpoint.rewards_accrued,
                    self.multiplier,
                )
            }
            None => Ok(0),
        }
    }

    /// Accrual index of `pool_id` projected to now.
    pub fn reward_per_token(&self, pool_id: PoolId) -> Result<U256, DeflectError> {
        let accrual = self
            .pool(pool_id)?
            .accrue(self.clock.now(), self.weighted_supply()?, self.multiplier)?;
        Ok(accrual.reward_per_token)
    }

    pub fn last_time_reward_applicable(&self, pool_id: PoolId) -> Result<Timestamp, DeflectError> {
        Ok(self.pool(pool_id)?.last_time_reward_applicable(self.clock.now()))
    }

    pub fn reward_for_duration(&self, pool_id: PoolId) -> Result<u128, DeflectError> {
        Ok(self.pool(pool_id)?.reward_for_duration())
    }

    pub fn pool_status(&self, pool_id: PoolId) -> Result<PoolStatus, DeflectError> {
        Ok(self.pool(pool_id)?.status(self.clock.now()))
    }

    pub fn pool(&self, pool_id: PoolId) -> Result<&RewardPool, DeflectError> {
        self.pools.get(pool_id).ok_or(DeflectError::UnknownPool(pool_id))
    }

    pub fn pools(&self) -> &[RewardPool] {
        &self.pools
    }

    pub fn pool_length(&self) -> usize {
        self.pools.len()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.accounts.get(account).map(|a| a.principal).unwrap_or(0)
    }

    pub fn boosted_balance_of(&self, account: &Address) -> u128 {
        self.accounts.get(account).map(|a| a.boosted_weight).unwrap_or(0)
    }

    pub fn account(&self, account: &Address) -> Option<&StakingAccount> {
        self.accounts.get(account)
    }

    pub fn stakers(&self) -> impl Iterator<Item = (&Address, &StakingAccount)> {
        self.accounts.iter()
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn boosted_total_supply(&self) -> u128 {
        self.boosted_total_supply
    }

    pub fn staking_asset_multiplier(&self) -> u128 {
        self.multiplier
    }

    pub fn local_boost(&self, boost_asset: &AssetId) -> Option<&BoostTable> {
        self.local_boosts.get(boost_asset)
    }

    pub fn global_boost(&self) -> Option<&GlobalBoost> {
        self.global_boost.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access for funding custody and minting in tests. Never
    /// use it to move assets the engine accounts for.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn ensure_admin(&self, caller: &Address) -> Result<(), DeflectError> {
        if *caller != self.config.admin {
            return Err(DeflectError::Unauthorized(*caller));
        }
        Ok(())
    }

    fn ensure_unlocked(&self, caller: &Address) -> Result<(), DeflectError> {
        if self.config.lock_duration == 0 {
            return Ok(());
        }
        let last_stake = self
            .accounts
            .get(caller)
            .map(|a| a.last_stake_time)
            .unwrap_or(0);
        let unlocks_at = last_stake.saturating_add(self.config.lock_duration);
        if self.clock.now() < unlocks_at {
            return Err(DeflectError::StakeLocked { unlocks_at });
        }
        Ok(())
    }

    fn weighted_supply(&self) -> Result<u128, DeflectError> {
        self.total_supply
            .checked_add(self.boosted_total_supply)
            .ok_or(DeflectError::MathOverflow("weighted supply"))
    }

    fn levels_of(&self, account: &Address) -> BTreeMap<AssetId, usize> {
        self.accounts
            .get(account)
            .map(|a| a.local_levels.clone())
            .unwrap_or_default()
    }

    /// Global tier weight from the ledger plus the weight of each held level.
    fn boost_bps(&self, account: &Address, levels: &BTreeMap<AssetId, usize>) -> u32 {
        let global = self
            .global_boost
            .as_ref()
            .map(|g| g.table.weight_for_balance(self.ledger.balance_of(&g.asset, account)))
            .unwrap_or(0);
        levels
            .iter()
            .map(|(asset, level)| {
                self.local_boosts
                    .get(asset)
                    .map(|table| table.weight_for_level(*level))
                    .unwrap_or(0)
            })
            .fold(global, u32::saturating_add)
    }

    fn reweigh(
        &self,
        account: &Address,
        levels: &BTreeMap<AssetId, usize>,
        principal: u128,
    ) -> Result<Reweigh, DeflectError> {
        let (old_principal, old_boosted) = self
            .accounts
            .get(account)
            .map(|a| (a.principal, a.boosted_weight))
            .unwrap_or((0, 0));
        let boosted = boosted_weight(principal, self.boost_bps(account, levels))?;
        let total_supply = self
            .total_supply
            .saturating_sub(old_principal)
            .checked_add(principal)
            .ok_or(DeflectError::MathOverflow("total supply"))?;
        let boosted_total_supply = self
            .boosted_total_supply
            .saturating_sub(old_boosted)
            .checked_add(boosted)
            .ok_or(DeflectError::MathOverflow("boosted total supply"))?;
        total_supply
            .checked_add(boosted_total_supply)
            .ok_or(DeflectError::MathOverflow("weighted supply"))?;

        Ok(Reweigh {
            principal,
            boosted_weight: boosted,
            total_supply,
            boosted_total_supply,
        })
    }

    fn apply_reweigh(&mut self, account: &Address, reweigh: &Reweigh) {
        let staker = self.accounts.entry(*account).or_default();
        staker.principal = reweigh.principal;
        staker.boosted_weight = reweigh.boosted_weight;
        self.total_supply = reweigh.total_supply;
        self.boosted_total_supply = reweigh.boosted_total_supply;
    }

    /// Accrue every pool to now and, if given, checkpoint `account` against
    /// the accrued indices. Nothing is written.
    fn settle(&self, account: Option<&Address>) -> Result<Settlement, DeflectError> {
        let now = self.clock.now();
        let supply = self.weighted_supply()?;
        let pools = self
            .pools
            .iter()
            .map(|pool| pool.accrue(now, supply, self.multiplier))
            .collect::<Result<Vec<_>, _>>()?;

        let account = match account {
            Some(address) => {
                let staker = self.accounts.get(address);
                let weighted = staker.map(|s| s.weighted_stake()).unwrap_or(0);
                let checkpoints = pools
                    .iter()
                    .enumerate()
                    .map(|(pool_id, accrual)| {
                        let previous = staker.map(|s| s.checkpoint(pool_id)).unwrap_or_default();
                        let rewards_accrued = accrued_earnings(
                            weighted,
                            accrual.reward_per_token,
                            previous.reward_per_token_paid,
                            previous.rewards_accrued,
                            self.multiplier,
                        )?;
                        Ok(RewardCheckpoint {
                            reward_per_token_paid: accrual.reward_per_token,
                            rewards_accrued,
                        })
                    })
                    .collect::<Result<Vec<_>, DeflectError>>()?;
                Some((*address, checkpoints))
            }
            None => None,
        };

        Ok(Settlement { now, pools, account })
    }

    fn commit(&mut self, settlement: Settlement) {
        for (pool, accrual) in self.pools.iter_mut().zip(&settlement.pools) {
            pool.apply_accrual(accrual);
        }
        if let Some((address, checkpoints)) = settlement.account {
            let staker = self.accounts.entry(address).or_default();
            for (pool_id, checkpoint) in checkpoints.into_iter().enumerate() {
                staker.checkpoints.insert(pool_id, checkpoint);
            }
        }
    }

    fn claim_pools(&mut self, caller: &Address, pool_ids: &[PoolId]) -> Result<Vec<(PoolId, u128)>, DeflectError> {
        if !self.accounts.contains_key(caller) {
            return Ok(pool_ids.iter().map(|&id| (id, 0)).collect());
        }

        let mut settlement = self.settle(Some(caller))?;
        let levels = self.levels_of(caller);
        let reweigh = self.reweigh(caller, &levels, self.balance_of(caller))?;

        let mut payouts = Vec::with_capacity(pool_ids.len());
        for &pool_id in pool_ids {
            let reward = settlement.checkpoints_mut()[pool_id].rewards_accrued;
            payouts.push((pool_id, reward));
        }

        let custody = self.config.custody;
        for &(pool_id, reward) in &payouts {
            if reward > 0 {
                let asset = self.pools[pool_id].reward_asset;
                self.ledger.transfer_out(&asset, &custody, caller, reward)?;
            }
        }

        for &(pool_id, _) in &payouts {
            settlement.checkpoints_mut()[pool_id].rewards_accrued = 0;
        }
        self.commit(settlement);
        for &(pool_id, reward) in &payouts {
            let pool = &mut self.pools[pool_id];
            pool.reserved = pool.reserved.saturating_sub(reward);
            if reward > 0 {
                tracing::debug!("{} claimed {} from pool {}", caller, reward, pool_id);
            }
        }
        self.apply_reweigh(caller, &reweigh);
        Ok(payouts)
    }
}
