// crates/deflect-deploy/src/report.rs
//
// Point-in-time view of a deployed engine: one row per pool and one per
// staker, with amounts formatted in whole tokens.

use serde::Serialize;
use tabled::Tabled;

use deflect_core::error::DeflectError;
use deflect_core::identity::Timestamp;
use deflect_economics::format_units;

use crate::config::DeploymentPlan;
use crate::shared::Engine;

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct PoolRow {
    #[tabled(rename = "Pool")]
    pub id: usize,
    #[tabled(rename = "Reward Asset")]
    pub reward_asset: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Rate/s")]
    pub reward_rate: String,
    #[tabled(rename = "Window Total")]
    pub reward_for_duration: String,
    #[tabled(rename = "Ends")]
    pub period_finish: Timestamp,
    #[tabled(rename = "Unclaimed")]
    pub reserved: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct AccountRow {
    #[tabled(rename = "Account")]
    pub account: String,
    #[tabled(rename = "Staked")]
    pub staked: String,
    #[tabled(rename = "Boost")]
    pub boosted: String,
    /// Claimable per pool, `pool:amount` pairs.
    #[tabled(rename = "Earned")]
    pub earned: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub now: Timestamp,
    pub total_supply: String,
    pub boosted_total_supply: String,
    pub pools: Vec<PoolRow>,
    pub accounts: Vec<AccountRow>,
}

pub fn build_report(engine: &Engine, plan: &DeploymentPlan) -> Result<Report, DeflectError> {
    let staking_decimals = plan.engine.staking_decimals;

    let mut pools = Vec::with_capacity(engine.pool_length());
    for (id, pool) in engine.pools().iter().enumerate() {
        let decimals = plan.decimals_of(&pool.reward_asset);
        pools.push(PoolRow {
            id,
            reward_asset: pool.reward_asset.to_string(),
            status: engine.pool_status(id)?.to_string(),
            reward_rate: format_units(pool.reward_rate, decimals),
            reward_for_duration: format_units(pool.reward_for_duration(), decimals),
            period_finish: pool.period_finish,
            reserved: format_units(pool.reserved, decimals),
        });
    }

    let mut accounts = Vec::new();
    for (address, staker) in engine.stakers() {
        let mut earned = Vec::with_capacity(engine.pool_length());
        for (id, pool) in engine.pools().iter().enumerate() {
            let amount = engine.earned(address, id)?;
            earned.push(format!(
                "{}:{}",
                id,
                format_units(amount, plan.decimals_of(&pool.reward_asset))
            ));
        }
        accounts.push(AccountRow {
            account: address.to_string(),
            staked: format_units(staker.principal, staking_decimals),
            boosted: format_units(staker.boosted_weight, staking_decimals),
            earned: earned.join(" "),
        });
    }

    Ok(Report {
        now: engine.now(),
        total_supply: format_units(engine.total_supply(), staking_decimals),
        boosted_total_supply: format_units(engine.boosted_total_supply(), staking_decimals),
        pools,
        accounts,
    })
}
