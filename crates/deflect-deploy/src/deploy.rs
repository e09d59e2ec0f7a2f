// crates/deflect-deploy/src/deploy.rs
//
// Apply a DeploymentPlan: mint initial balances, construct the engine, then
// run the administrative calls in plan order (pools, local boosts, global
// boost) as the plan's admin.

use deflect_core::error::DeflectError;
use deflect_core::identity::PoolId;
use deflect_economics::{InMemoryLedger, ManualClock, RewardDistributionEngine};

use crate::config::DeploymentPlan;
use crate::shared::{Engine, SharedEngine};

/// Build the ledger, engine, and pools described by `plan`.
///
/// Pools marked `start` are funded by a plain transfer from the admin into
/// custody, so the admin must hold the reward asset via a `[[tokens]]` mint.
pub fn deploy(plan: &DeploymentPlan) -> Result<SharedEngine, DeflectError> {
    let clock = ManualClock::new(plan.start_time);
    let ledger = mint_balances(plan)?;
    let mut engine = RewardDistributionEngine::new(plan.engine.clone(), ledger, clock.clone())?;

    let started = add_pools(&mut engine, plan)?;
    add_boosts(&mut engine, plan)?;

    tracing::info!(
        "Deployment complete: {} pools ({} started), {} local boosts, global boost {}",
        engine.pool_length(),
        started.len(),
        plan.local_boosts.len(),
        if plan.global_boost.is_some() { "on" } else { "off" }
    );
    Ok(SharedEngine::new(engine, clock))
}

fn mint_balances(plan: &DeploymentPlan) -> Result<InMemoryLedger, DeflectError> {
    let mut ledger = InMemoryLedger::new();
    for mint in &plan.tokens {
        let amount = plan.amount_of(&mint.asset, &mint.amount)?;
        ledger.mint(&mint.asset, &mint.holder, amount)?;
        if mint.transfer_fee_bps > 0 {
            ledger.set_transfer_fee(&mint.asset, mint.transfer_fee_bps)?;
        }
        tracing::debug!("Minted {} of {} to {}", mint.amount, mint.asset, mint.holder);
    }
    Ok(ledger)
}

/// Register every pool and start the ones marked `start`. Returns the ids
/// of started pools.
fn add_pools(engine: &mut Engine, plan: &DeploymentPlan) -> Result<Vec<PoolId>, DeflectError> {
    let admin = plan.engine.admin;
    let custody = plan.engine.custody;
    let mut started = Vec::new();

    for pool in &plan.pools {
        let pool_id = engine.add_reward_pool(&admin, pool.reward_asset)?;
        if !pool.start {
            continue;
        }
        let amount = plan.amount_of(&pool.reward_asset, &pool.amount)?;
        engine
            .ledger_mut()
            .transfer(&pool.reward_asset, &admin, &custody, amount)?;
        engine.start_reward_pool(&admin, pool_id, amount, pool.duration)?;
        started.push(pool_id);
    }
    Ok(started)
}

fn add_boosts(engine: &mut Engine, plan: &DeploymentPlan) -> Result<(), DeflectError> {
    let admin = plan.engine.admin;
    for boost in &plan.local_boosts {
        let thresholds = plan.amounts_of(&boost.asset, &boost.thresholds)?;
        engine.add_local_boost(&admin, boost.asset, &thresholds, &boost.weights_bps)?;
    }
    if let Some(boost) = &plan.global_boost {
        let thresholds = plan.amounts_of(&boost.asset, &boost.thresholds)?;
        engine.add_global_boost(&admin, boost.asset, &thresholds, &boost.weights_bps)?;
    }
    Ok(())
}
