// crates/deflect-deploy/src/simulate.rs
//
// Replay a plan's `[[steps]]` against a deployed engine.
//
// Each step first moves the clock to `start_time + at`, then runs one staker
// call under the write lock. A rejected call is recorded and the script
// carries on, so a plan can demonstrate failure cases next to the happy path.

use serde::Serialize;
use tabled::Tabled;

use deflect_core::error::DeflectError;
use deflect_core::identity::{Address, Timestamp};
use deflect_economics::format_units;

use crate::config::{DeploymentPlan, Step, StepAction};
use crate::shared::{Engine, SharedEngine};

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct StepOutcome {
    #[tabled(rename = "Time")]
    pub at: Timestamp,
    #[tabled(rename = "Action")]
    pub action: String,
    #[tabled(rename = "Account")]
    pub account: String,
    #[tabled(rename = "OK")]
    pub ok: bool,
    #[tabled(rename = "Result")]
    pub detail: String,
}

pub async fn run_steps(shared: &SharedEngine, plan: &DeploymentPlan) -> Vec<StepOutcome> {
    let mut outcomes = Vec::with_capacity(plan.steps.len());
    for step in &plan.steps {
        let at = plan.start_time.saturating_add(step.at);
        shared.clock().set(at);

        let result = {
            let mut engine = shared.write().await;
            apply_step(&mut engine, plan, step)
        };
        let (ok, detail) = match result {
            Ok(detail) => (true, detail),
            Err(e) => {
                tracing::warn!("Step {} at {} rejected: {}", step.action, at, e);
                (false, e.to_string())
            }
        };
        outcomes.push(StepOutcome {
            at,
            action: step.action.to_string(),
            account: step.account.map(|a| a.to_string()).unwrap_or_default(),
            ok,
            detail,
        });
    }
    outcomes
}

/// Run one step and describe what it did.
fn apply_step(engine: &mut Engine, plan: &DeploymentPlan, step: &Step) -> Result<String, DeflectError> {
    let staking_asset = plan.engine.staking_asset;
    let staking_decimals = plan.engine.staking_decimals;
    let stake_amount = |step: &Step| -> Result<u128, DeflectError> {
        let amount = step.amount.as_deref().ok_or_else(|| missing(step, "amount"))?;
        plan.amount_of(&staking_asset, amount)
    };

    match step.action {
        StepAction::Advance => Ok(format!("clock at {}", engine.now())),
        StepAction::Stake => {
            let account = account_of(step)?;
            let credited = engine.stake(&account, stake_amount(step)?)?;
            Ok(format!("credited {}", format_units(credited, staking_decimals)))
        }
        StepAction::Withdraw => {
            let account = account_of(step)?;
            let split = engine.withdraw(&account, stake_amount(step)?)?;
            Ok(format!(
                "received {}, treasury {}, burned {}",
                format_units(split.to_staker, staking_decimals),
                format_units(split.to_treasury, staking_decimals),
                format_units(split.burned, staking_decimals)
            ))
        }
        StepAction::Claim => {
            let account = account_of(step)?;
            let claimed = match step.pool {
                Some(pool_id) => vec![(pool_id, engine.claim(&account, pool_id)?)],
                None => engine.claim_all(&account)?,
            };
            describe_claims(engine, plan, &claimed)
        }
        StepAction::Purchase => {
            let account = account_of(step)?;
            let asset = step.asset.ok_or_else(|| missing(step, "asset"))?;
            let level = step.level.ok_or_else(|| missing(step, "level"))?;
            let split = engine.purchase(&account, asset, level)?;
            let decimals = plan.decimals_of(&asset);
            Ok(format!(
                "level {}: dev fund {}, treasury {}",
                level,
                format_units(split.to_dev_fund, decimals),
                format_units(split.to_treasury, decimals)
            ))
        }
        StepAction::Exit => {
            let account = account_of(step)?;
            let receipt = engine.exit(&account)?;
            let withdrawn = receipt
                .withdrawn
                .map(|split| format_units(split.to_staker, staking_decimals))
                .unwrap_or_else(|| "0".to_string());
            Ok(format!(
                "received {}; {}",
                withdrawn,
                describe_claims(engine, plan, &receipt.claimed)?
            ))
        }
    }
}

fn describe_claims(engine: &Engine, plan: &DeploymentPlan, claimed: &[(usize, u128)]) -> Result<String, DeflectError> {
    if claimed.is_empty() {
        return Ok("nothing to claim".to_string());
    }
    let mut parts = Vec::with_capacity(claimed.len());
    for &(pool_id, amount) in claimed {
        let asset = engine.pool(pool_id)?.reward_asset;
        parts.push(format!(
            "pool {} paid {}",
            pool_id,
            format_units(amount, plan.decimals_of(&asset))
        ));
    }
    Ok(parts.join(", "))
}

fn account_of(step: &Step) -> Result<Address, DeflectError> {
    step.account.ok_or_else(|| missing(step, "account"))
}

fn missing(step: &Step, field: &str) -> DeflectError {
    DeflectError::Config(format!("{} step is missing `{}`", step.action, field))
}
