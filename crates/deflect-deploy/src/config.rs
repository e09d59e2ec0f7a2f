// crates/deflect-deploy/src/config.rs
//
// Deployment plan for the Deflect driver.
// Loaded from a TOML file; everything except `[engine]` has a default.
//
// Amounts are written in whole tokens as decimal strings ("1000", "2.5") and
// converted with the asset's decimals, so plans read like the amounts a
// deployer would pass to parseEther.

use std::collections::BTreeMap;
use std::fs;

use serde::Deserialize;

use deflect_core::error::DeflectError;
use deflect_core::identity::{Address, AssetId, PoolId, Timestamp};
use deflect_economics::token::{parse_units, DEFAULT_DECIMALS};
use deflect_economics::EngineConfig;

/// A complete deployment: engine parameters, initial balances, pools,
/// boosts, and an optional scripted scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentPlan {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Clock value at deployment. Step offsets are relative to it.
    #[serde(default = "default_start_time")]
    pub start_time: Timestamp,

    pub engine: EngineConfig,

    /// Initial mints into the in-memory ledger.
    #[serde(default)]
    pub tokens: Vec<TokenMint>,

    /// Reward pools, registered in order (the first gets pool id 0).
    #[serde(default)]
    pub pools: Vec<PoolPlan>,

    #[serde(default)]
    pub local_boosts: Vec<BoostPlan>,

    #[serde(default)]
    pub global_boost: Option<BoostPlan>,

    /// Scripted staker actions, in non-decreasing `at` order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenMint {
    pub asset: AssetId,
    pub holder: Address,
    pub amount: String,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Fee burned on every deposit of this asset into custody.
    #[serde(default)]
    pub transfer_fee_bps: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolPlan {
    pub reward_asset: AssetId,
    /// Rewards emitted over the first window, moved from the admin into
    /// custody before the pool starts.
    pub amount: String,
    /// Window length in seconds.
    pub duration: u64,
    /// Start emitting at deployment. When false the pool is only registered.
    #[serde(default = "default_start")]
    pub start: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoostPlan {
    pub asset: AssetId,
    pub thresholds: Vec<String>,
    pub weights_bps: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Stake,
    Withdraw,
    /// Claim one pool, or every pool when `pool` is omitted.
    Claim,
    Purchase,
    Exit,
    /// Only move the clock.
    Advance,
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepAction::Stake => "stake",
            StepAction::Withdraw => "withdraw",
            StepAction::Claim => "claim",
            StepAction::Purchase => "purchase",
            StepAction::Exit => "exit",
            StepAction::Advance => "advance",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Seconds after `start_time`.
    #[serde(default)]
    pub at: u64,
    pub action: StepAction,
    #[serde(default)]
    pub account: Option<Address>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub pool: Option<PoolId>,
    #[serde(default)]
    pub asset: Option<AssetId>,
    #[serde(default)]
    pub level: Option<usize>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_start_time() -> Timestamp {
    1_600_000_000
}

fn default_decimals() -> u32 {
    DEFAULT_DECIMALS
}

fn default_start() -> bool {
    true
}

impl DeploymentPlan {
    /// Load and validate a plan from a TOML file. A leading `~/` expands to
    /// the home directory.
    pub fn load(path: &str) -> Result<Self, DeflectError> {
        let path = expand_tilde(path);
        let contents = fs::read_to_string(&path)
            .map_err(|e| DeflectError::Config(format!("cannot read {}: {}", path, e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, DeflectError> {
        let plan: DeploymentPlan =
            toml::from_str(contents).map_err(|e| DeflectError::Config(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Check everything that can be checked without running the engine:
    /// fee caps, consistent decimals, step ordering and required step
    /// fields, and that every amount parses.
    pub fn validate(&self) -> Result<(), DeflectError> {
        self.engine.fees.validate()?;

        let mut decimals: BTreeMap<AssetId, u32> = BTreeMap::new();
        decimals.insert(self.engine.staking_asset, self.engine.staking_decimals);
        for mint in &self.tokens {
            let known = *decimals.entry(mint.asset).or_insert(mint.decimals);
            if known != mint.decimals {
                return Err(DeflectError::Config(format!(
                    "asset {} declared with {} and {} decimals",
                    mint.asset, known, mint.decimals
                )));
            }
            parse_units(&mint.amount, mint.decimals)?;
        }

        for pool in &self.pools {
            self.amount_of(&pool.reward_asset, &pool.amount)?;
        }
        for boost in self.local_boosts.iter().chain(self.global_boost.iter()) {
            self.amounts_of(&boost.asset, &boost.thresholds)?;
        }

        let mut previous = 0;
        for (i, step) in self.steps.iter().enumerate() {
            if step.at < previous {
                return Err(DeflectError::Config(format!(
                    "step {} at +{}s comes before the previous step at +{}s",
                    i, step.at, previous
                )));
            }
            previous = step.at;
            self.validate_step(i, step)?;
        }
        Ok(())
    }

    fn validate_step(&self, index: usize, step: &Step) -> Result<(), DeflectError> {
        let missing = |field: &str| {
            DeflectError::Config(format!(
                "step {} ({}) is missing `{}`",
                index, step.action, field
            ))
        };
        if step.action != StepAction::Advance && step.account.is_none() {
            return Err(missing("account"));
        }
        match step.action {
            StepAction::Stake | StepAction::Withdraw => {
                let amount = step.amount.as_deref().ok_or_else(|| missing("amount"))?;
                self.amount_of(&self.engine.staking_asset, amount)?;
            }
            StepAction::Purchase => {
                step.asset.ok_or_else(|| missing("asset"))?;
                step.level.ok_or_else(|| missing("level"))?;
            }
            StepAction::Claim | StepAction::Exit | StepAction::Advance => {}
        }
        Ok(())
    }

    /// Decimals for `asset`: the staking decimals for the staking asset,
    /// otherwise what its mints declare, otherwise the default.
    pub fn decimals_of(&self, asset: &AssetId) -> u32 {
        if *asset == self.engine.staking_asset {
            return self.engine.staking_decimals;
        }
        self.tokens
            .iter()
            .find(|mint| mint.asset == *asset)
            .map(|mint| mint.decimals)
            .unwrap_or(DEFAULT_DECIMALS)
    }

    /// Parse a whole-token amount of `asset` into base units.
    pub fn amount_of(&self, asset: &AssetId, amount: &str) -> Result<u128, DeflectError> {
        parse_units(amount, self.decimals_of(asset))
    }

    pub fn amounts_of(&self, asset: &AssetId, amounts: &[String]) -> Result<Vec<u128>, DeflectError> {
        amounts.iter().map(|a| self.amount_of(asset, a)).collect()
    }
}

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
