// crates/deflect-economics/src/lib.rs
//
// deflect-economics: time-proportional, multi-pool reward distribution for a
// single staking asset, with boost tiers and withdrawal fees.
//
// All amounts are integer base units of their asset (wei-style). Reward math
// is fixed-point with a multiplier of 10^staking_decimals and every division
// truncates, so each operation may lose at most one base unit to rounding.

pub mod account;
pub mod boost;
pub mod clock;
pub mod engine;
pub mod fees;
pub mod ledger;
pub mod pool;
pub mod token;

// Re-export key types for ergonomic access from downstream crates.
pub use account::{RewardCheckpoint, StakingAccount};
pub use boost::{BoostTable, BoostTier, GlobalBoost, MAX_TIER_WEIGHT_BPS};
pub use clock::ManualClock;
pub use engine::{EngineConfig, ExitReceipt, RewardDistributionEngine};
pub use fees::{BoostPaymentSplit, FeeSchedule, WithdrawalSplit};
pub use ledger::InMemoryLedger;
pub use pool::{PoolStatus, RewardPool};
pub use token::{format_units, parse_units, BPS_DENOMINATOR, DEFAULT_DECIMALS};
