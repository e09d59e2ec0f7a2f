// crates/deflect-core/src/error.rs

use thiserror::Error;

use crate::identity::{Address, AssetId, PoolId, Timestamp};

/// Error taxonomy for every engine and driver operation.
///
/// All variants are raised before any state is mutated, so a failed call
/// leaves the engine exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeflectError {
    /// Zero amount, zero duration, or nothing received from the ledger.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A debit exceeds the holder's balance (stake principal or ledger funds).
    #[error("Insufficient balance: requested {requested} but only {available} available")]
    InsufficientBalance { requested: u128, available: u128 },

    /// Custody does not hold enough of the reward asset to fund the window.
    #[error("Insufficient reward balance: window requires {required} but custody holds {available}")]
    InsufficientRewardBalance { required: u128, available: u128 },

    /// No reward pool at this index.
    #[error("Unknown reward pool: {0}")]
    UnknownPool(PoolId),

    /// No boost tier at this level for the given boost asset.
    #[error("Unknown boost tier: level {level} for asset {asset}")]
    UnknownTier { asset: AssetId, level: usize },

    /// The reward asset already has a pool, whether or not it has finished.
    #[error("Duplicate reward pool for asset {0}")]
    DuplicatePool(AssetId),

    /// The caller already holds this boost level or a higher one.
    #[error("Boost already owned for asset {asset}: holding level {held}, requested level {requested}")]
    BoostAlreadyOwned {
        asset: AssetId,
        held: usize,
        requested: usize,
    },

    /// Withdrawal attempted while the stake is still locked.
    #[error("Stake locked until {unlocks_at}")]
    StakeLocked { unlocks_at: Timestamp },

    /// Administrative call from an address that is not the admin.
    #[error("Unauthorized caller: {0}")]
    Unauthorized(Address),

    /// Malformed tier table, fee above cap, or otherwise rejected argument.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Checked arithmetic overflowed.
    #[error("Arithmetic overflow in {0}")]
    MathOverflow(&'static str),

    /// Address or amount string could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Deployment plan could not be loaded or applied.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report or step log could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DeflectError {
    fn from(e: serde_json::Error) -> Self {
        DeflectError::Serialization(e.to_string())
    }
}

impl From<hex::FromHexError> for DeflectError {
    fn from(e: hex::FromHexError) -> Self {
        DeflectError::Parse(e.to_string())
    }
}
