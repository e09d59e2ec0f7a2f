// crates/deflect-core/src/traits.rs

use crate::error::DeflectError;
use crate::identity::{Address, AssetId, Timestamp};

/// Token balances and transfers.
///
/// Implemented by deflect-economics (`InMemoryLedger`) and by whatever chain
/// client a host wires in. The engine trusts the ledger for value movement
/// and only keeps its own accounting of principal and rewards.
pub trait AssetLedger: Send + Sync {
    /// Balance of `asset` held by `holder`.
    fn balance_of(&self, asset: &AssetId, holder: &Address) -> u128;

    /// Move `requested` of `asset` from `from` into `custody`.
    ///
    /// Returns the amount `custody` actually received, which is less than
    /// `requested` for fee-on-transfer assets. When fees would leave nothing
    /// to receive, fails with `DeflectError::InvalidAmount` and moves nothing.
    fn transfer_in(
        &mut self,
        asset: &AssetId,
        from: &Address,
        custody: &Address,
        requested: u128,
    ) -> Result<u128, DeflectError>;

    /// Move `amount` of `asset` out of `custody` to `to`.
    fn transfer_out(
        &mut self,
        asset: &AssetId,
        custody: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), DeflectError>;
}

/// Source of the current time. Must never go backwards.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
