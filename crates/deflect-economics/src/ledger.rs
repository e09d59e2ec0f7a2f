// crates/deflect-economics/src/ledger.rs
//
// In-memory asset ledger for tests, simulations, and the deployment driver.
//
// Balances are tracked per (asset, holder). An asset may carry a transfer fee
// in basis points; on `transfer_in` the fee is burned and only the remainder
// reaches custody, which is how deflationary staking tokens behave.

use std::collections::BTreeMap;

use crate::token::apply_bps;
use deflect_core::error::DeflectError;
use deflect_core::identity::{Address, AssetId};
use deflect_core::traits::AssetLedger;

#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<(AssetId, Address), u128>,
    supplies: BTreeMap<AssetId, u128>,
    transfer_fees_bps: BTreeMap<AssetId, u32>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` of `asset` out of thin air for `holder`.
    pub fn mint(&mut self, asset: &AssetId, holder: &Address, amount: u128) -> Result<(), DeflectError> {
        let supply = self.supplies.entry(*asset).or_insert(0);
        *supply = supply
            .checked_add(amount)
            .ok_or(DeflectError::MathOverflow("mint: supply"))?;
        let balance = self.balances.entry((*asset, *holder)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(DeflectError::MathOverflow("mint: balance"))?;
        Ok(())
    }

    /// Charge `bps` on every `transfer_in` of `asset`.
    pub fn set_transfer_fee(&mut self, asset: &AssetId, bps: u32) -> Result<(), DeflectError> {
        if bps as u128 > crate::token::BPS_DENOMINATOR {
            return Err(DeflectError::InvalidParameter(format!(
                "transfer fee {} bps exceeds 100%",
                bps
            )));
        }
        self.transfer_fees_bps.insert(*asset, bps);
        Ok(())
    }

    pub fn transfer_fee_bps(&self, asset: &AssetId) -> u32 {
        self.transfer_fees_bps.get(asset).copied().unwrap_or(0)
    }

    pub fn total_supply(&self, asset: &AssetId) -> u128 {
        self.supplies.get(asset).copied().unwrap_or(0)
    }

    /// Plain holder-to-holder transfer with no fee, as an admin funding a
    /// pool's custody account would do.
    pub fn transfer(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), DeflectError> {
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount)
    }

    fn debit(&mut self, asset: &AssetId, holder: &Address, amount: u128) -> Result<(), DeflectError> {
        let available = self.balance_of(asset, holder);
        if amount > available {
            return Err(DeflectError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.balances.insert((*asset, *holder), available - amount);
        Ok(())
    }

    fn credit(&mut self, asset: &AssetId, holder: &Address, amount: u128) -> Result<(), DeflectError> {
        let balance = self.balances.entry((*asset, *holder)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(DeflectError::MathOverflow("credit"))?;
        Ok(())
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: &AssetId, holder: &Address) -> u128 {
        self.balances.get(&(*asset, *holder)).copied().unwrap_or(0)
    }

    fn transfer_in(
        &mut self,
        asset: &AssetId,
        from: &Address,
        custody: &Address,
        requested: u128,
    ) -> Result<u128, DeflectError> {
        let fee = apply_bps(requested, self.transfer_fee_bps(asset))?;
        let received = requested - fee;
        if received == 0 {
            return Err(DeflectError::InvalidAmount(format!(
                "transfer of {} {} delivers nothing after fees",
                requested, asset
            )));
        }
        self.debit(asset, from, requested)?;
        self.credit(asset, custody, received)?;
        if fee > 0 {
            if let Some(supply) = self.supplies.get_mut(asset) {
                *supply = supply.saturating_sub(fee);
            }
        }
        Ok(received)
    }

    fn transfer_out(
        &mut self,
        asset: &AssetId,
        custody: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), DeflectError> {
        self.transfer(asset, custody, to, amount)
    }
}
