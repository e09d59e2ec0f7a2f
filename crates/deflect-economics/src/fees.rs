// crates/deflect-economics/src/fees.rs
//
// Fee schedule for withdrawals and boost purchases.
//
// Withdrawals pay two fees out of the withdrawn principal:
//   - withdraw fee ("dev fee"), routed to the treasury
//   - token fee, burned to the dead address
// Boost purchases are split between the dev fund (boost_dev_share_bps) and
// the treasury (the remainder).
//
// All rates are basis points; every split truncates and the staker or
// treasury side absorbs the remainder, so the parts always sum to the input.

use serde::{Deserialize, Serialize};

use crate::token::{apply_bps, BPS_DENOMINATOR};
use deflect_core::error::DeflectError;

/// Default dev-fund share of boost purchases: 25%.
pub const DEFAULT_BOOST_DEV_SHARE_BPS: u32 = 2_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Withdrawal fee paid to the treasury.
    #[serde(default)]
    pub withdraw_fee_bps: u32,
    /// Withdrawal fee burned.
    #[serde(default)]
    pub token_fee_bps: u32,
    /// Dev-fund share of a boost purchase.
    #[serde(default = "default_boost_dev_share_bps")]
    pub boost_dev_share_bps: u32,
}

fn default_boost_dev_share_bps() -> u32 {
    DEFAULT_BOOST_DEV_SHARE_BPS
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            withdraw_fee_bps: 0,
            token_fee_bps: 0,
            boost_dev_share_bps: DEFAULT_BOOST_DEV_SHARE_BPS,
        }
    }
}

/// Where a withdrawn amount goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalSplit {
    pub to_staker: u128,
    pub to_treasury: u128,
    pub burned: u128,
}

/// Where a boost payment goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostPaymentSplit {
    pub to_dev_fund: u128,
    pub to_treasury: u128,
}

impl FeeSchedule {
    /// Check that the withdrawal fees together stay within 100% and the dev
    /// share is a valid fraction.
    ///
    /// # Errors
    /// Returns `DeflectError::InvalidParameter` naming the offending rate.
    pub fn validate(&self) -> Result<(), DeflectError> {
        let combined = self.withdraw_fee_bps as u128 + self.token_fee_bps as u128;
        if combined > BPS_DENOMINATOR {
            return Err(DeflectError::InvalidParameter(format!(
                "withdraw fee {} bps + token fee {} bps exceeds {} bps",
                self.withdraw_fee_bps, self.token_fee_bps, BPS_DENOMINATOR
            )));
        }
        if self.boost_dev_share_bps as u128 > BPS_DENOMINATOR {
            return Err(DeflectError::InvalidParameter(format!(
                "boost dev share {} bps exceeds {} bps",
                self.boost_dev_share_bps, BPS_DENOMINATOR
            )));
        }
        Ok(())
    }

    pub fn split_withdrawal(&self, amount: u128) -> Result<WithdrawalSplit, DeflectError> {
        let to_treasury = apply_bps(amount, self.withdraw_fee_bps)?;
        let burned = apply_bps(amount, self.token_fee_bps)?;
        Ok(WithdrawalSplit {
            to_staker: amount - to_treasury - burned,
            to_treasury,
            burned,
        })
    }

    pub fn split_boost_payment(&self, amount: u128) -> Result<BoostPaymentSplit, DeflectError> {
        let to_dev_fund = apply_bps(amount, self.boost_dev_share_bps)?;
        Ok(BoostPaymentSplit {
            to_dev_fund,
            to_treasury: amount - to_dev_fund,
        })
    }
}
