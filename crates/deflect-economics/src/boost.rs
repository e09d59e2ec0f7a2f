// crates/deflect-economics/src/boost.rs
//
// Boost tier tables.
//
// A table is an ordered list of (threshold, weight_bps) pairs with strictly
// ascending thresholds. Two kinds exist:
//   - local boosts: bought per boost asset by paying a tier's threshold,
//     addressed by 1-based level
//   - global boost: gated on the account's balance of a governance asset,
//     the highest tier whose threshold the balance reaches applies
//
// A boost adds `principal * weight_bps / 10_000` of weight on top of the
// principal without changing the principal itself.

use serde::{Deserialize, Serialize};

use crate::token::BPS_DENOMINATOR;
use deflect_core::error::DeflectError;
use deflect_core::identity::AssetId;

/// Largest weight a single tier may grant: +100% of principal.
pub const MAX_TIER_WEIGHT_BPS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostTier {
    /// Amount of the boost asset paid (local) or held (global).
    pub threshold: u128,
    /// Extra weight in basis points of principal.
    pub weight_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostTable {
    tiers: Vec<BoostTier>,
}

impl BoostTable {
    /// Build a table from parallel threshold and weight arrays.
    ///
    /// # Errors
    /// Returns `DeflectError::InvalidParameter` if the arrays are empty or of
    /// different lengths, thresholds are zero or not strictly ascending, or a
    /// weight is zero or above `MAX_TIER_WEIGHT_BPS`.
    pub fn new(thresholds: &[u128], weights_bps: &[u32]) -> Result<Self, DeflectError> {
        if thresholds.is_empty() {
            return Err(DeflectError::InvalidParameter(
                "boost table needs at least one tier".to_string(),
            ));
        }
        if thresholds.len() != weights_bps.len() {
            return Err(DeflectError::InvalidParameter(format!(
                "{} thresholds but {} weights",
                thresholds.len(),
                weights_bps.len()
            )));
        }
        if thresholds[0] == 0 {
            return Err(DeflectError::InvalidParameter(
                "boost threshold must be positive".to_string(),
            ));
        }
        if let Some(i) = thresholds.windows(2).position(|w| w[0] >= w[1]) {
            return Err(DeflectError::InvalidParameter(format!(
                "thresholds must be strictly ascending: tier {} ({}) >= tier {} ({})",
                i + 1,
                thresholds[i],
                i + 2,
                thresholds[i + 1]
            )));
        }
        if let Some(&bad) = weights_bps
            .iter()
            .find(|&&w| w == 0 || w > MAX_TIER_WEIGHT_BPS)
        {
            return Err(DeflectError::InvalidParameter(format!(
                "boost weight {} bps outside 1..={}",
                bad, MAX_TIER_WEIGHT_BPS
            )));
        }

        let tiers = thresholds
            .iter()
            .zip(weights_bps)
            .map(|(&threshold, &weight_bps)| BoostTier {
                threshold,
                weight_bps,
            })
            .collect();
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[BoostTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The tier at a 1-based `level`, if it exists.
    pub fn level(&self, level: usize) -> Option<&BoostTier> {
        level.checked_sub(1).and_then(|i| self.tiers.get(i))
    }

    /// Index of the highest tier whose threshold `balance` reaches.
    pub fn tier_for_balance(&self, balance: u128) -> Option<usize> {
        let reached = self.tiers.partition_point(|t| t.threshold <= balance);
        reached.checked_sub(1)
    }

    /// Weight granted by holding `balance`, zero below the first tier.
    pub fn weight_for_balance(&self, balance: u128) -> u32 {
        self.tier_for_balance(balance)
            .map(|i| self.tiers[i].weight_bps)
            .unwrap_or(0)
    }

    /// A purchased level as this table honours it: capped at the top tier,
    /// so holders keep the best remaining tier after the table shrinks.
    pub fn effective_level(&self, level: usize) -> usize {
        level.min(self.len())
    }

    /// Weight for a purchased 1-based level. Level 0 (nothing bought)
    /// grants nothing.
    pub fn weight_for_level(&self, level: usize) -> u32 {
        self.level(self.effective_level(level))
            .map(|t| t.weight_bps)
            .unwrap_or(0)
    }
}

/// Balance-gated boost keyed on a governance asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalBoost {
    pub asset: AssetId,
    pub table: BoostTable,
}

/// `principal * total_bps / 10_000`, truncated.
pub fn boosted_weight(principal: u128, total_bps: u32) -> Result<u128, DeflectError> {
    principal
        .checked_mul(total_bps as u128)
        .map(|scaled| scaled / BPS_DENOMINATOR)
        .ok_or(DeflectError::MathOverflow("boosted_weight"))
}
