//! Reward conversion policy — points to BTM units.
//!
//! Pure, deterministic mapping from a point balance to a claimable token
//! amount. PvP points take precedence over PvE when both categories are
//! eligible. Amounts are whole BTM units (the adapter scales to base units
//! by the token's decimals at submission time).
//!
//! This is the most property-testable unit in the crate: for every balance
//! `b` and rate `r`, `units * r + remainder == b` must hold exactly.

use serde::{Deserialize, Serialize};

use super::player::PointCategory;
use super::points::PointBalance;

/// Exchange rates in points per whole BTM unit.
///
/// Defaults match the live game economy: 1000 PvP points or 5000 PvE
/// points per BTM. Both are configurable via `[rewards]` in config.toml.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConversionPolicy {
    /// PvP points required per whole BTM unit.
    pub pvp_rate: u64,
    /// PvE points required per whole BTM unit.
    pub pve_rate: u64,
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            pvp_rate: 1000,
            pve_rate: 5000,
        }
    }
}

/// Outcome of evaluating a balance against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionQuote {
    /// Neither category has enough points for a single unit.
    Ineligible,
    /// A claim is possible for the given category.
    Eligible {
        /// Category the claim will draw from.
        category: PointCategory,
        /// Whole BTM units: floor(balance / rate).
        units: u64,
        /// Points left over after conversion: balance % rate.
        remainder: u64,
    },
}

impl ConversionPolicy {
    /// Create a policy, rejecting zero rates (division guard).
    ///
    /// # Panics
    /// Panics if either rate is zero. Rates come from validated config,
    /// so this fires only on construction bugs.
    pub fn new(pvp_rate: u64, pve_rate: u64) -> Self {
        assert!(pvp_rate > 0, "pvp_rate must be positive");
        assert!(pve_rate > 0, "pve_rate must be positive");
        Self { pvp_rate, pve_rate }
    }

    /// Evaluate a balance: which category (if any) can be claimed, and
    /// for how many whole units.
    ///
    /// PvP is preferred whenever it alone reaches its rate; PvE is only
    /// consulted when PvP is below threshold.
    pub fn quote(&self, balance: PointBalance) -> ConversionQuote {
        if balance.pvp >= self.pvp_rate {
            return ConversionQuote::Eligible {
                category: PointCategory::Pvp,
                units: balance.pvp / self.pvp_rate,
                remainder: balance.pvp % self.pvp_rate,
            };
        }
        if balance.pve >= self.pve_rate {
            return ConversionQuote::Eligible {
                category: PointCategory::Pve,
                units: balance.pve / self.pve_rate,
                remainder: balance.pve % self.pve_rate,
            };
        }
        ConversionQuote::Ineligible
    }
}

/// Scale whole BTM units to base units (`units * 10^decimals`).
///
/// Returns `None` on overflow — a claim that large is a config or ledger
/// bug and must be rejected, never truncated.
pub fn to_base_units(units: u64, decimals: u8) -> Option<u128> {
    let scale = 10u128.checked_pow(u32::from(decimals))?;
    u128::from(units).checked_mul(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ConversionPolicy {
        ConversionPolicy::default()
    }

    #[test]
    fn test_pvp_just_below_threshold_is_ineligible() {
        let quote = policy().quote(PointBalance { pvp: 999, pve: 0 });
        assert_eq!(quote, ConversionQuote::Ineligible);
    }

    #[test]
    fn test_pvp_at_threshold_yields_one_unit() {
        let quote = policy().quote(PointBalance { pvp: 1000, pve: 0 });
        assert_eq!(
            quote,
            ConversionQuote::Eligible {
                category: PointCategory::Pvp,
                units: 1,
                remainder: 0,
            }
        );
    }

    #[test]
    fn test_pve_at_threshold_when_pvp_ineligible() {
        let quote = policy().quote(PointBalance { pvp: 999, pve: 5000 });
        assert_eq!(
            quote,
            ConversionQuote::Eligible {
                category: PointCategory::Pve,
                units: 1,
                remainder: 0,
            }
        );
    }

    #[test]
    fn test_pvp_preferred_over_eligible_pve() {
        let quote = policy().quote(PointBalance { pvp: 2000, pve: 10000 });
        assert_eq!(
            quote,
            ConversionQuote::Eligible {
                category: PointCategory::Pvp,
                units: 2,
                remainder: 0,
            }
        );
    }

    #[test]
    fn test_floor_division_and_remainder() {
        let quote = policy().quote(PointBalance { pvp: 1500, pve: 0 });
        assert_eq!(
            quote,
            ConversionQuote::Eligible {
                category: PointCategory::Pvp,
                units: 1,
                remainder: 500,
            }
        );
    }

    #[test]
    fn test_to_base_units_18_decimals() {
        assert_eq!(to_base_units(1, 18), Some(1_000_000_000_000_000_000));
        assert_eq!(to_base_units(0, 18), Some(0));
    }

    #[test]
    fn test_to_base_units_overflow_is_none() {
        assert_eq!(to_base_units(u64::MAX, 38), None);
    }
}
