//! Point balance and claim value types.
//!
//! `PointBalance` is the per-player ledger entry: two independent
//! non-negative counters. Points are NOT token balances — they are
//! pending conversion credit; the chain is the source of truth for
//! actual BTM holdings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::PointCategory;

/// Accumulated points for one player, per category.
///
/// Both counters are unsigned by construction, so the "never negative"
/// ledger invariant cannot be violated by any arithmetic here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBalance {
    /// Points earned from PvP battles.
    pub pvp: u64,
    /// Points earned from PvE quests.
    pub pve: u64,
}

impl PointBalance {
    /// Zero balance (the implicit state of an unknown player).
    pub const ZERO: Self = Self { pvp: 0, pve: 0 };

    /// Balance in the given category.
    pub fn get(&self, category: PointCategory) -> u64 {
        match category {
            PointCategory::Pvp => self.pvp,
            PointCategory::Pve => self.pve,
        }
    }

    /// Return a copy with `amount` added to the given category.
    ///
    /// Saturating: a player cannot overflow u64 points in practice, but the
    /// ledger must never wrap back to a small balance if one tries.
    pub fn credited(&self, category: PointCategory, amount: u64) -> Self {
        let mut next = *self;
        match category {
            PointCategory::Pvp => next.pvp = next.pvp.saturating_add(amount),
            PointCategory::Pve => next.pve = next.pve.saturating_add(amount),
        }
        next
    }

    /// Return a copy with the given category reset to zero.
    pub fn cleared(&self, category: PointCategory) -> Self {
        let mut next = *self;
        match category {
            PointCategory::Pvp => next.pvp = 0,
            PointCategory::Pve => next.pve = 0,
        }
        next
    }

    /// True when both categories are zero.
    pub fn is_zero(&self) -> bool {
        self.pvp == 0 && self.pve == 0
    }
}

/// A claim whose on-chain outcome could not be observed.
///
/// Held until an operator reconciles against the chain. While present,
/// the player cannot submit a new claim. Markers are stored through the
/// ledger so they survive a restart alongside the balances they guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingClaim {
    /// Caller-supplied idempotency key, or a generated one.
    pub request_id: String,
    /// Category the unresolved claim drew from.
    pub category: PointCategory,
    /// Whole BTM units that may or may not have been transferred.
    pub units: u64,
    /// What the transferer reported before visibility was lost.
    pub reason: String,
    /// When the claim went uncertain.
    pub at: DateTime<Utc>,
}

/// Result of a settled (on-chain confirmed) claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    /// Whole BTM units transferred to the player.
    pub claimed_units: u64,
    /// Category the points were converted from.
    pub category: PointCategory,
    /// Hash of the confirmed transfer transaction.
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credited_is_per_category() {
        let b = PointBalance::ZERO
            .credited(PointCategory::Pvp, 100)
            .credited(PointCategory::Pve, 40);
        assert_eq!(b.pvp, 100);
        assert_eq!(b.pve, 40);
    }

    #[test]
    fn test_cleared_leaves_other_category() {
        let b = PointBalance { pvp: 1500, pve: 300 }.cleared(PointCategory::Pvp);
        assert_eq!(b.pvp, 0);
        assert_eq!(b.pve, 300);
    }

    #[test]
    fn test_credited_saturates_instead_of_wrapping() {
        let b = PointBalance { pvp: u64::MAX, pve: 0 }.credited(PointCategory::Pvp, 1);
        assert_eq!(b.pvp, u64::MAX);
    }

    #[test]
    fn test_zero_balance() {
        assert!(PointBalance::ZERO.is_zero());
        assert!(!PointBalance { pvp: 1, pve: 0 }.is_zero());
    }
}
