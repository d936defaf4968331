//! Points Ledger Port - Reward Point Store Interface
//!
//! The ledger exclusively owns point balances. It is NOT the token
//! balance — points are pending-conversion credit, the chain holds the
//! actual BTM. Implementations: in-memory map (tests, dev) and an
//! append-only JSONL journal (production).

use async_trait::async_trait;

use crate::domain::player::{PlayerAddress, PointCategory};
use crate::domain::points::{PendingClaim, PointBalance};

/// Trait for reward point stores.
///
/// All operations are keyed by validated player address. Accounts are
/// created implicitly on first credit and never deleted.
#[async_trait]
pub trait PointsLedger: Send + Sync + 'static {
  /// Credit `amount` points to the player in the given category.
  ///
  /// `amount` must be positive; the usecase validates before calling.
  /// Returns the balance after the credit.
  async fn add_points(
    &self,
    player: &PlayerAddress,
    category: PointCategory,
    amount: u64,
  ) -> anyhow::Result<PointBalance>;

  /// Read the current balance. Unknown players read as zero.
  async fn get_points(&self, player: &PlayerAddress) -> anyhow::Result<PointBalance>;

  /// Read-only claim-eligibility snapshot.
  ///
  /// Same data as `get_points`; named separately so the claim path's
  /// pre-transfer read is distinct in traces from plain balance queries.
  /// Eligibility itself is judged by the conversion policy against this
  /// snapshot.
  async fn peek(&self, player: &PlayerAddress) -> anyhow::Result<PointBalance> {
    self.get_points(player).await
  }

  /// Reset only the claimed category to zero.
  ///
  /// Must be called only after a Confirmed on-chain transfer. Calling it
  /// twice for the same claim silently no-ops (balance already zero);
  /// the coordinator guarantees it never re-subtracts.
  async fn commit_claim(
    &self,
    player: &PlayerAddress,
    category: PointCategory,
  ) -> anyhow::Result<()>;

  /// Store the marker of a claim with unknown on-chain outcome.
  ///
  /// The marker lives next to the balance it guards: a durable backend
  /// must persist it so a restart cannot forget that a transfer may
  /// already be in flight. At most one marker per player.
  async fn park_claim(
    &self,
    player: &PlayerAddress,
    claim: &PendingClaim,
  ) -> anyhow::Result<()>;

  /// Read the unresolved claim marker for a player, if any.
  async fn parked_claim(&self, player: &PlayerAddress)
    -> anyhow::Result<Option<PendingClaim>>;

  /// Remove a player's claim marker after out-of-band reconciliation.
  ///
  /// No-op when no marker exists.
  async fn clear_parked(&self, player: &PlayerAddress) -> anyhow::Result<()>;

  /// Check the store is usable (disk space, permissions).
  async fn is_healthy(&self) -> bool;
}
