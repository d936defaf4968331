//! Scoring Use Case - Point Accrual and Reads
//!
//! Thin orchestration over the ledger port: validates amounts, credits
//! points, reads balances. Address validity is enforced by the
//! `PlayerAddress` type at the HTTP boundary, so this layer only guards
//! the amount.

use std::sync::Arc;

use tracing::info;

use crate::domain::error::RewardError;
use crate::domain::player::{PlayerAddress, PointCategory};
use crate::domain::points::PointBalance;
use crate::ports::ledger::PointsLedger;

/// Point accrual service over a pluggable ledger.
pub struct ScoringService {
  ledger: Arc<dyn PointsLedger>,
}

impl ScoringService {
  /// Create a new scoring service.
  pub fn new(ledger: Arc<dyn PointsLedger>) -> Self {
    Self { ledger }
  }

  /// Credit points for in-game activity.
  ///
  /// Each call adds — there is no deduplication of repeated calls; the
  /// game server is trusted to report each battle once.
  pub async fn add_points(
    &self,
    player: &PlayerAddress,
    category: PointCategory,
    amount: u64,
  ) -> Result<PointBalance, RewardError> {
    if amount == 0 {
      return Err(RewardError::InvalidInput(
        "pointsToAdd must be a positive integer".to_string(),
      ));
    }

    let balance = self.ledger.add_points(player, category, amount).await?;

    info!(
      player = %player,
      %category,
      amount,
      pvp = balance.pvp,
      pve = balance.pve,
      "Points added"
    );
    Ok(balance)
  }

  /// Read a player's balance. Unknown players read as zero.
  pub async fn get_points(&self, player: &PlayerAddress) -> Result<PointBalance, RewardError> {
    Ok(self.ledger.get_points(player).await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::persistence::MemoryLedger;

  fn player() -> PlayerAddress {
    PlayerAddress::parse("0x00000000000000000000000000000000000000ef").unwrap()
  }

  #[tokio::test]
  async fn test_zero_amount_is_invalid_input() {
    let service = ScoringService::new(Arc::new(MemoryLedger::new()));
    let err = service
      .add_points(&player(), PointCategory::Pvp, 0)
      .await
      .unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
  }

  #[tokio::test]
  async fn test_add_points_accumulates_per_category() {
    let service = ScoringService::new(Arc::new(MemoryLedger::new()));
    service.add_points(&player(), PointCategory::Pvp, 300).await.unwrap();
    let balance = service.add_points(&player(), PointCategory::Pvp, 200).await.unwrap();
    assert_eq!(balance.pvp, 500);
    assert_eq!(balance.pve, 0);
  }
}
