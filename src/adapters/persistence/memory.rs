//! In-memory Point Ledger
//!
//! Process-lifetime ledger backed by a HashMap. Accounts are created
//! implicitly on first credit and read as zero before that. This is the
//! default backend for dev and the fake of choice for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::player::{PlayerAddress, PointCategory};
use crate::domain::points::{PendingClaim, PointBalance};
use crate::ports::ledger::PointsLedger;

/// HashMap-backed ledger behind a tokio RwLock.
///
/// Reads take the shared lock; credits and commits take the exclusive
/// lock, so each individual operation is atomic. Claim-level atomicity
/// (peek → transfer → commit) is the coordinator's job, not the store's.
#[derive(Default)]
pub struct MemoryLedger {
    accounts: RwLock<HashMap<PlayerAddress, PointBalance>>,
    /// Unresolved claim markers. Process-lifetime, like the balances.
    parked: RwLock<HashMap<PlayerAddress, PendingClaim>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PointsLedger for MemoryLedger {
    async fn add_points(
        &self,
        player: &PlayerAddress,
        category: PointCategory,
        amount: u64,
    ) -> anyhow::Result<PointBalance> {
        let mut accounts = self.accounts.write().await;
        let entry = accounts.entry(player.clone()).or_default();
        *entry = entry.credited(category, amount);

        debug!(player = %player, %category, amount, "Points credited");
        Ok(*entry)
    }

    async fn get_points(&self, player: &PlayerAddress) -> anyhow::Result<PointBalance> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(player).copied().unwrap_or(PointBalance::ZERO))
    }

    async fn commit_claim(
        &self,
        player: &PlayerAddress,
        category: PointCategory,
    ) -> anyhow::Result<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(entry) = accounts.get_mut(player) {
            *entry = entry.cleared(category);
        }
        debug!(player = %player, %category, "Claim committed, category reset");
        Ok(())
    }

    async fn park_claim(
        &self,
        player: &PlayerAddress,
        claim: &PendingClaim,
    ) -> anyhow::Result<()> {
        let mut parked = self.parked.write().await;
        parked.insert(player.clone(), claim.clone());
        debug!(player = %player, request_id = %claim.request_id, "Claim parked");
        Ok(())
    }

    async fn parked_claim(
        &self,
        player: &PlayerAddress,
    ) -> anyhow::Result<Option<PendingClaim>> {
        let parked = self.parked.read().await;
        Ok(parked.get(player).cloned())
    }

    async fn clear_parked(&self, player: &PlayerAddress) -> anyhow::Result<()> {
        let mut parked = self.parked.write().await;
        parked.remove(player);
        debug!(player = %player, "Claim marker cleared");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerAddress {
        PlayerAddress::parse("0x00000000000000000000000000000000000000ab").unwrap()
    }

    #[tokio::test]
    async fn test_unknown_player_reads_zero() {
        let ledger = MemoryLedger::new();
        let balance = ledger.get_points(&player()).await.unwrap();
        assert_eq!(balance, PointBalance::ZERO);
    }

    #[tokio::test]
    async fn test_add_then_get_reflects_sum() {
        let ledger = MemoryLedger::new();
        ledger.add_points(&player(), PointCategory::Pvp, 700).await.unwrap();
        ledger.add_points(&player(), PointCategory::Pvp, 800).await.unwrap();
        ledger.add_points(&player(), PointCategory::Pve, 40).await.unwrap();

        let balance = ledger.get_points(&player()).await.unwrap();
        assert_eq!(balance.pvp, 1500);
        assert_eq!(balance.pve, 40);
    }

    #[tokio::test]
    async fn test_commit_resets_only_claimed_category() {
        let ledger = MemoryLedger::new();
        ledger.add_points(&player(), PointCategory::Pvp, 1500).await.unwrap();
        ledger.add_points(&player(), PointCategory::Pve, 300).await.unwrap();

        ledger.commit_claim(&player(), PointCategory::Pvp).await.unwrap();

        let balance = ledger.get_points(&player()).await.unwrap();
        assert_eq!(balance.pvp, 0);
        assert_eq!(balance.pve, 300);
    }

    #[tokio::test]
    async fn test_double_commit_is_a_noop() {
        let ledger = MemoryLedger::new();
        ledger.add_points(&player(), PointCategory::Pvp, 1000).await.unwrap();
        ledger.commit_claim(&player(), PointCategory::Pvp).await.unwrap();
        ledger.commit_claim(&player(), PointCategory::Pvp).await.unwrap();

        let balance = ledger.get_points(&player()).await.unwrap();
        assert_eq!(balance.pvp, 0);
    }

    #[tokio::test]
    async fn test_commit_for_unknown_player_is_a_noop() {
        let ledger = MemoryLedger::new();
        ledger.commit_claim(&player(), PointCategory::Pve).await.unwrap();
        assert!(ledger.get_points(&player()).await.unwrap().is_zero());
    }

    #[tokio::test]
    async fn test_park_then_clear_roundtrip() {
        let ledger = MemoryLedger::new();
        let marker = PendingClaim {
            request_id: "req-7".to_string(),
            category: PointCategory::Pvp,
            units: 2,
            reason: "timeout".to_string(),
            at: chrono::Utc::now(),
        };

        assert!(ledger.parked_claim(&player()).await.unwrap().is_none());
        ledger.park_claim(&player(), &marker).await.unwrap();
        assert_eq!(ledger.parked_claim(&player()).await.unwrap(), Some(marker));

        ledger.clear_parked(&player()).await.unwrap();
        assert!(ledger.parked_claim(&player()).await.unwrap().is_none());
    }
}
