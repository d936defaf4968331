//! Claim Use Case - Points-to-BTM Conversion State Machine
//!
//! Orchestrates a claim: peek ledger → run conversion policy → submit the
//! on-chain transfer → commit the ledger reset only on confirmed success.
//!
//! Per claim the flow moves Idle → Evaluated → Submitted → one of
//! Settled / Failed / Uncertain:
//! - Ineligible at evaluation fails with `InsufficientPoints`, ledger
//!   untouched.
//! - `Rejected` transfers fail with `ChainRejected`, ledger untouched —
//!   the full point balance stays claimable.
//! - `Indeterminate` transfers fail with `ChainIndeterminate` and leave a
//!   pending marker: further claims for that player return the stored
//!   marker instead of re-submitting (a second submission while the first
//!   is unresolved risks a double transfer). The marker is stored through
//!   the ledger so durable backends carry it across restarts; it is
//!   cleared by `resolve_uncertain` after out-of-band reconciliation.
//!
//! Concurrency: claims are serialized per player via a keyed lock map.
//! Different players claim in parallel; `add_points` never takes the
//! claim lock. A point-add racing a claim lands before or after the peek
//! snapshot — both orderings are accepted (accrual does not need
//! atomicity with spend).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::conversion::{to_base_units, ConversionPolicy, ConversionQuote};
use crate::domain::error::RewardError;
use crate::domain::player::{PlayerAddress, PointCategory};
use crate::domain::points::{ClaimOutcome, PendingClaim};
use crate::ports::ledger::PointsLedger;
use crate::ports::transferer::{ChainTransferer, TransferOutcome};

/// Orchestrates claims over the ledger and transferer ports.
pub struct ClaimCoordinator {
  ledger: Arc<dyn PointsLedger>,
  transferer: Arc<dyn ChainTransferer>,
  policy: ConversionPolicy,
  /// Token decimals for scaling whole units to base units.
  decimals: u8,
  /// Per-player claim serialization: at most one in-flight claim each.
  claim_locks: RwLock<HashMap<PlayerAddress, Arc<Mutex<()>>>>,
}

impl ClaimCoordinator {
  /// Create a coordinator.
  pub fn new(
    ledger: Arc<dyn PointsLedger>,
    transferer: Arc<dyn ChainTransferer>,
    policy: ConversionPolicy,
    decimals: u8,
  ) -> Self {
    Self {
      ledger,
      transferer,
      policy,
      decimals,
      claim_locks: RwLock::new(HashMap::new()),
    }
  }

  /// Get or create the per-player claim lock.
  async fn lock_for(&self, player: &PlayerAddress) -> Arc<Mutex<()>> {
    {
      let locks = self.claim_locks.read().await;
      if let Some(lock) = locks.get(player) {
        return Arc::clone(lock);
      }
    }
    let mut locks = self.claim_locks.write().await;
    Arc::clone(locks.entry(player.clone()).or_default())
  }

  /// Execute a claim for `player`.
  ///
  /// `request_id` is an optional caller-supplied idempotency key; it is
  /// recorded on an Uncertain outcome so a client retry can be matched
  /// to the original attempt instead of triggering a second transfer.
  pub async fn claim(
    &self,
    player: &PlayerAddress,
    request_id: Option<String>,
  ) -> Result<ClaimOutcome, RewardError> {
    let lock = self.lock_for(player).await;
    let _guard = lock.lock().await;

    // A prior claim with unknown on-chain outcome blocks new claims:
    // re-submitting while uncertain risks paying twice. The marker lives
    // in the ledger, so it also blocks claims from before a restart.
    if let Some(pending) = self.ledger.parked_claim(player).await? {
      warn!(
        player = %player,
        request_id = %pending.request_id,
        since = %pending.at,
        "Claim refused: prior attempt unresolved"
      );
      return Err(RewardError::ChainIndeterminate(format!(
        "previous claim {} is awaiting reconciliation: {}",
        pending.request_id, pending.reason
      )));
    }

    // Idle → Evaluated: snapshot the ledger and price the claim.
    let balance = self.ledger.peek(player).await?;
    let (category, units) = match self.policy.quote(balance) {
      ConversionQuote::Eligible { category, units, .. } => (category, units),
      ConversionQuote::Ineligible => {
        return Err(RewardError::InsufficientPoints(format!(
          "pvp {} / {} required, pve {} / {} required",
          balance.pvp, self.policy.pvp_rate, balance.pve, self.policy.pve_rate
        )));
      }
    };

    let base_units = to_base_units(units, self.decimals).ok_or_else(|| {
      RewardError::Internal(anyhow::anyhow!(
        "claim of {units} units overflows base-unit scaling"
      ))
    })?;

    let request_id = request_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    info!(
      player = %player,
      request_id = %request_id,
      %category,
      units,
      "Claim evaluated, submitting transfer"
    );

    // Evaluated → Submitted: the single external side effect.
    let outcome = self.transferer.transfer(player, base_units).await?;

    match outcome {
      // Submitted → Settled: commit the ledger reset.
      TransferOutcome::Confirmed { tx_hash } => {
        if let Err(e) = self.ledger.commit_claim(player, category).await {
          // Tokens moved but the reset did not persist. Park the claim
          // so the points cannot be spent again before reconciliation.
          error!(
            player = %player,
            tx_hash = %tx_hash,
            error = %e,
            "Transfer confirmed but ledger commit failed — parking claim"
          );
          self.park(player, &request_id, category, units, format!(
            "transfer {tx_hash} confirmed but ledger commit failed"
          ))
          .await;
          return Err(RewardError::ChainIndeterminate(format!(
            "transfer {tx_hash} confirmed but ledger commit failed; reconcile before retrying"
          )));
        }

        info!(
          player = %player,
          request_id = %request_id,
          tx_hash = %tx_hash,
          units,
          "Claim settled"
        );
        Ok(ClaimOutcome {
          claimed_units: units,
          category,
          tx_hash,
        })
      }

      // Submitted → Failed: nothing moved, nothing deducted.
      TransferOutcome::Rejected { reason } => {
        warn!(player = %player, request_id = %request_id, reason = %reason, "Claim rejected on-chain");
        Err(RewardError::ChainRejected(reason))
      }

      // Submitted → Uncertain: park and surface distinctly.
      TransferOutcome::Indeterminate { reason } => {
        warn!(
          player = %player,
          request_id = %request_id,
          reason = %reason,
          "Claim outcome unknown — parked for reconciliation"
        );
        self.park(player, &request_id, category, units, reason.clone()).await;
        Err(RewardError::ChainIndeterminate(reason))
      }
    }
  }

  async fn park(
    &self,
    player: &PlayerAddress,
    request_id: &str,
    category: PointCategory,
    units: u64,
    reason: String,
  ) {
    let marker = PendingClaim {
      request_id: request_id.to_string(),
      category,
      units,
      reason,
      at: Utc::now(),
    };
    // A failed persist still leaves the in-memory marker in place; the
    // claim stays blocked in-process, only restart durability is lost.
    if let Err(e) = self.ledger.park_claim(player, &marker).await {
      error!(
        player = %player,
        request_id = %request_id,
        error = %e,
        "Failed to persist claim marker"
      );
    }
  }

  /// The unresolved claim for a player, if any.
  pub async fn pending_claim(
    &self,
    player: &PlayerAddress,
  ) -> Result<Option<PendingClaim>, RewardError> {
    Ok(self.ledger.parked_claim(player).await?)
  }

  /// Operator hook: resolve a parked Uncertain claim after checking the
  /// chain out-of-band.
  ///
  /// `transferred = true` means the transaction was found confirmed on
  /// chain — the ledger reset is committed now. `false` means it never
  /// landed — the marker is dropped and the points remain claimable.
  pub async fn resolve_uncertain(
    &self,
    player: &PlayerAddress,
    transferred: bool,
  ) -> Result<Option<PendingClaim>, RewardError> {
    let lock = self.lock_for(player).await;
    let _guard = lock.lock().await;

    let Some(pending) = self.ledger.parked_claim(player).await? else {
      return Ok(None);
    };

    if transferred {
      // Commit before dropping the marker: if the commit fails the claim
      // stays parked instead of becoming spendable again.
      self.ledger.commit_claim(player, pending.category).await?;
      info!(
        player = %player,
        request_id = %pending.request_id,
        "Uncertain claim reconciled as transferred; ledger committed"
      );
    } else {
      info!(
        player = %player,
        request_id = %pending.request_id,
        "Uncertain claim reconciled as not transferred; points released"
      );
    }

    self.ledger.clear_parked(player).await?;
    Ok(Some(pending))
  }
}
