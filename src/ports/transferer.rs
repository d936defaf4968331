//! Chain Transferer Port - On-chain Disbursement Interface
//!
//! Wraps the single real-world side effect of the whole service: moving
//! BTM base units from the custodial rewards wallet to a player address.
//! The three-way outcome split is the heart of the claim contract —
//! `Indeterminate` means the chain may or may not have moved tokens, and
//! the caller must never treat it as either.

use async_trait::async_trait;

use crate::domain::player::PlayerAddress;

/// Result of a transfer attempt, as observed from the RPC edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
  /// Mined and receipted. The tokens moved.
  Confirmed {
    /// Transaction hash from the receipt.
    tx_hash: String,
  },
  /// The chain (or a pre-flight check) explicitly refused the transfer:
  /// contract revert, insufficient signer funds. The tokens did NOT move;
  /// retrying with the same parameters later is safe.
  Rejected {
    /// Human-readable rejection reason (safe to surface).
    reason: String,
  },
  /// Connection loss or timeout between submission and receipt. On-chain
  /// state is UNKNOWN — the caller must not assume success or failure.
  Indeterminate {
    /// What was observed before visibility was lost.
    reason: String,
  },
}

/// Trait for the custodial token disbursement capability.
///
/// Implementations acquire the signer credential per call and drop it when
/// the call returns — nothing about the key survives on the adapter.
#[async_trait]
pub trait ChainTransferer: Send + Sync + 'static {
  /// Transfer `amount_base_units` of BTM to `to`.
  ///
  /// Never returns `Err` for chain-side failures — those are `Rejected`
  /// or `Indeterminate` outcomes. `Err` is reserved for local
  /// misconfiguration (missing signer key, malformed contract address).
  async fn transfer(
    &self,
    to: &PlayerAddress,
    amount_base_units: u128,
  ) -> anyhow::Result<TransferOutcome>;

  /// Check the RPC connection is live.
  async fn is_healthy(&self) -> bool;
}
