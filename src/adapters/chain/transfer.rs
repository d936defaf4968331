//! BTM Disbursement - Custodial ERC-20 Transfer via alloy-rs
//!
//! Implements the `ChainTransferer` port. This is the only code path in
//! the service that spends real value, and the only one that touches the
//! custodial signer key.
//!
//! Signer scoping: the private key is read from the
//! `REWARDS_WALLET_PRIVATE_KEY` env var inside each call, parsed into a
//! local wallet, and dropped when the call returns — on every exit path,
//! including timeout. Nothing about the key is stored on the adapter or
//! written to logs.
//!
//! Outcome mapping (the claim coordinator's whole contract rests on this):
//! - mined receipt, status ok        → `Confirmed { tx_hash }`
//! - revert / insufficient funds     → `Rejected` (tokens did not move)
//! - transport loss, timeout         → `Indeterminate` (state unknown)

use std::sync::Arc;
use std::time::Duration;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::config::{ChainConfig, RewardsConfig, TokenConfig};
use crate::domain::player::PlayerAddress;
use crate::ports::transferer::{ChainTransferer, TransferOutcome};

use super::erc20_calldata;
use super::provider::MonadProvider;

/// Env var holding the custodial rewards wallet private key.
const SIGNER_KEY_ENV: &str = "REWARDS_WALLET_PRIVATE_KEY";

/// Custodial BTM transfer adapter.
pub struct BtmTransferer {
    /// Shared read-only provider (health checks only; transfers build
    /// their own wallet-filled provider so the signer stays scoped).
    provider: Arc<MonadProvider>,
    /// Deployed BTM contract address.
    contract: Address,
    /// Whole-call budget after which the outcome is Indeterminate.
    transfer_timeout: Duration,
    /// Safety margin applied to the gas estimate, in percent.
    gas_margin_percent: u64,
}

impl BtmTransferer {
    /// Create the adapter from validated config.
    pub fn new(
        provider: Arc<MonadProvider>,
        token: &TokenConfig,
        chain: &ChainConfig,
        rewards: &RewardsConfig,
    ) -> Result<Self> {
        let contract: Address = token
            .contract_address
            .parse()
            .context("Invalid BTM contract address")?;

        Ok(Self {
            provider,
            contract,
            transfer_timeout: Duration::from_secs(chain.transfer_timeout_secs),
            gas_margin_percent: rewards.gas_margin_percent,
        })
    }

    /// The submission flow proper, run under the whole-call timeout.
    async fn submit(&self, to: Address, amount: U256) -> Result<TransferOutcome> {
        // Acquire the signer for the scope of this call only.
        let raw_key = std::env::var(SIGNER_KEY_ENV)
            .with_context(|| format!("{SIGNER_KEY_ENV} not set"))?;
        let key = if raw_key.starts_with("0x") {
            raw_key
        } else {
            format!("0x{raw_key}")
        };

        let signer: PrivateKeySigner = key
            .parse()
            .context("Rewards wallet private key is malformed")?;
        let sender = signer.address();
        let wallet = EthereumWallet::from(signer);

        // Fresh wallet-filled provider; dropped with the wallet on return.
        let provider = ProviderBuilder::new().wallet(wallet).on_http(
            self.provider
                .rpc_url()
                .parse()
                .context("Invalid RPC URL")?,
        );

        // transfer(address,uint256) calldata
        let mut calldata = erc20_calldata("transfer(address,uint256)", &[to]);
        calldata.extend_from_slice(&amount.to_be_bytes::<32>());

        let tx = TransactionRequest::default()
            .with_from(sender)
            .with_to(self.contract)
            .with_input(Bytes::from(calldata));

        // Fee estimation before submission. A revert-shaped failure here
        // means the transfer cannot succeed (Rejected, nothing submitted);
        // a transport failure leaves us unable to rule anything out.
        let gas_estimate = match provider.estimate_gas(&tx).await {
            Ok(gas) => gas,
            Err(e) => return Ok(classify_rpc_error("gas estimation", &e.to_string())),
        };
        let gas_price = match provider.get_gas_price().await {
            Ok(price) => price,
            Err(e) => return Ok(classify_rpc_error("gas price query", &e.to_string())),
        };

        // Safety margin against underpriced-transaction rejection.
        let gas_limit = gas_estimate + gas_estimate * self.gas_margin_percent / 100;

        info!(
            to = %to,
            amount = %amount,
            gas_estimate,
            gas_limit,
            gas_price,
            "Submitting BTM transfer"
        );

        let tx = tx.with_gas_limit(gas_limit).with_gas_price(gas_price);

        let pending = match provider.send_transaction(tx).await {
            Ok(pending) => pending,
            Err(e) => return Ok(classify_rpc_error("submission", &e.to_string())),
        };

        // Past this point the transaction is in the mempool: any failure
        // to observe the receipt leaves on-chain state unknown.
        let receipt = match pending.get_receipt().await {
            Ok(receipt) => receipt,
            Err(e) => {
                return Ok(TransferOutcome::Indeterminate {
                    reason: format!("submitted but receipt not observed: {e}"),
                })
            }
        };

        let tx_hash = format!("{}", receipt.transaction_hash);

        if receipt.status() {
            info!(tx_hash = %tx_hash, "BTM transfer confirmed");
            Ok(TransferOutcome::Confirmed { tx_hash })
        } else {
            warn!(tx_hash = %tx_hash, "BTM transfer reverted");
            Ok(TransferOutcome::Rejected {
                reason: format!("execution reverted in {tx_hash}"),
            })
        }
    }
}

#[async_trait]
impl ChainTransferer for BtmTransferer {
    #[instrument(skip(self), fields(to = %to, amount_base_units))]
    async fn transfer(
        &self,
        to: &PlayerAddress,
        amount_base_units: u128,
    ) -> Result<TransferOutcome> {
        let to_addr: Address = to
            .as_str()
            .parse()
            .context("Validated player address failed alloy parse")?;
        let amount = U256::from(amount_base_units);

        match tokio::time::timeout(self.transfer_timeout, self.submit(to_addr, amount)).await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    timeout_secs = self.transfer_timeout.as_secs(),
                    "Transfer timed out; on-chain state unknown"
                );
                Ok(TransferOutcome::Indeterminate {
                    reason: format!(
                        "no outcome within {}s",
                        self.transfer_timeout.as_secs()
                    ),
                })
            }
        }
    }

    async fn is_healthy(&self) -> bool {
        self.provider.is_healthy().await
    }
}

/// Map an RPC error string to a transfer outcome.
///
/// Explicit revert or insufficient-funds responses prove the transfer did
/// not (and will not) move tokens. Anything else is treated as a
/// visibility loss: Indeterminate, never assume failure.
fn classify_rpc_error(phase: &str, message: &str) -> TransferOutcome {
    let lower = message.to_ascii_lowercase();
    let provably_failed = lower.contains("revert")
        || lower.contains("insufficient funds")
        || lower.contains("insufficient balance")
        || lower.contains("exceeds balance");

    if provably_failed {
        TransferOutcome::Rejected {
            reason: format!("{phase}: {message}"),
        }
    } else {
        TransferOutcome::Indeterminate {
            reason: format!("{phase}: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_legacy_gas_fields() {
        let tx = TransactionRequest::default()
            .with_gas_limit(60_000)
            .with_gas_price(52_000_000_000);
        assert_eq!(tx.gas, Some(60_000));
        assert_eq!(tx.gas_price, Some(52_000_000_000));
    }

    #[test]
    fn test_revert_classified_as_rejected() {
        let outcome = classify_rpc_error("gas estimation", "execution reverted: ERC20: transfer amount exceeds balance");
        assert!(matches!(outcome, TransferOutcome::Rejected { .. }));
    }

    #[test]
    fn test_insufficient_funds_classified_as_rejected() {
        let outcome = classify_rpc_error("submission", "insufficient funds for gas * price + value");
        assert!(matches!(outcome, TransferOutcome::Rejected { .. }));
    }

    #[test]
    fn test_connection_error_classified_as_indeterminate() {
        let outcome = classify_rpc_error("submission", "error sending request: connection reset by peer");
        assert!(matches!(outcome, TransferOutcome::Indeterminate { .. }));
    }
}
