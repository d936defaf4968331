//! Monad RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the read-only connection to the Monad testnet via alloy-rs.
//! Validates RPC connectivity at startup and exposes a shared provider
//! instance for the token-query adapter.
//!
//! In alloy 0.9, `ProviderBuilder::new().on_http()` returns a complex
//! filler type over an HTTP transport. We erase both: `.boxed()` on the
//! root provider erases the transport to `BoxTransport` (what bare
//! `dyn Provider` defaults to), and the Arc erases the provider type,
//! keeping the API clean across the adapter layer.

use std::sync::Arc;

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::config::ChainConfig;

/// Shared Monad RPC provider backed by alloy-rs 0.9.
///
/// All read-only chain adapters share a single provider instance to
/// avoid redundant connections and enable connection pooling. The
/// transfer adapter builds its own wallet-filled provider per call so
/// the signer never lives on a shared object.
pub struct MonadProvider {
    /// The alloy HTTP provider connected to the Monad RPC (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
    /// RPC endpoint URL (reused by the transfer adapter's scoped signer).
    rpc_url: String,
}

impl MonadProvider {
    /// Connect to the Monad RPC and probe connectivity.
    ///
    /// Reads the RPC URL from config (`RPC_URL` env override applied at
    /// load time). Logs the reported chain ID; when
    /// `expected_chain_id` is configured and differs, warns rather than
    /// aborting — testnet chain IDs have rotated across resets.
    #[instrument(skip_all)]
    pub async fn connect(config: &ChainConfig) -> Result<Self> {
        let rpc_url = config.rpc_url.clone();

        // alloy 0.9: on_http() is synchronous, returns impl Provider
        let provider = ProviderBuilder::new()
            .on_http(rpc_url.parse().context("Invalid RPC URL")?);

        // Erase the transport, then the provider type
        let provider: Arc<dyn Provider + Send + Sync> =
            Arc::new(provider.root().clone().boxed());

        // Connectivity probe at startup
        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID — is the RPC reachable?")?;

        match config.expected_chain_id {
            Some(expected) if expected != chain_id => {
                warn!(
                    chain_id,
                    expected,
                    "RPC chain ID differs from configured expectation"
                );
            }
            _ => {
                info!(chain_id, "Connected to Monad RPC");
            }
        }

        Ok(Self { provider, rpc_url })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// The configured RPC endpoint URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
