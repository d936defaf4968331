//! Token Query Port - Read-only BTM Metadata Interface
//!
//! Pass-through ERC-20 view calls (name/symbol/decimals/totalSupply/
//! balanceOf). These carry no invariants; the adapter supplies static
//! fallback values when the RPC is unreachable so the game UI keeps
//! rendering.

use async_trait::async_trait;

use crate::domain::player::PlayerAddress;

/// Static token facts bundled for the /token-info endpoint.
#[derive(Debug, Clone)]
pub struct TokenInfo {
  /// Token name (fallback: "Bitmon").
  pub name: String,
  /// Ticker symbol (fallback: "BTM").
  pub symbol: String,
  /// Decimal places (fallback: 18).
  pub decimals: u8,
  /// Total supply in base units.
  pub total_supply: u128,
}

/// Trait for read-only token metadata and balance lookups.
#[async_trait]
pub trait TokenQuery: Send + Sync + 'static {
  /// Fetch name, symbol, decimals and total supply in one sweep.
  async fn token_info(&self) -> anyhow::Result<TokenInfo>;

  /// ERC-20 `balanceOf` in base units.
  async fn balance_of(&self, owner: &PlayerAddress) -> anyhow::Result<u128>;

  /// Check the RPC connection is live.
  async fn is_healthy(&self) -> bool;
}
