//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml` with environment
//! variable overrides for deployment knobs (`PORT`, `RPC_URL`). The
//! custodial signer key is NOT config — it is read from
//! `REWARDS_WALLET_PRIVATE_KEY` at transfer time and never stored.
//! Contract address and exchange rates are externalized here — nothing is
//! hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated before
/// the server begins accepting requests.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and HTTP binding.
  pub service: ServiceConfig,
  /// Chain RPC endpoint parameters.
  pub chain: ChainConfig,
  /// BTM token contract parameters and RPC fallbacks.
  pub token: TokenConfig,
  /// Reward economy parameters.
  pub rewards: RewardsConfig,
  /// Ledger persistence configuration.
  #[serde(default)]
  pub persistence: PersistenceConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// HTTP bind address.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// HTTP port. Overridden by the `PORT` env var when set.
  #[serde(default = "default_port")]
  pub port: u16,
}

/// Chain RPC configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
  /// JSON-RPC endpoint URL. Overridden by the `RPC_URL` env var when set.
  pub rpc_url: String,
  /// Chain ID the endpoint is expected to report. Mismatch logs a
  /// warning rather than aborting (testnet IDs rotate).
  pub expected_chain_id: Option<u64>,
  /// Whole-transfer timeout after which the outcome is Indeterminate.
  #[serde(default = "default_transfer_timeout")]
  pub transfer_timeout_secs: u64,
}

/// BTM token contract configuration.
///
/// The fallback fields mirror the original deployment's static values:
/// they are served when the RPC is unreachable so read-only endpoints
/// degrade gracefully instead of erroring.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
  /// Deployed ERC-20 contract address.
  pub contract_address: String,
  /// Token decimal places.
  #[serde(default = "default_decimals")]
  pub decimals: u8,
  /// Name served when the RPC name() call fails.
  #[serde(default = "default_token_name")]
  pub name_fallback: String,
  /// Symbol served when the RPC symbol() call fails.
  #[serde(default = "default_token_symbol")]
  pub symbol_fallback: String,
  /// Total supply (base units, decimal string) served when the RPC
  /// totalSupply() call fails. String because 210M × 10^18 exceeds u64.
  #[serde(default = "default_total_supply")]
  pub total_supply_fallback: String,
}

/// Reward economy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardsConfig {
  /// PvP points per whole BTM unit.
  #[serde(default = "default_pvp_rate")]
  pub pvp_rate: u64,
  /// PvE points per whole BTM unit.
  #[serde(default = "default_pve_rate")]
  pub pve_rate: u64,
  /// Safety margin added to the gas estimate, in percent.
  #[serde(default = "default_gas_margin")]
  pub gas_margin_percent: u64,
}

/// Ledger persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
  /// Ledger backend: "memory" or "journal".
  #[serde(default = "default_ledger_backend")]
  pub backend: String,
  /// Directory for JSONL point journals (journal backend only).
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      backend: default_ledger_backend(),
      data_dir: default_data_dir(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0".to_string()
}

fn default_port() -> u16 {
  3001
}

fn default_transfer_timeout() -> u64 {
  30
}

fn default_decimals() -> u8 {
  18
}

fn default_token_name() -> String {
  "Bitmon".to_string()
}

fn default_token_symbol() -> String {
  "BTM".to_string()
}

fn default_total_supply() -> String {
  // 210M BTM at 18 decimals
  "210000000000000000000000000".to_string()
}

fn default_pvp_rate() -> u64 {
  1000
}

fn default_pve_rate() -> u64 {
  5000
}

fn default_gas_margin() -> u64 {
  20
}

fn default_ledger_backend() -> String {
  "memory".to_string()
}

fn default_data_dir() -> String {
  "data".to_string()
}
