//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, applying environment overrides,
//! validating all parameters, and providing clear error messages for
//! misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// Environment overrides applied after parsing:
/// - `PORT` → `service.port`
/// - `RPC_URL` → `chain.rpc_url`
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let mut config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  apply_env_overrides(&mut config)?;
  validate_config(&config)?;

  info!(
    port = config.service.port,
    pvp_rate = config.rewards.pvp_rate,
    pve_rate = config.rewards.pve_rate,
    ledger = %config.persistence.backend,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Apply deployment-level env var overrides on top of the file values.
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
  if let Ok(port) = std::env::var("PORT") {
    config.service.port = port
      .parse()
      .with_context(|| format!("PORT env var is not a valid port: {port}"))?;
  }
  if let Ok(rpc_url) = std::env::var("RPC_URL") {
    config.chain.rpc_url = rpc_url;
  }
  Ok(())
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Well-formed RPC URL and contract address
/// - Positive exchange rates (zero would divide-by-zero the policy)
/// - Sensible gas margin and timeout values
/// - A known ledger backend name
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    config.chain.rpc_url.starts_with("http://") || config.chain.rpc_url.starts_with("https://"),
    "chain.rpc_url must be an http(s) URL, got {}",
    config.chain.rpc_url
  );

  let addr = &config.token.contract_address;
  anyhow::ensure!(
    addr.len() == 42
      && addr.starts_with("0x")
      && addr[2..].chars().all(|c| c.is_ascii_hexdigit()),
    "token.contract_address is not a valid chain address: {addr}"
  );

  anyhow::ensure!(
    config.rewards.pvp_rate > 0,
    "rewards.pvp_rate must be positive, got {}",
    config.rewards.pvp_rate
  );
  anyhow::ensure!(
    config.rewards.pve_rate > 0,
    "rewards.pve_rate must be positive, got {}",
    config.rewards.pve_rate
  );
  anyhow::ensure!(
    config.rewards.gas_margin_percent <= 100,
    "rewards.gas_margin_percent must be in [0, 100], got {}",
    config.rewards.gas_margin_percent
  );

  anyhow::ensure!(
    config.chain.transfer_timeout_secs > 0,
    "chain.transfer_timeout_secs must be positive"
  );

  anyhow::ensure!(
    config.token.decimals <= 36,
    "token.decimals is implausibly large: {}",
    config.token.decimals
  );
  config
    .token
    .total_supply_fallback
    .parse::<u128>()
    .with_context(|| {
      format!(
        "token.total_supply_fallback is not a decimal integer: {}",
        config.token.total_supply_fallback
      )
    })?;

  anyhow::ensure!(
    matches!(config.persistence.backend.as_str(), "memory" | "journal"),
    "persistence.backend must be \"memory\" or \"journal\", got {}",
    config.persistence.backend
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base_toml() -> String {
    r#"
      [service]
      name = "bitmon-rewards-api"

      [chain]
      rpc_url = "https://testnet-rpc.monad.xyz"

      [token]
      contract_address = "0x59d6d0ADB836Ed25a3E7921ded05BF1997E82b8d"

      [rewards]
    "#
    .to_string()
  }

  #[test]
  fn test_minimal_config_parses_with_defaults() {
    let config: AppConfig = toml::from_str(&base_toml()).unwrap();
    assert_eq!(config.service.port, 3001);
    assert_eq!(config.rewards.pvp_rate, 1000);
    assert_eq!(config.rewards.pve_rate, 5000);
    assert_eq!(config.token.decimals, 18);
    assert_eq!(config.persistence.backend, "memory");
    validate_config(&config).unwrap();
  }

  #[test]
  fn test_rejects_zero_rate() {
    let toml_str = base_toml().replace("[rewards]", "[rewards]\npvp_rate = 0");
    let config: AppConfig = toml::from_str(&toml_str).unwrap();
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_rejects_bad_contract_address() {
    let toml_str = base_toml().replace(
      "0x59d6d0ADB836Ed25a3E7921ded05BF1997E82b8d",
      "not-an-address",
    );
    let config: AppConfig = toml::from_str(&toml_str).unwrap();
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_rejects_unknown_ledger_backend() {
    let toml_str = format!("{}\n[persistence]\nbackend = \"redis\"\n", base_toml());
    let config: AppConfig = toml::from_str(&toml_str).unwrap();
    assert!(validate_config(&config).is_err());
  }
}
