//! Player identity types.
//!
//! Players are keyed by their chain address. `PlayerAddress` is a validated
//! newtype: once constructed, the address is guaranteed to be a well-formed
//! `0x`-prefixed 20-byte hex string, so ports and adapters never re-validate.
//!
//! Exposes two API surfaces:
//! - `PlayerAddress` for anything keyed by player
//! - `PointCategory` shared by the ledger, policy, and HTTP layer

use serde::{Deserialize, Serialize};

use super::error::RewardError;

/// A validated chain address identifying a player.
///
/// Stored lowercased so the same wallet always maps to the same ledger
/// entry regardless of checksum casing in the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerAddress(String);

impl PlayerAddress {
    /// Parse and validate an address string.
    ///
    /// Accepts any `0x` + 40 hex characters form (checksummed or not),
    /// matching what the token contract accepts as a recipient.
    pub fn parse(raw: &str) -> Result<Self, RewardError> {
        let trimmed = raw.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| invalid(raw))?;

        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid(raw));
        }

        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// The normalized (lowercase) address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(raw: &str) -> RewardError {
    RewardError::InvalidInput(format!("invalid player address: {raw:?}"))
}

impl std::str::FromStr for PlayerAddress {
    type Err = RewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlayerAddress {
    type Error = RewardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PlayerAddress> for String {
    fn from(addr: PlayerAddress) -> Self {
        addr.0
    }
}

impl std::fmt::Display for PlayerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of in-game activity that earns points.
///
/// PvP and PvE accrue independently and convert at different rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointCategory {
    /// Player-versus-player battles.
    Pvp,
    /// Player-versus-environment quests.
    Pve,
}

impl std::fmt::Display for PointCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pvp => write!(f, "pvp"),
            Self::Pve => write!(f, "pve"),
        }
    }
}
