//! Reward error taxonomy.
//!
//! One typed error for the whole claim/scoring surface. The HTTP layer maps
//! variants to status codes; the distinction between `ChainRejected` and
//! `ChainIndeterminate` is load-bearing: rejected claims are safe to retry,
//! indeterminate ones are NOT (a blind retry risks a double transfer).

use thiserror::Error;

/// Errors surfaced by the scoring and claim usecases.
#[derive(Debug, Error)]
pub enum RewardError {
    /// Malformed address or non-positive point amount. Maps to 400.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Business-rule rejection: no category reaches its conversion rate.
    /// Ledger untouched. Maps to 400.
    #[error("insufficient points: {0}")]
    InsufficientPoints(String),

    /// The transfer explicitly failed on-chain (revert, insufficient gas
    /// funds). Ledger untouched; the claim may be retried later. Maps to 500.
    #[error("chain transfer rejected: {0}")]
    ChainRejected(String),

    /// The transfer outcome is unknown (RPC connection loss, timeout).
    /// Ledger untouched. NOT safe to auto-retry — reconcile against the
    /// chain first. Maps to 500 with a distinct error code.
    #[error("chain transfer indeterminate: {0}")]
    ChainIndeterminate(String),

    /// Anything unexpected. Logged in full, surfaced as a generic 500.
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RewardError {
    /// Stable machine-readable code for API responses and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InsufficientPoints(_) => "INSUFFICIENT_POINTS",
            Self::ChainRejected(_) => "CHAIN_REJECTED",
            Self::ChainIndeterminate(_) => "CHAIN_INDETERMINATE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// True when the caller may safely retry the same request.
    pub fn retry_safe(&self) -> bool {
        !matches!(self, Self::ChainIndeterminate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(RewardError::InvalidInput("x".into()).code(), "INVALID_INPUT");
        assert_eq!(
            RewardError::ChainIndeterminate("timeout".into()).code(),
            "CHAIN_INDETERMINATE"
        );
    }

    #[test]
    fn test_indeterminate_is_not_retry_safe() {
        assert!(RewardError::ChainRejected("revert".into()).retry_safe());
        assert!(!RewardError::ChainIndeterminate("timeout".into()).retry_safe());
    }
}
